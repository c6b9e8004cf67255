pub mod tracos_workorder;
pub mod workorder_status;

pub use tracos_workorder::*;
pub use workorder_status::*;
