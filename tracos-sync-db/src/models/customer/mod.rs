pub mod customer_workorder;

pub use customer_workorder::*;
