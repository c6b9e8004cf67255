pub mod customer_workorder_schema;

pub use customer_workorder_schema::*;
