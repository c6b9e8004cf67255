pub mod models;
pub mod repository;
pub mod schema;
pub mod translator;
pub mod utils;

pub use models::*;
