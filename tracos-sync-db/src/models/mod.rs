pub mod customer;
pub mod natural_key;
pub mod tracos;

// Re-exports
pub use customer::*;
pub use natural_key::*;
pub use tracos::*;
