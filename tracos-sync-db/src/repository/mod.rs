pub mod check_connection;
pub mod find_by_number;
pub mod find_unsynced;
pub mod insert;
pub mod mark_synced;
pub mod update;
pub mod workorder_store;

// Re-exports
pub use check_connection::*;
pub use find_by_number::*;
pub use find_unsynced::*;
pub use insert::*;
pub use mark_synced::*;
pub use update::*;
pub use workorder_store::*;
