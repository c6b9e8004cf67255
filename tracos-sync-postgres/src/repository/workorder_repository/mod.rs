pub mod repo_impl;
pub use repo_impl::WorkorderRepositoryImpl;

pub mod check_connection;
pub mod find_by_number;
pub mod find_unsynced;
pub mod insert;
pub mod mark_synced;
pub mod update;
