pub mod postgres_repositories;
pub mod repository;
pub mod retry;
pub mod retrying_store;
pub mod utils;

pub use postgres_repositories::{run_migrations, PostgresRepositories};
pub use repository::workorder_repository::WorkorderRepositoryImpl;
pub use retry::RetryPolicy;
pub use retrying_store::RetryingStore;

#[cfg(test)]
pub mod test_helper;
