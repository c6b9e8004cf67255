pub mod workorder_repository;

pub use workorder_repository::WorkorderRepositoryImpl;
