//! Test helper module for database-backed repository tests
//!
//! Every context starts from an empty `workorders` collection. Tests using it
//! are marked `#[serial]` because they share that collection. Without
//! `DATABASE_URL` no context is created and the calling test returns early.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crate::postgres_repositories::run_migrations;
use crate::repository::workorder_repository::WorkorderRepositoryImpl;

pub struct TestContext {
    pool: Arc<PgPool>,
    pub workorder_repository: WorkorderRepositoryImpl,
}

impl TestContext {
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Setup a test context against `DATABASE_URL` with an emptied collection
///
/// # Returns
/// `None` when `DATABASE_URL` is not set.
///
/// # Example
///
/// ```ignore
/// #[tokio::test]
/// async fn test_example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
///     let Some(ctx) = setup_test_context().await? else { return Ok(()) };
///     ctx.workorder_repository.check_connection().await?;
///     Ok(())
/// }
/// ```
pub async fn setup_test_context() -> Result<Option<TestContext>, Box<dyn std::error::Error + Send + Sync>> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping PostgreSQL-backed test");
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&database_url)
        .await?;

    run_migrations(&pool).await?;
    sqlx::query("DELETE FROM workorders").execute(&pool).await?;

    let pool = Arc::new(pool);
    let workorder_repository =
        WorkorderRepositoryImpl::new(pool.clone(), "workorders", Duration::from_secs(10))?;

    Ok(Some(TestContext {
        pool,
        workorder_repository,
    }))
}
