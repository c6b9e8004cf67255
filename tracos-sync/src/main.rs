use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tracos_sync::{FsMailbox, SyncOrchestrator};
use tracos_sync_api::SyncConfig;
use tracos_sync_postgres::{run_migrations, PostgresRepositories, RetryPolicy, RetryingStore};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = SyncConfig::from_env().context("Invalid synchronization configuration")?;
    info!(
        inbound_dir = %config.inbound_dir.display(),
        outbound_dir = %config.outbound_dir.display(),
        database = %config.database,
        collection = %config.collection,
        "Starting TracOS synchronization"
    );

    let repositories = PostgresRepositories::connect_lazy(&config)
        .context("Cannot configure the TracOS store connection")?;
    let policy = RetryPolicy::exit_process();

    // Bundled migrations only provision the default collection.
    let pool = repositories.pool();
    policy
        .execute("run_migrations", || run_migrations(pool))
        .await
        .context("Cannot prepare the TracOS store")?;

    let store = RetryingStore::new(repositories.workorder_repository()?, policy);
    let orchestrator = SyncOrchestrator::new(store, FsMailbox::new(), &config)?;

    let report = orchestrator.run().await?;
    info!(
        report = %serde_json::to_string(&report)?,
        "TracOS synchronization finished"
    );
    Ok(())
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("info,tracos_sync=info,tracos_sync_postgres=info,sqlx=warn")
        }))
        .init();
}
