use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use tracos_sync_api::StoreResult;
use tracos_sync_db::repository::MarkSynced;

use crate::utils::bounded;

use super::repo_impl::WorkorderRepositoryImpl;

impl WorkorderRepositoryImpl {
    pub(super) async fn mark_synced_impl(repo: &WorkorderRepositoryImpl, number: i64) -> StoreResult<()> {
        let sql = format!(
            "UPDATE {} SET is_synced = TRUE, synced_at = $2 WHERE number = $1",
            repo.collection
        );
        bounded(
            "mark_synced",
            repo.operation_timeout,
            sqlx::query(&sql)
                .bind(number)
                .bind(Utc::now())
                .execute(&*repo.pool),
        )
        .await?;

        info!(number, "Marked workorder as synced in TracOS");
        Ok(())
    }
}

#[async_trait]
impl MarkSynced for WorkorderRepositoryImpl {
    async fn mark_synced(&self, number: i64) -> StoreResult<()> {
        Self::mark_synced_impl(self, number).await
    }
}
