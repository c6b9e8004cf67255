use async_trait::async_trait;
use tracing::{info, warn};

use tracos_sync_api::StoreResult;
use tracos_sync_db::models::tracos::TracosWorkorderModel;
use tracos_sync_db::repository::Update;

use crate::utils::bounded;

use super::repo_impl::WorkorderRepositoryImpl;

impl WorkorderRepositoryImpl {
    pub(super) async fn update_impl(
        repo: &WorkorderRepositoryImpl,
        item: TracosWorkorderModel,
    ) -> StoreResult<TracosWorkorderModel> {
        let sql = format!(
            r#"
            UPDATE {}
            SET status = $2, title = $3, description = $4,
                created_at = $5, updated_at = $6, deleted = $7, deleted_at = $8,
                is_synced = $9, synced_at = $10
            WHERE number = $1
            "#,
            repo.collection
        );

        let result = bounded(
            "update",
            repo.operation_timeout,
            sqlx::query(&sql)
                .bind(item.number)
                .bind(item.status.as_str())
                .bind(&item.title)
                .bind(&item.description)
                .bind(item.created_at)
                .bind(item.updated_at)
                .bind(item.deleted)
                .bind(item.deleted_at)
                .bind(item.is_synced)
                .bind(item.synced_at)
                .execute(&*repo.pool),
        )
        .await?;

        if result.rows_affected() == 1 {
            info!(number = item.number, "Updated workorder in TracOS");
        } else {
            warn!(
                number = item.number,
                rows = result.rows_affected(),
                "Workorder update matched no document"
            );
        }

        Ok(item)
    }
}

#[async_trait]
impl Update<TracosWorkorderModel> for WorkorderRepositoryImpl {
    async fn update(&self, item: TracosWorkorderModel) -> StoreResult<TracosWorkorderModel> {
        Self::update_impl(self, item).await
    }
}
