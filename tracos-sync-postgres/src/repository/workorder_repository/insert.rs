use async_trait::async_trait;
use sqlx::Row;
use tracing::info;
use uuid::Uuid;

use tracos_sync_api::StoreResult;
use tracos_sync_db::models::tracos::TracosWorkorderModel;
use tracos_sync_db::repository::Insert;

use crate::utils::bounded;

use super::repo_impl::WorkorderRepositoryImpl;

impl WorkorderRepositoryImpl {
    pub(super) async fn insert_impl(
        repo: &WorkorderRepositoryImpl,
        item: TracosWorkorderModel,
    ) -> StoreResult<TracosWorkorderModel> {
        let sql = format!(
            r#"
            INSERT INTO {} (
                number, status, title, description,
                created_at, updated_at, deleted, deleted_at,
                is_synced, synced_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
            repo.collection
        );

        let row = bounded(
            "insert",
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
                .fetch_one(&*repo.pool),
        )
        .await?;

        let id: Uuid = row.try_get("id")?;
        info!(number = item.number, %id, "Inserted workorder into TracOS");

        Ok(TracosWorkorderModel { id: Some(id), ..item })
    }
}

#[async_trait]
impl Insert<TracosWorkorderModel> for WorkorderRepositoryImpl {
    async fn insert(&self, item: TracosWorkorderModel) -> StoreResult<TracosWorkorderModel> {
        Self::insert_impl(self, item).await
    }
}
