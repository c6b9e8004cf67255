use async_trait::async_trait;
use tracing::{info, warn};

use tracos_sync_api::StoreResult;
use tracos_sync_db::models::tracos::TracosWorkorderModel;
use tracos_sync_db::repository::FindUnsynced;

use crate::utils::{bounded, TryFromRow};

use super::repo_impl::{WorkorderRepositoryImpl, WORKORDER_COLUMNS};

impl WorkorderRepositoryImpl {
    pub(super) async fn find_unsynced_impl(
        repo: &WorkorderRepositoryImpl,
    ) -> StoreResult<Vec<TracosWorkorderModel>> {
        info!(collection = %repo.collection, "Querying TracOS for unsynced workorders");

        let sql = format!(
            "SELECT {WORKORDER_COLUMNS} FROM {} WHERE is_synced = FALSE ORDER BY number",
            repo.collection
        );
        let rows = bounded(
            "find_unsynced",
            repo.operation_timeout,
            sqlx::query(&sql).fetch_all(&*repo.pool),
        )
        .await?;

        let mut workorders = Vec::with_capacity(rows.len());
        for row in rows {
            match TracosWorkorderModel::try_from_row(&row) {
                Ok(workorder) => workorders.push(workorder),
                Err(e) => warn!(error = %e, "Invalid workorder document skipped"),
            }
        }
        Ok(workorders)
    }
}

#[async_trait]
impl FindUnsynced<TracosWorkorderModel> for WorkorderRepositoryImpl {
    async fn find_unsynced(&self) -> StoreResult<Vec<TracosWorkorderModel>> {
        Self::find_unsynced_impl(self).await
    }
}
