use async_trait::async_trait;
use tracing::{error, info};

use tracos_sync_api::StoreResult;
use tracos_sync_db::models::tracos::TracosWorkorderModel;
use tracos_sync_db::repository::FindByNumber;

use crate::utils::{bounded, TryFromRow};

use super::repo_impl::{WorkorderRepositoryImpl, WORKORDER_COLUMNS};

impl WorkorderRepositoryImpl {
    pub(super) async fn find_by_number_impl(
        repo: &WorkorderRepositoryImpl,
        number: i64,
    ) -> StoreResult<Option<TracosWorkorderModel>> {
        info!(number, collection = %repo.collection, "Querying workorder by number");

        let sql = format!(
            "SELECT {WORKORDER_COLUMNS} FROM {} WHERE number = $1",
            repo.collection
        );
        let row = bounded(
            "find_by_number",
            repo.operation_timeout,
            sqlx::query(&sql).bind(number).fetch_optional(&*repo.pool),
        )
        .await?;

        let Some(row) = row else {
            info!(number, "Workorder not found in TracOS");
            return Ok(None);
        };

        match TracosWorkorderModel::try_from_row(&row) {
            Ok(workorder) => Ok(Some(workorder)),
            Err(e) => {
                // Known gap: a corrupt row reads as absent, and the insert
                // that follows collides with it on the unique number.
                error!(number, error = %e, "Stored document is not a valid TracOS workorder, treating as absent");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl FindByNumber<TracosWorkorderModel> for WorkorderRepositoryImpl {
    async fn find_by_number(&self, number: i64) -> StoreResult<Option<TracosWorkorderModel>> {
        Self::find_by_number_impl(self, number).await
    }
}
