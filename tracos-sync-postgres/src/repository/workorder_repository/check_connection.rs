use async_trait::async_trait;
use tracing::debug;

use tracos_sync_api::StoreResult;
use tracos_sync_db::repository::CheckConnection;

use crate::utils::bounded;

use super::repo_impl::WorkorderRepositoryImpl;

impl WorkorderRepositoryImpl {
    pub(super) async fn check_connection_impl(repo: &WorkorderRepositoryImpl) -> StoreResult<()> {
        let query = sqlx::query_scalar::<_, i32>("SELECT 1");
        bounded(
            "check_connection",
            repo.operation_timeout,
            query.fetch_one(&*repo.pool),
        )
        .await?;
        debug!("TracOS store answered connection check");
        Ok(())
    }
}

#[async_trait]
impl CheckConnection for WorkorderRepositoryImpl {
    async fn check_connection(&self) -> StoreResult<()> {
        Self::check_connection_impl(self).await
    }
}
