use async_trait::async_trait;
use tracos_sync_api::StoreResult;

/// Repository trait for flagging a workorder as reconciled
#[async_trait]
pub trait MarkSynced: Send + Sync {
    /// Set `is_synced = true` and `synced_at = now` on the workorder with natural key `number`
    ///
    /// # Returns
    /// * `Ok(())` - The statement ran (matching no document is not an error)
    /// * `Err` - The update could not be executed
    async fn mark_synced(&self, number: i64) -> StoreResult<()>;
}
