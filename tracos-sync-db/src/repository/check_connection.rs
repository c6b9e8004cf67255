use async_trait::async_trait;
use tracos_sync_api::StoreResult;

/// Repository trait for probing the store before a run
///
/// Implementations issue the cheapest possible round trip. A failure is an
/// ordinary store error, subject to the same retry policy as any other call.
#[async_trait]
pub trait CheckConnection: Send + Sync {
    /// Check that the store answers
    ///
    /// # Returns
    /// * `Ok(())` - The store answered
    /// * `Err` - The store could not be reached
    async fn check_connection(&self) -> StoreResult<()>;
}
