use async_trait::async_trait;
use tracos_sync_api::StoreResult;

use crate::models::natural_key::NaturalKey;

/// Repository trait for listing workorders still waiting to be sent out
///
/// Documents that cannot be decoded are logged and left out of the result.
#[async_trait]
pub trait FindUnsynced<T: NaturalKey>: Send + Sync {
    /// Find every workorder with `is_synced = false`
    ///
    /// # Returns
    /// * `Ok(Vec<T>)` - The unsynced workorders; ordering is not part of the contract
    /// * `Err` - The query could not be executed
    async fn find_unsynced(&self) -> StoreResult<Vec<T>>;
}
