use async_trait::async_trait;
use tracos_sync_api::StoreResult;

use crate::models::natural_key::NaturalKey;

/// Repository trait for replacing a workorder matched by natural key
///
/// Every field except the store-assigned identity is overwritten.
#[async_trait]
pub trait Update<T: NaturalKey>: Send + Sync {
    /// Replace the stored workorder with the same natural key as `item`
    ///
    /// # Returns
    /// * `Ok(T)` - The workorder as written
    /// * `Err` - The update could not be executed
    async fn update(&self, item: T) -> StoreResult<T>;
}
