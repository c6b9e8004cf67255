use async_trait::async_trait;
use tracos_sync_api::StoreResult;

use crate::models::natural_key::NaturalKey;

/// Repository trait for persisting a new workorder
///
/// The store assigns the identity; any identity already present on `item` is
/// ignored. A natural-key conflict is not handled specially and surfaces as
/// an ordinary store error.
#[async_trait]
pub trait Insert<T: NaturalKey>: Send + Sync {
    /// Persist a new workorder
    ///
    /// # Returns
    /// * `Ok(T)` - The stored workorder with its store-assigned identity
    /// * `Err` - The insert could not be executed
    async fn insert(&self, item: T) -> StoreResult<T>;
}
