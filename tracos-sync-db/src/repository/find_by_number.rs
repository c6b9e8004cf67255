use async_trait::async_trait;
use tracos_sync_api::StoreResult;

use crate::models::natural_key::NaturalKey;

/// Repository trait for finding a workorder by its natural key
///
/// A stored document that cannot be decoded into `T` is reported as absent,
/// so the caller's insert-or-update decision treats it as "not found".
///
/// # Type Parameters
/// * `T` - The workorder type, identified by its natural key
///
/// # Example
/// ```ignore
/// impl FindByNumber<TracosWorkorderModel> for WorkorderRepositoryImpl {
///     async fn find_by_number(&self, number: i64) -> StoreResult<Option<TracosWorkorderModel>> {
///         // Implementation
///     }
/// }
/// ```
#[async_trait]
pub trait FindByNumber<T: NaturalKey>: Send + Sync {
    /// Find a workorder by its natural key
    ///
    /// # Arguments
    /// * `number` - The natural key of the workorder
    ///
    /// # Returns
    /// * `Ok(Some(T))` - The found workorder
    /// * `Ok(None)` - No document exists, or the stored document is corrupt
    /// * `Err` - The query could not be executed
    async fn find_by_number(&self, number: i64) -> StoreResult<Option<T>>;
}
