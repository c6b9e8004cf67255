use crate::models::tracos::TracosWorkorderModel;
use crate::repository::{CheckConnection, FindByNumber, FindUnsynced, Insert, MarkSynced, Update};

/// Every operation the synchronization run needs from the TracOS store.
///
/// Implemented automatically for any type providing the individual traits.
pub trait WorkorderStore:
    CheckConnection
    + FindByNumber<TracosWorkorderModel>
    + Insert<TracosWorkorderModel>
    + Update<TracosWorkorderModel>
    + FindUnsynced<TracosWorkorderModel>
    + MarkSynced
{
}

impl<S> WorkorderStore for S where
    S: CheckConnection
        + FindByNumber<TracosWorkorderModel>
        + Insert<TracosWorkorderModel>
        + Update<TracosWorkorderModel>
        + FindUnsynced<TracosWorkorderModel>
        + MarkSynced
{
}
