use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::natural_key::NaturalKey;
use crate::models::tracos::workorder_status::WorkorderStatus;

/// # Documentation
/// - Canonical workorder as stored in TracOS
/// - `id` is assigned by the store on insert and never set by callers
/// - `number` is the natural key and is unique across the store
/// - Records are never removed; deletion is carried by `deleted` / `deleted_at`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TracosWorkorderModel {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    /// Natural key shared with the customer `orderNo`
    pub number: i64,

    pub status: WorkorderStatus,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,

    /// False while the record still has to be written to the customer mailbox
    pub is_synced: bool,
    pub synced_at: Option<DateTime<Utc>>,
}

impl NaturalKey for TracosWorkorderModel {
    fn natural_key(&self) -> i64 {
        self.number
    }
}

impl TracosWorkorderModel {
    /// Returns the record flagged as reconciled at `at`.
    pub fn mark_synced_at(mut self, at: DateTime<Utc>) -> Self {
        self.is_synced = true;
        self.synced_at = Some(at);
        self
    }

    /// True when `incoming` was updated strictly after this record.
    /// Equal timestamps keep the stored version.
    pub fn is_older_than(&self, incoming: &TracosWorkorderModel) -> bool {
        self.updated_at < incoming.updated_at
    }

    /// `deleted_at` should be set exactly when `deleted` is. Not enforced.
    pub fn has_consistent_deletion(&self) -> bool {
        self.deleted == self.deleted_at.is_some()
    }
}
