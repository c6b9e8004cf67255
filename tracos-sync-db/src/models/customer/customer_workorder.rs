use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

use tracos_sync_api::SyncError;

use crate::models::natural_key::NaturalKey;
use crate::utils::{option_utc_datetime, utc_datetime};

/// # Documentation
/// - Workorder as exchanged with the customer ERP through the mailbox directories
/// - Lifecycle is encoded as six mutually exclusive booleans; exactly one is true
/// - All timestamps must be UTC; naive or offset timestamps are rejected on deserialization
/// - Unknown fields are rejected, mirroring `additionalProperties: false` in the schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[validate(schema(function = "validate_exactly_one_status"))]
pub struct CustomerWorkorderModel {
    /// Natural key shared with TracOS `number`
    pub order_no: i64,

    pub is_active: bool,
    pub is_canceled: bool,
    pub is_deleted: bool,
    pub is_done: bool,
    pub is_on_hold: bool,
    pub is_pending: bool,

    pub is_synced: bool,

    pub summary: String,

    #[serde(with = "utc_datetime")]
    pub creation_date: DateTime<Utc>,

    #[serde(with = "utc_datetime")]
    pub last_update_date: DateTime<Utc>,

    #[serde(default, with = "option_utc_datetime")]
    pub deleted_date: Option<DateTime<Utc>>,
}

impl NaturalKey for CustomerWorkorderModel {
    fn natural_key(&self) -> i64 {
        self.order_no
    }
}

impl CustomerWorkorderModel {
    /// The six status flags in their wire names.
    pub fn status_flags(&self) -> [(&'static str, bool); 6] {
        [
            ("isActive", self.is_active),
            ("isCanceled", self.is_canceled),
            ("isDeleted", self.is_deleted),
            ("isDone", self.is_done),
            ("isOnHold", self.is_on_hold),
            ("isPending", self.is_pending),
        ]
    }

    pub fn active_status_count(&self) -> usize {
        self.status_flags().iter().filter(|(_, set)| *set).count()
    }

    /// Builds a model from a raw JSON document and checks its invariants.
    ///
    /// `subject` names the document (usually its file) in error messages.
    pub fn from_value(value: Value, subject: &str) -> Result<Self, SyncError> {
        let model: Self =
            serde_json::from_value(value).map_err(|e| SyncError::StructuralValidation {
                subject: subject.to_string(),
                errors: vec![e.to_string()],
            })?;
        model.check_invariants(subject)?;
        Ok(model)
    }

    pub fn check_invariants(&self, subject: &str) -> Result<(), SyncError> {
        self.validate().map_err(|errors| SyncError::BusinessInvariant {
            subject: subject.to_string(),
            reason: errors.to_string(),
        })
    }
}

fn validate_exactly_one_status(model: &CustomerWorkorderModel) -> Result<(), ValidationError> {
    if model.active_status_count() == 1 {
        return Ok(());
    }
    let mut error = ValidationError::new("exactly_one_status");
    error.message = Some(
        "Exactly one of isActive, isCanceled, isDeleted, isDone, isOnHold, or isPending must be true"
            .into(),
    );
    Err(error)
}
