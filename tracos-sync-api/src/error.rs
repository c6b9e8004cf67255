use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Underlying cause of a mailbox failure.
///
/// The mailbox adapter collapses every failure to an empty list, an absent
/// document or `false`; this kind is kept for logging and for callers that
/// need to tell the causes apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailboxErrorKind {
    NotFound,
    NotADirectory,
    PermissionDenied,
    Malformed,
    Io,
}

impl fmt::Display for MailboxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MailboxErrorKind::NotFound => write!(f, "not found"),
            MailboxErrorKind::NotADirectory => write!(f, "not a directory"),
            MailboxErrorKind::PermissionDenied => write!(f, "permission denied"),
            MailboxErrorKind::Malformed => write!(f, "malformed JSON"),
            MailboxErrorKind::Io => write!(f, "I/O error"),
        }
    }
}

#[derive(Error, Debug)]
#[error("{kind} at {}: {detail}", .path.display())]
pub struct MailboxError {
    pub path: PathBuf,
    pub kind: MailboxErrorKind,
    pub detail: String,
}

impl MailboxError {
    pub fn new(path: impl Into<PathBuf>, kind: MailboxErrorKind, detail: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            detail: detail.into(),
        }
    }

    /// Classifies an I/O failure on `path`.
    pub fn from_io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => MailboxErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => MailboxErrorKind::PermissionDenied,
            _ => MailboxErrorKind::Io,
        };
        Self::new(path, kind, err.to_string())
    }
}

/// Errors raised by the TracOS store adapter.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Store operation `{operation}` timed out after {timeout_ms} ms")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("Query error: {0}")]
    Query(String),

    /// A stored document could not be decoded into a canonical record.
    #[error("Corrupt document: {0}")]
    DocumentCorrupt(String),

    /// Every attempt allowed by the retry policy failed.
    #[error("Store unavailable: `{operation}` failed after {attempts} attempts: {source}")]
    Unavailable {
        operation: String,
        attempts: u32,
        #[source]
        source: Box<StoreError>,
    },
}

impl StoreError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable { .. })
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Configuration(_) => StoreError::Connection(err.to_string()),
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                StoreError::DocumentCorrupt(err.to_string())
            }
            _ => StoreError::Query(err.to_string()),
        }
    }
}

/// Per-record and run-level synchronization failures.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Raw JSON does not satisfy the customer schema.
    #[error("Structural validation failed for {subject}: {}", .errors.join("; "))]
    StructuralValidation { subject: String, errors: Vec<String> },

    /// Schema-valid data that still violates a model invariant.
    #[error("Business invariant violated for {subject}: {reason}")]
    BusinessInvariant { subject: String, reason: String },

    #[error("Translation error: {0}")]
    Translation(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Mailbox read failed for {}", .path.display())]
    MailboxRead { path: PathBuf },

    #[error("Mailbox write failed for workorder #{order_no} into {}", .dir.display())]
    MailboxWrite { dir: PathBuf, order_no: i64 },
}

impl SyncError {
    /// Store failures reach the orchestrator only once the retry policy gave
    /// up, so they end the run. Everything else is isolated to one record.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SyncError::Store(_))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

pub type StoreResult<T> = Result<T, StoreError>;
pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_store_errors_are_fatal() {
        let store = SyncError::Store(StoreError::Connection("refused".to_string()));
        assert!(store.is_fatal());

        let structural = SyncError::StructuralValidation {
            subject: "1.json".to_string(),
            errors: vec!["missing orderNo".to_string()],
        };
        assert!(!structural.is_fatal());
        assert!(!SyncError::Translation("no rule".to_string()).is_fatal());
        assert!(!SyncError::MailboxRead { path: PathBuf::from("a.json") }.is_fatal());
    }

    #[test]
    fn test_mailbox_error_from_io_keeps_cause() {
        let not_found = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = MailboxError::from_io("inbound/1.json", &not_found);
        assert_eq!(err.kind, MailboxErrorKind::NotFound);

        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err = MailboxError::from_io("inbound/1.json", &denied);
        assert_eq!(err.kind, MailboxErrorKind::PermissionDenied);

        let other = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert_eq!(MailboxError::from_io("x", &other).kind, MailboxErrorKind::Io);
    }

    #[test]
    fn test_structural_error_lists_every_violation() {
        let err = SyncError::StructuralValidation {
            subject: "7.json".to_string(),
            errors: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.to_string(), "Structural validation failed for 7.json: a; b");
    }
}
