//! Sync Orchestrator
//!
//! One run is a connection check, a full inbound pass (customer mailbox into
//! TracOS) and a full outbound pass (unsynced TracOS records into the
//! customer mailbox). Records are processed one at a time. Per-record
//! failures are logged and counted; only store failures abort the run.

use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use tracos_sync_api::{SyncConfig, SyncError, SyncResult};
use tracos_sync_db::models::customer::CustomerWorkorderModel;
use tracos_sync_db::models::tracos::TracosWorkorderModel;
use tracos_sync_db::repository::WorkorderStore;
use tracos_sync_db::schema::CustomerSchemaValidator;
use tracos_sync_db::translator::{customer_to_tracos, tracos_to_customer};

use crate::mailbox::CustomerMailbox;
use crate::report::{InboundReport, OutboundReport, SyncReport};

/// What an inbound record did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundOutcome {
    Inserted,
    Updated,
    Unchanged,
}

impl InboundReport {
    fn record(&mut self, outcome: InboundOutcome) {
        match outcome {
            InboundOutcome::Inserted => self.inserted += 1,
            InboundOutcome::Updated => self.updated += 1,
            InboundOutcome::Unchanged => self.unchanged += 1,
        }
    }
}

pub struct SyncOrchestrator<S, M> {
    store: S,
    mailbox: M,
    schema: CustomerSchemaValidator,
    inbound_dir: PathBuf,
    outbound_dir: PathBuf,
}

impl<S, M> SyncOrchestrator<S, M>
where
    S: WorkorderStore,
    M: CustomerMailbox,
{
    pub fn new(store: S, mailbox: M, config: &SyncConfig) -> SyncResult<Self> {
        Ok(Self {
            store,
            mailbox,
            schema: CustomerSchemaValidator::new()?,
            inbound_dir: config.inbound_dir.clone(),
            outbound_dir: config.outbound_dir.clone(),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn mailbox(&self) -> &M {
        &self.mailbox
    }

    /// Runs both passes to completion.
    ///
    /// # Returns
    /// The per-pass counters, or the store error that stopped the run.
    pub async fn run(&self) -> SyncResult<SyncReport> {
        self.store.check_connection().await?;
        info!("Connected to TracOS store");

        let inbound = self.sync_inbound().await?;
        let outbound = self.sync_outbound().await?;

        let report = SyncReport { inbound, outbound };
        info!(%report, "Synchronization run complete");
        Ok(report)
    }

    pub async fn sync_inbound(&self) -> SyncResult<InboundReport> {
        let mut report = InboundReport::default();
        let candidates = self.mailbox.list_candidates(&self.inbound_dir).await;
        info!(
            dir = %self.inbound_dir.display(),
            count = candidates.len(),
            "Starting inbound pass"
        );

        for path in candidates {
            match self.ingest_file(&path).await {
                Ok(outcome) => report.record(outcome),
                Err(err) if err.is_fatal() => return Err(err),
                Err(err @ SyncError::Translation(_)) => {
                    error!(path = %path.display(), error = %err, "Validated workorder has no status mapping, skipping");
                    report.skipped += 1;
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "Skipping inbound file");
                    report.skipped += 1;
                }
            }
        }

        Ok(report)
    }

    async fn ingest_file(&self, path: &Path) -> SyncResult<InboundOutcome> {
        let subject = path.display().to_string();
        let document = self
            .mailbox
            .read(path)
            .await
            .ok_or_else(|| SyncError::MailboxRead {
                path: path.to_path_buf(),
            })?;

        self.schema.validate(&subject, &document)?;
        let customer = CustomerWorkorderModel::from_value(document, &subject)?;
        let incoming = customer_to_tracos(&customer)?;
        self.reconcile(incoming).await
    }

    /// Last-write-wins merge of one translated record into the store.
    ///
    /// The stored record is replaced only when its `updated_at` is strictly
    /// older; ties keep the store's version. Every write stamps the record as
    /// synced.
    pub async fn reconcile(&self, incoming: TracosWorkorderModel) -> SyncResult<InboundOutcome> {
        let number = incoming.number;
        warn_on_inconsistent_deletion(&incoming);

        match self.store.find_by_number(number).await? {
            None => {
                let record = incoming.mark_synced_at(Utc::now());
                self.store.insert(record).await?;
                info!(number, "Inserted workorder into TracOS");
                Ok(InboundOutcome::Inserted)
            }
            Some(existing) if existing.is_older_than(&incoming) => {
                let record = TracosWorkorderModel {
                    id: existing.id,
                    ..incoming
                }
                .mark_synced_at(Utc::now());
                self.store.update(record).await?;
                info!(
                    number,
                    stored_updated_at = %existing.updated_at,
                    "Updated stale TracOS workorder"
                );
                Ok(InboundOutcome::Updated)
            }
            Some(existing) => {
                debug!(
                    number,
                    stored_updated_at = %existing.updated_at,
                    incoming_updated_at = %incoming.updated_at,
                    "TracOS workorder is as recent as the inbound one, keeping it"
                );
                Ok(InboundOutcome::Unchanged)
            }
        }
    }

    pub async fn sync_outbound(&self) -> SyncResult<OutboundReport> {
        let mut report = OutboundReport::default();
        let pending = self.store.find_unsynced().await?;
        info!(
            dir = %self.outbound_dir.display(),
            count = pending.len(),
            "Starting outbound pass"
        );

        for workorder in pending {
            warn_on_inconsistent_deletion(&workorder);
            let number = workorder.number;
            let customer = tracos_to_customer(&workorder);

            if let Err(err) = self.check_outbound(number, &customer) {
                error!(number, error = %err, "Translated workorder does not match the customer schema, skipping");
                report.rejected += 1;
                continue;
            }

            if !self.mailbox.write(&self.outbound_dir, &customer).await {
                let err = SyncError::MailboxWrite {
                    dir: self.outbound_dir.clone(),
                    order_no: number,
                };
                warn!(number, error = %err, "Leaving workorder unsynced for the next run");
                report.write_failed += 1;
                continue;
            }

            self.store.mark_synced(number).await?;
            report.written += 1;
        }

        Ok(report)
    }

    fn check_outbound(&self, number: i64, customer: &CustomerWorkorderModel) -> SyncResult<()> {
        let subject = format!("outbound workorder #{number}");
        let document =
            serde_json::to_value(customer).map_err(|e| SyncError::StructuralValidation {
                subject: subject.clone(),
                errors: vec![e.to_string()],
            })?;
        self.schema.validate(&subject, &document)
    }
}

fn warn_on_inconsistent_deletion(workorder: &TracosWorkorderModel) {
    if !workorder.has_consistent_deletion() {
        warn!(
            number = workorder.number,
            deleted = workorder.deleted,
            deleted_at = ?workorder.deleted_at,
            "Workorder deletion flag and deletion date disagree"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailbox::FsMailbox;
    use crate::test_utils::test_utils::{
        customer_document, drop_document, t0, tracos_workorder, InMemoryWorkorderStore,
        ReadOnlyMailbox,
    };
    use chrono::Duration;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tracos_sync_db::models::tracos::WorkorderStatus;
    use tracos_sync_postgres::{RetryPolicy, RetryingStore};

    type TestResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

    struct Mailboxes {
        inbound: TempDir,
        outbound: TempDir,
    }

    impl Mailboxes {
        fn new() -> Self {
            Self {
                inbound: TempDir::new().unwrap(),
                outbound: TempDir::new().unwrap(),
            }
        }

        fn config(&self) -> SyncConfig {
            SyncConfig {
                inbound_dir: self.inbound.path().to_path_buf(),
                outbound_dir: self.outbound.path().to_path_buf(),
                ..SyncConfig::default()
            }
        }

        fn put(&self, name: &str, document: &serde_json::Value) {
            drop_document(self.inbound.path(), name, document);
        }
    }

    fn orchestrator(
        store: InMemoryWorkorderStore,
        mailboxes: &Mailboxes,
    ) -> SyncOrchestrator<InMemoryWorkorderStore, FsMailbox> {
        SyncOrchestrator::new(store, FsMailbox::new(), &mailboxes.config()).unwrap()
    }

    #[tokio::test]
    async fn test_new_inbound_workorder_is_inserted_as_synced() -> TestResult {
        let mailboxes = Mailboxes::new();
        mailboxes.put(
            "100.json",
            &customer_document(100, "isDone", "Test workorder for E2E", t0()),
        );
        let sync = orchestrator(InMemoryWorkorderStore::new(), &mailboxes);

        let report = sync.run().await?;

        let stored = sync.store().get(100).expect("workorder 100 inserted");
        assert_eq!(stored.status, WorkorderStatus::Completed);
        assert!(!stored.deleted);
        assert!(stored.is_synced);
        assert!(stored.synced_at.is_some());
        assert!(stored.id.is_some());
        assert_eq!(stored.description, "Test workorder for E2E");
        assert_eq!(stored.title, "Example workorder #100");
        assert_eq!(report.inbound.inserted, 1);
        assert_eq!(report.outbound.written, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_newer_inbound_workorder_replaces_stale_record() -> TestResult {
        let mailboxes = Mailboxes::new();
        let stale = TracosWorkorderModel {
            description: "Original description".to_string(),
            is_synced: false,
            synced_at: None,
            ..tracos_workorder(101, WorkorderStatus::Pending, t0() - Duration::hours(2))
        };
        let store = InMemoryWorkorderStore::with_records(vec![stale]);
        let original_id = store.get(101).and_then(|w| w.id);
        mailboxes.put("101.json", &customer_document(101, "isDone", "Pump replaced", t0()));
        let sync = orchestrator(store, &mailboxes);

        let report = sync.run().await?;

        let stored = sync.store().get(101).expect("workorder 101 present");
        assert_eq!(stored.status, WorkorderStatus::Completed);
        assert_eq!(stored.description, "Pump replaced");
        assert_eq!(stored.updated_at, t0());
        assert_eq!(stored.id, original_id);
        // Absorbing an inbound change marks the record synced, so it is not echoed back.
        assert!(stored.is_synced);
        assert_eq!(report.inbound.updated, 1);
        assert_eq!(report.outbound.processed(), 0);
        assert!(!mailboxes.outbound.path().join("101.json").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_older_inbound_workorder_is_discarded() -> TestResult {
        let mailboxes = Mailboxes::new();
        let current = TracosWorkorderModel {
            description: "Original description".to_string(),
            ..tracos_workorder(800, WorkorderStatus::Completed, t0())
        };
        let store = InMemoryWorkorderStore::with_records(vec![current.clone()]);
        mailboxes.put(
            "800.json",
            &customer_document(800, "isActive", "Reopened", t0() - Duration::hours(2)),
        );
        let sync = orchestrator(store, &mailboxes);

        let report = sync.run().await?;

        assert_eq!(sync.store().get(800), Some(current));
        assert_eq!(report.inbound.unchanged, 1);
        assert_eq!(sync.store().mutations(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_equal_timestamps_keep_the_stored_record() -> TestResult {
        let mailboxes = Mailboxes::new();
        let current = tracos_workorder(5, WorkorderStatus::OnHold, t0());
        let store = InMemoryWorkorderStore::with_records(vec![current.clone()]);
        mailboxes.put("5.json", &customer_document(5, "isCanceled", "Tie", t0()));
        let sync = orchestrator(store, &mailboxes);

        let report = sync.sync_inbound().await?;

        assert_eq!(sync.store().get(5), Some(current));
        assert_eq!(report.unchanged, 1);
        assert_eq!(report.mutations(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_one_millisecond_newer_inbound_wins() -> TestResult {
        let mailboxes = Mailboxes::new();
        let store = InMemoryWorkorderStore::with_records(vec![tracos_workorder(
            6,
            WorkorderStatus::OnHold,
            t0(),
        )]);
        mailboxes.put(
            "6.json",
            &customer_document(6, "isCanceled", "Later", t0() + Duration::milliseconds(1)),
        );
        let sync = orchestrator(store, &mailboxes);

        let report = sync.sync_inbound().await?;

        assert_eq!(report.updated, 1);
        assert_eq!(sync.store().get(6).map(|w| w.status), Some(WorkorderStatus::Cancelled));
        Ok(())
    }

    #[tokio::test]
    async fn test_unsynced_workorder_is_written_and_marked_synced() -> TestResult {
        let mailboxes = Mailboxes::new();
        let unsynced = TracosWorkorderModel {
            is_synced: false,
            synced_at: None,
            ..tracos_workorder(200, WorkorderStatus::InProgress, t0())
        };
        let sync = orchestrator(InMemoryWorkorderStore::with_records(vec![unsynced]), &mailboxes);

        let report = sync.run().await?;

        let written = std::fs::read_to_string(mailboxes.outbound.path().join("200.json"))?;
        let written: serde_json::Value = serde_json::from_str(&written)?;
        assert_eq!(written["orderNo"], json!(200));
        assert_eq!(written["isActive"], json!(true));
        assert_eq!(written["isSynced"], json!(true));
        assert!(CustomerSchemaValidator::new()?.is_valid(&written));

        let stored = sync.store().get(200).expect("workorder 200 present");
        assert!(stored.is_synced);
        assert!(stored.synced_at.is_some());
        assert_eq!(report.outbound.written, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_write_leaves_workorder_unsynced() -> TestResult {
        let mailboxes = Mailboxes::new();
        let unsynced = TracosWorkorderModel {
            is_synced: false,
            synced_at: None,
            ..tracos_workorder(300, WorkorderStatus::Pending, t0())
        };
        let store = InMemoryWorkorderStore::with_records(vec![unsynced]);
        let sync = SyncOrchestrator::new(store, ReadOnlyMailbox::new(), &mailboxes.config())?;

        let report = sync.run().await?;

        assert_eq!(report.outbound.write_failed, 1);
        assert_eq!(report.outbound.written, 0);
        assert!(!sync.store().get(300).map(|w| w.is_synced).unwrap_or(true));
        assert_eq!(sync.store().mutations(), 0);

        // Still eligible next time.
        let again = sync.sync_outbound().await?;
        assert_eq!(again.write_failed, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_outbound_directory_leaves_workorder_unsynced() -> TestResult {
        let mailboxes = Mailboxes::new();
        let mut config = mailboxes.config();
        config.outbound_dir = mailboxes.outbound.path().join("missing");
        let unsynced = TracosWorkorderModel {
            is_synced: false,
            synced_at: None,
            ..tracos_workorder(301, WorkorderStatus::Completed, t0())
        };
        let sync = SyncOrchestrator::new(
            InMemoryWorkorderStore::with_records(vec![unsynced]),
            FsMailbox::new(),
            &config,
        )?;

        let report = sync.sync_outbound().await?;

        assert_eq!(report.write_failed, 1);
        assert_eq!(sync.store().unsynced_numbers(), vec![301]);
        Ok(())
    }

    #[tokio::test]
    async fn test_deleted_cancelled_workorder_is_rejected_on_the_way_out() -> TestResult {
        let mailboxes = Mailboxes::new();
        let deleted = TracosWorkorderModel {
            deleted: true,
            deleted_at: Some(t0()),
            is_synced: false,
            synced_at: None,
            ..tracos_workorder(900, WorkorderStatus::Cancelled, t0())
        };
        let pending = TracosWorkorderModel {
            is_synced: false,
            synced_at: None,
            ..tracos_workorder(901, WorkorderStatus::Pending, t0())
        };
        let sync = orchestrator(
            InMemoryWorkorderStore::with_records(vec![deleted, pending]),
            &mailboxes,
        );

        let report = sync.sync_outbound().await?;

        // Both isCanceled and isDeleted come out true, which the schema forbids.
        assert_eq!(report.rejected, 1);
        assert_eq!(report.written, 1);
        assert!(!mailboxes.outbound.path().join("900.json").exists());
        assert!(mailboxes.outbound.path().join("901.json").exists());
        assert_eq!(sync.store().unsynced_numbers(), vec![900]);
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_siblings_do_not_stop_the_batch() -> TestResult {
        let mailboxes = Mailboxes::new();
        std::fs::write(mailboxes.inbound.path().join("400.json"), "{\"orderNo\": 400,")?;

        let mut two_statuses = customer_document(402, "isDone", "Two statuses", t0());
        two_statuses["isPending"] = json!(true);
        mailboxes.put("402.json", &two_statuses);

        let mut missing_summary = customer_document(403, "isDone", "No summary", t0());
        if let Some(fields) = missing_summary.as_object_mut() {
            fields.remove("summary");
        }
        mailboxes.put("403.json", &missing_summary);

        let mut naive_date = customer_document(404, "isDone", "Naive date", t0());
        naive_date["lastUpdateDate"] = json!("2024-06-01T12:00:00");
        mailboxes.put("404.json", &naive_date);

        mailboxes.put("401.json", &customer_document(401, "isOnHold", "Valid", t0()));
        let sync = orchestrator(InMemoryWorkorderStore::new(), &mailboxes);

        let report = sync.run().await?;

        assert_eq!(report.inbound.skipped, 4);
        assert_eq!(report.inbound.inserted, 1);
        assert_eq!(sync.store().numbers(), vec![401]);
        let stored = sync.store().get(401).expect("workorder 401 present");
        assert_eq!(stored.status, WorkorderStatus::OnHold);
        assert_eq!(stored.description, "Valid");
        assert_eq!(stored.updated_at, t0());
        Ok(())
    }

    #[tokio::test]
    async fn test_second_inbound_pass_makes_no_mutations() -> TestResult {
        let mailboxes = Mailboxes::new();
        mailboxes.put("10.json", &customer_document(10, "isPending", "First", t0()));
        mailboxes.put("11.json", &customer_document(11, "isDeleted", "Second", t0()));
        let sync = orchestrator(InMemoryWorkorderStore::new(), &mailboxes);

        let first = sync.run().await?;
        let after_first = sync.store().mutations();
        let second = sync.run().await?;

        assert_eq!(first.inbound.inserted, 2);
        assert_eq!(after_first, 2);
        assert_eq!(second.inbound.unchanged, 2);
        assert_eq!(second.inbound.mutations(), 0);
        assert_eq!(sync.store().mutations(), after_first);
        Ok(())
    }

    #[tokio::test]
    async fn test_sub_microsecond_timestamps_stay_idempotent() -> TestResult {
        let mailboxes = Mailboxes::new();
        let mut document = customer_document(7, "isDone", "Seven fraction digits", t0());
        document["creationDate"] = json!("2024-01-01T10:00:00.7654321Z");
        document["lastUpdateDate"] = json!("2024-01-02T10:00:00.1234567Z");
        mailboxes.put("7.json", &document);
        let sync = orchestrator(InMemoryWorkorderStore::new(), &mailboxes);

        let first = sync.run().await?;
        let synced_at = sync.store().get(7).and_then(|w| w.synced_at);
        let second = sync.run().await?;
        let third = sync.run().await?;

        assert_eq!(first.inbound.inserted, 1);
        assert_eq!(second.inbound.unchanged, 1);
        assert_eq!(second.inbound.mutations(), 0);
        assert_eq!(third.inbound.mutations(), 0);
        assert_eq!(sync.store().mutations(), 1);
        assert_eq!(sync.store().get(7).and_then(|w| w.synced_at), synced_at);
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_stored_record_is_treated_as_absent() -> TestResult {
        let mailboxes = Mailboxes::new();
        let store = InMemoryWorkorderStore::with_records(vec![tracos_workorder(
            12,
            WorkorderStatus::Pending,
            t0() - Duration::days(1),
        )]);
        store.corrupt(12);
        mailboxes.put("12.json", &customer_document(12, "isDone", "Retry", t0()));
        let sync = orchestrator(store, &mailboxes);

        // The insert collides with the hidden row and surfaces as a store error.
        let err = sync.run().await.unwrap_err();
        assert!(err.is_fatal());
        Ok(())
    }

    #[tokio::test]
    async fn test_store_outage_aborts_the_run_after_one_retry() {
        let mailboxes = Mailboxes::new();
        mailboxes.put("20.json", &customer_document(20, "isDone", "Never stored", t0()));

        let exhausted = Arc::new(Mutex::new(Vec::new()));
        let sink = exhausted.clone();
        let policy = RetryPolicy::fail_fast(move |operation, _| sink.lock().push(operation.to_string()));
        let inner = InMemoryWorkorderStore::new();
        inner.set_unavailable(true);
        let store = RetryingStore::new(inner, policy);
        let sync = SyncOrchestrator::new(store, FsMailbox::new(), &mailboxes.config()).unwrap();

        let err = sync.run().await.unwrap_err();

        assert!(err.is_fatal());
        assert!(matches!(err, SyncError::Store(ref e) if e.is_unavailable()));
        assert_eq!(*exhausted.lock(), vec!["check_connection".to_string()]);
        assert_eq!(sync.store().inner().calls(), 2);
    }

    #[tokio::test]
    async fn test_transient_store_error_is_absorbed_by_the_retry() -> TestResult {
        let mailboxes = Mailboxes::new();
        mailboxes.put("21.json", &customer_document(21, "isActive", "Flaky", t0()));

        let inner = InMemoryWorkorderStore::new();
        inner.fail_next(1);
        let store = RetryingStore::new(inner, RetryPolicy::fail_fast(|_, _| panic!("retry exhausted")));
        let sync = SyncOrchestrator::new(store, FsMailbox::new(), &mailboxes.config())?;

        let report = sync.run().await?;

        assert_eq!(report.inbound.inserted, 1);
        assert!(sync.store().inner().get(21).is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_inbound_directory_means_no_work() -> TestResult {
        let mailboxes = Mailboxes::new();
        let mut config = mailboxes.config();
        config.inbound_dir = mailboxes.inbound.path().join("missing");
        let sync = SyncOrchestrator::new(InMemoryWorkorderStore::new(), FsMailbox::new(), &config)?;

        let report = sync.run().await?;

        assert_eq!(report, SyncReport::default());
        Ok(())
    }
}
