use serde::Serialize;
use std::fmt;

/// # Documentation
/// - Outcome counters of the inbound pass
/// - `skipped` counts files that could not be read, validated or translated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InboundReport {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
}

impl InboundReport {
    pub fn processed(&self) -> usize {
        self.inserted + self.updated + self.unchanged + self.skipped
    }

    pub fn mutations(&self) -> usize {
        self.inserted + self.updated
    }
}

/// # Documentation
/// - Outcome counters of the outbound pass
/// - `rejected` records failed the schema check after translation and were not written
/// - `write_failed` records stay unsynced and are picked up again by the next run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutboundReport {
    pub written: usize,
    pub write_failed: usize,
    pub rejected: usize,
}

impl OutboundReport {
    pub fn processed(&self) -> usize {
        self.written + self.write_failed + self.rejected
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub inbound: InboundReport,
    pub outbound: OutboundReport,
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "inbound: {} inserted, {} updated, {} unchanged, {} skipped; outbound: {} written, {} write failures, {} rejected",
            self.inbound.inserted,
            self.inbound.updated,
            self.inbound.unchanged,
            self.inbound.skipped,
            self.outbound.written,
            self.outbound.write_failed,
            self.outbound.rejected,
        )
    }
}
