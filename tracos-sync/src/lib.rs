pub mod mailbox;
pub mod orchestrator;
pub mod report;

pub use mailbox::{CustomerMailbox, FsMailbox};
pub use orchestrator::{InboundOutcome, SyncOrchestrator};
pub use report::{InboundReport, OutboundReport, SyncReport};
