//! Application layer for jobtrack.
//!
//! Holds the shared [`TrackerStore`](store::TrackerStore), which routes
//! persistence to the remote store or the local fallback depending on the
//! session, and the [`SessionMonitor`](monitor::SessionMonitor), which keeps
//! that session current.

pub mod monitor;
pub mod store;
pub mod sync;

#[cfg(test)]
mod test_support;

pub use monitor::{MonitorPhase, MonitorStatus, SessionMonitor, SyncTimeouts};
pub use store::{Action, Collection, TrackerState, TrackerStore};
pub use sync::{LedgerSummary, WriteFailure};
