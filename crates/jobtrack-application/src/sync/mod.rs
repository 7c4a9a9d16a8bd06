//! Persistence routing for the tracker store.
//!
//! - `remote_sync`: bulk reads and single-record writes against the
//!   [`RemoteStore`](jobtrack_core::sync::RemoteStore)
//! - `local_snapshot`: whole-collection snapshots in the local key/value store
//! - `writer`: ordered fire-and-forget execution of remote writes
//! - `ledger`: bookkeeping of write outcomes and divergent records

mod ledger;
mod local_snapshot;
mod remote_sync;
mod writer;

pub use ledger::{LedgerSummary, WriteFailure, WriteLedger};
pub use local_snapshot::{LocalData, LocalSnapshot};
pub use remote_sync::{RemoteSnapshot, RemoteSync, RemoteWrite};
pub use writer::RemoteWriter;
