use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use jobtrack_core::error::TrackerError;

/// A remote write that failed after its in-memory change was kept.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteFailure {
    pub record_id: String,
    pub operation: &'static str,
    pub error: TrackerError,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerSummary {
    pub pending: usize,
    pub succeeded: u64,
    pub failed: u64,
    /// Records whose in-memory copy may differ from the remote one, oldest
    /// failure first. Only the latest failure per record is kept.
    pub diverged: Vec<WriteFailure>,
}

impl LedgerSummary {
    pub fn is_consistent(&self) -> bool {
        self.pending == 0 && self.diverged.is_empty()
    }
}

#[derive(Debug, Default)]
struct LedgerInner {
    pending: usize,
    succeeded: u64,
    failed: u64,
    diverged: HashMap<String, WriteFailure>,
}

/// Counts remote write outcomes.
///
/// Failed writes are neither retried nor rolled back; the ledger only makes
/// the divergence visible until the next full reload from the remote store.
#[derive(Debug, Default)]
pub struct WriteLedger {
    inner: Mutex<LedgerInner>,
}

impl WriteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LedgerInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn begin(&self) {
        self.lock().pending += 1;
    }

    pub fn succeed(&self) {
        let mut inner = self.lock();
        inner.pending = inner.pending.saturating_sub(1);
        inner.succeeded += 1;
    }

    pub fn fail(&self, failure: WriteFailure) {
        let mut inner = self.lock();
        inner.pending = inner.pending.saturating_sub(1);
        inner.failed += 1;
        inner.diverged.insert(failure.record_id.clone(), failure);
    }

    /// Forgets divergent records after the collections were replaced from
    /// the remote store.
    pub fn clear_divergence(&self) {
        self.lock().diverged.clear();
    }

    pub fn summary(&self) -> LedgerSummary {
        let inner = self.lock();
        let mut diverged: Vec<WriteFailure> = inner.diverged.values().cloned().collect();
        diverged.sort_by(|a, b| a.at.cmp(&b.at).then_with(|| a.record_id.cmp(&b.record_id)));
        LedgerSummary {
            pending: inner.pending,
            succeeded: inner.succeeded,
            failed: inner.failed,
            diverged,
        }
    }
}
