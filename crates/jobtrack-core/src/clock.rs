//! Time and identity sources.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Source of "now" for record timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Returns a fresh record id that `is_taken` rejects for none of the
/// existing records.
pub fn fresh_record_id(is_taken: impl Fn(&str) -> bool) -> String {
    loop {
        let id = Uuid::new_v4().to_string();
        if !is_taken(&id) {
            return id;
        }
    }
}
