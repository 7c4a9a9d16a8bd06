//! Local key/value store port.

use async_trait::async_trait;
use strum::{AsRefStr, Display};

use crate::error::Result;

/// The fixed keys of the local fallback store, one per collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
pub enum LocalKey {
    #[strum(serialize = "jobTracker_applications")]
    Applications,
    #[strum(serialize = "jobTracker_resumes")]
    Resumes,
    #[strum(serialize = "jobTracker_coverLetters")]
    CoverLetters,
}

/// On-device string key/value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns `None` when nothing is stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces whatever is stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}
