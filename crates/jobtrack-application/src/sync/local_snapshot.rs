use std::sync::Arc;

use jobtrack_core::application::JobApplication;
use jobtrack_core::document::{CoverLetter, Resume};
use jobtrack_core::error::Result;
use jobtrack_core::sync::KeyValueStore;
use serde::de::DeserializeOwned;

use crate::store::{Collection, TrackerState};

/// Collections read back from the local store.
///
/// `None` means nothing usable was stored under that key, so the caller
/// keeps whatever it already holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalData {
    pub applications: Option<Vec<JobApplication>>,
    pub resumes: Option<Vec<Resume>>,
    pub cover_letters: Option<Vec<CoverLetter>>,
}

/// Local side of the store's persistence: one JSON array per collection.
#[derive(Clone)]
pub struct LocalSnapshot {
    store: Arc<dyn KeyValueStore>,
}

impl LocalSnapshot {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> LocalData {
        LocalData {
            applications: self.read(Collection::Applications).await,
            resumes: self.read(Collection::Resumes).await,
            cover_letters: self.read(Collection::CoverLetters).await,
        }
    }

    async fn read<T: DeserializeOwned>(&self, collection: Collection) -> Option<Vec<T>> {
        let key = collection.local_key();
        let raw = match self.store.get(key.as_ref()).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::error!("[LocalSnapshot] Failed to read {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(records) => Some(records),
            Err(e) => {
                tracing::error!("[LocalSnapshot] Ignoring corrupt {}: {}", key, e);
                None
            }
        }
    }

    /// Overwrites the stored copy of `collection` with the state's.
    pub async fn save(&self, state: &TrackerState, collection: Collection) -> Result<()> {
        let json = match collection {
            Collection::Applications => serde_json::to_string(&state.applications)?,
            Collection::Resumes => serde_json::to_string(&state.resumes)?,
            Collection::CoverLetters => serde_json::to_string(&state.cover_letters)?,
        };
        self.store.set(collection.local_key().as_ref(), &json).await?;
        tracing::debug!("[LocalSnapshot] Saved {}", collection.local_key());
        Ok(())
    }
}
