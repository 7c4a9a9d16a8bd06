//! Adapters for running without a configured remote backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jobtrack_core::application::{ApplicationPatch, JobApplication};
use jobtrack_core::document::{CoverLetter, Resume};
use jobtrack_core::error::{Result, TrackerError};
use jobtrack_core::session::{AuthEvent, Session};
use jobtrack_core::sync::{AuthProvider, RemoteStore};
use tokio::sync::broadcast;

/// Auth provider that never has a session and never publishes events.
pub struct OfflineAuthProvider {
    events: broadcast::Sender<AuthEvent>,
}

impl OfflineAuthProvider {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(1);
        Self { events }
    }
}

impl Default for OfflineAuthProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthProvider for OfflineAuthProvider {
    async fn current_session(&self) -> Result<Session> {
        Ok(Session::Anonymous)
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

/// Remote store stand-in that rejects every call.
///
/// Paired with [`OfflineAuthProvider`] it is never reached, because writes
/// only go remote for authenticated sessions.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineRemoteStore;

fn not_configured<T>() -> Result<T> {
    Err(TrackerError::config("Remote store is not configured"))
}

#[async_trait]
impl RemoteStore for OfflineRemoteStore {
    async fn fetch_applications(&self, _user_id: &str) -> Result<Vec<JobApplication>> {
        not_configured()
    }

    async fn fetch_resumes(&self, _user_id: &str) -> Result<Vec<Resume>> {
        not_configured()
    }

    async fn fetch_cover_letters(&self, _user_id: &str) -> Result<Vec<CoverLetter>> {
        not_configured()
    }

    async fn insert_application(&self, _user_id: &str, _application: &JobApplication) -> Result<()> {
        not_configured()
    }

    async fn update_application(
        &self,
        _user_id: &str,
        _id: &str,
        _patch: &ApplicationPatch,
        _updated_at: DateTime<Utc>,
    ) -> Result<()> {
        not_configured()
    }

    async fn delete_application(&self, _user_id: &str, _id: &str) -> Result<()> {
        not_configured()
    }

    async fn insert_resume(&self, _user_id: &str, _resume: &Resume) -> Result<()> {
        not_configured()
    }

    async fn insert_cover_letter(&self, _user_id: &str, _cover_letter: &CoverLetter) -> Result<()> {
        not_configured()
    }
}
