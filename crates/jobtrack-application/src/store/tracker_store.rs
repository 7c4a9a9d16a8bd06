use std::sync::Arc;

use jobtrack_core::application::{ApplicationPatch, JobApplication, NewApplication};
use jobtrack_core::clock::{fresh_record_id, Clock};
use jobtrack_core::document::{CoverLetter, NewCoverLetter, NewResume, Resume};
use jobtrack_core::error::Result;
use jobtrack_core::session::Session;
use jobtrack_core::sync::{KeyValueStore, RemoteStore};
use tokio::sync::RwLock;

use super::state::{Action, TrackerState};
use crate::sync::{
    LedgerSummary, LocalSnapshot, RemoteSnapshot, RemoteSync, RemoteWrite, RemoteWriter, WriteLedger,
};

/// The single shared tracker state plus the persistence routing around it.
///
/// Every mutation updates memory first and returns without waiting on the
/// network. With an authenticated session the matching remote write is
/// queued on the [`RemoteWriter`]; with an anonymous one the changed
/// collection is snapshotted to the local store (once initialized and not
/// loading).
///
/// # Lifecycle
///
/// 1. `TrackerStore::new` inside a Tokio runtime, wrapped in an `Arc`
/// 2. [`SessionMonitor::start`](crate::monitor::SessionMonitor::start) to
///    resolve the session and load the collections
/// 3. reads and mutations
/// 4. [`TrackerStore::close`] to drain queued remote writes
pub struct TrackerStore {
    state: RwLock<TrackerState>,
    remote: RemoteSync,
    local: LocalSnapshot,
    writer: RemoteWriter,
    ledger: Arc<WriteLedger>,
    clock: Arc<dyn Clock>,
}

impl TrackerStore {
    pub fn new(
        remote: Arc<dyn RemoteStore>,
        local: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let remote = RemoteSync::new(remote);
        let ledger = Arc::new(WriteLedger::new());
        let writer = RemoteWriter::spawn(remote.clone(), ledger.clone(), clock.clone())?;
        Ok(Self {
            state: RwLock::new(TrackerState::default()),
            remote,
            local: LocalSnapshot::new(local),
            writer,
            ledger,
            clock,
        })
    }

    // ============================================================================
    // Reads
    // ============================================================================

    pub async fn snapshot(&self) -> TrackerState {
        self.state.read().await.clone()
    }

    pub async fn applications(&self) -> Vec<JobApplication> {
        self.state.read().await.applications.clone()
    }

    pub async fn resumes(&self) -> Vec<Resume> {
        self.state.read().await.resumes.clone()
    }

    pub async fn cover_letters(&self) -> Vec<CoverLetter> {
        self.state.read().await.cover_letters.clone()
    }

    pub async fn session(&self) -> Session {
        self.state.read().await.session.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn is_initialized(&self) -> bool {
        self.state.read().await.initialized
    }

    pub fn write_summary(&self) -> LedgerSummary {
        self.ledger.summary()
    }

    // ============================================================================
    // Dispatch
    // ============================================================================

    /// Applies `actions` in order under one write lock.
    ///
    /// Collection changes are snapshotted locally as they happen when the
    /// state allows it. Nothing is sent to the remote store.
    pub async fn dispatch(&self, actions: impl IntoIterator<Item = Action>) {
        let mut state = self.state.write().await;
        for action in actions {
            self.apply(&mut state, action).await;
        }
    }

    async fn apply(&self, state: &mut TrackerState, action: Action) {
        let Some(collection) = state.reduce(action) else {
            return;
        };
        if state.snapshots_enabled() {
            if let Err(e) = self.local.save(state, collection).await {
                tracing::error!("[Store] Failed to snapshot {} locally: {}", collection.name(), e);
            }
        }
    }

    pub async fn set_applications(&self, applications: Vec<JobApplication>) {
        self.dispatch([Action::SetApplications(applications)]).await;
    }

    pub async fn set_resumes(&self, resumes: Vec<Resume>) {
        self.dispatch([Action::SetResumes(resumes)]).await;
    }

    pub async fn set_cover_letters(&self, cover_letters: Vec<CoverLetter>) {
        self.dispatch([Action::SetCoverLetters(cover_letters)]).await;
    }

    pub async fn set_session(&self, session: Session) {
        self.dispatch([Action::SetSession(session)]).await;
    }

    pub async fn set_loading(&self, loading: bool) {
        self.dispatch([Action::SetLoading(loading)]).await;
    }

    pub async fn set_initialized(&self, initialized: bool) {
        self.dispatch([Action::SetInitialized(initialized)]).await;
    }

    /// Empties all three collections.
    pub async fn clear_collections(&self) {
        self.dispatch([
            Action::SetApplications(Vec::new()),
            Action::SetResumes(Vec::new()),
            Action::SetCoverLetters(Vec::new()),
        ])
        .await;
    }

    // ============================================================================
    // Mutations
    // ============================================================================

    /// Adds an application with a fresh id and `created_at == updated_at`.
    pub async fn add_application(&self, input: NewApplication) -> JobApplication {
        let now = self.clock.now();
        let mut state = self.state.write().await;
        let id = fresh_record_id(|id| state.applications.iter().any(|a| a.id == id));
        let application = input.into_record(id, now);

        self.apply(&mut state, Action::AddApplication(application.clone()))
            .await;
        self.queue_remote(&state, || RemoteWrite::InsertApplication(application.clone()));
        tracing::info!("[Store] Added application {} ({})", application.id, application.company_name);
        application
    }

    /// Merges `patch` into the application with `id` and refreshes its
    /// `updated_at`. Returns the updated record, or `None` when no
    /// application has that id.
    pub async fn update_application(&self, id: &str, patch: ApplicationPatch) -> Option<JobApplication> {
        let now = self.clock.now();
        let mut state = self.state.write().await;
        if !state.applications.iter().any(|a| a.id == id) {
            tracing::debug!("[Store] Update for unknown application {} ignored", id);
            return None;
        }

        self.apply(
            &mut state,
            Action::UpdateApplication {
                id: id.to_string(),
                patch: patch.clone(),
                at: now,
            },
        )
        .await;
        self.queue_remote(&state, || RemoteWrite::UpdateApplication {
            id: id.to_string(),
            patch,
            updated_at: now,
        });
        state.applications.iter().find(|a| a.id == id).cloned()
    }

    /// Removes the application with `id`. Returns whether one was removed.
    pub async fn delete_application(&self, id: &str) -> bool {
        let mut state = self.state.write().await;
        if !state.applications.iter().any(|a| a.id == id) {
            tracing::debug!("[Store] Delete for unknown application {} ignored", id);
            return false;
        }

        self.apply(&mut state, Action::DeleteApplication(id.to_string()))
            .await;
        self.queue_remote(&state, || RemoteWrite::DeleteApplication(id.to_string()));
        tracing::info!("[Store] Deleted application {}", id);
        true
    }

    pub async fn add_resume(&self, input: NewResume) -> Resume {
        let now = self.clock.now();
        let mut state = self.state.write().await;
        let id = fresh_record_id(|id| state.resumes.iter().any(|r| r.id == id));
        let resume = input.into_record(id, now);

        self.apply(&mut state, Action::AddResume(resume.clone())).await;
        self.queue_remote(&state, || RemoteWrite::InsertResume(resume.clone()));
        tracing::info!("[Store] Added resume {} ({})", resume.id, resume.name);
        resume
    }

    pub async fn add_cover_letter(&self, input: NewCoverLetter) -> CoverLetter {
        let now = self.clock.now();
        let mut state = self.state.write().await;
        let id = fresh_record_id(|id| state.cover_letters.iter().any(|c| c.id == id));
        let cover_letter = input.into_record(id, now);

        self.apply(&mut state, Action::AddCoverLetter(cover_letter.clone()))
            .await;
        self.queue_remote(&state, || RemoteWrite::InsertCoverLetter(cover_letter.clone()));
        tracing::info!("[Store] Added cover letter {} ({})", cover_letter.id, cover_letter.name);
        cover_letter
    }

    /// Queues a remote write for the session's user. Anonymous sessions
    /// persist through local snapshots instead.
    fn queue_remote(&self, state: &TrackerState, write: impl FnOnce() -> RemoteWrite) {
        if let Some(user_id) = state.session.user_id() {
            self.writer.enqueue(user_id.to_string(), write());
        }
    }

    // ============================================================================
    // Loading
    // ============================================================================

    /// Fetches all collections for `user_id` without touching the state.
    pub async fn fetch_remote(&self, user_id: &str) -> RemoteSnapshot {
        self.remote.load_all(user_id).await
    }

    /// Replaces all three collections with a remote snapshot and forgets
    /// earlier write failures.
    pub async fn apply_remote(&self, snapshot: RemoteSnapshot) {
        self.dispatch([
            Action::SetApplications(snapshot.applications),
            Action::SetResumes(snapshot.resumes),
            Action::SetCoverLetters(snapshot.cover_letters),
        ])
        .await;
        self.ledger.clear_divergence();
    }

    /// Replaces each collection that has a usable local copy.
    pub async fn load_local(&self) {
        let data = self.local.load().await;
        let mut actions = Vec::new();
        if let Some(applications) = data.applications {
            actions.push(Action::SetApplications(applications));
        }
        if let Some(resumes) = data.resumes {
            actions.push(Action::SetResumes(resumes));
        }
        if let Some(cover_letters) = data.cover_letters {
            actions.push(Action::SetCoverLetters(cover_letters));
        }
        tracing::debug!("[Store] Loaded {} collections from local store", actions.len());
        self.dispatch(actions).await;
    }

    // ============================================================================
    // Teardown
    // ============================================================================

    /// Waits for every remote write queued so far.
    pub async fn flush(&self) {
        self.writer.flush().await;
    }

    /// Drains queued remote writes and stops the writer.
    pub async fn close(&self) {
        self.writer.close().await;
        let summary = self.ledger.summary();
        if !summary.diverged.is_empty() {
            tracing::warn!(
                "[Store] {} records may differ from the remote store",
                summary.diverged.len()
            );
        }
    }
}

#[cfg(test)]
#[path = "tracker_store_test.rs"]
mod tests;
