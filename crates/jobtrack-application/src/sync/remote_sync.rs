use std::sync::Arc;

use chrono::{DateTime, Utc};
use jobtrack_core::application::{ApplicationPatch, JobApplication};
use jobtrack_core::document::{CoverLetter, Resume};
use jobtrack_core::error::Result;
use jobtrack_core::sync::RemoteStore;

use crate::store::Collection;

/// The three collections fetched for one user.
///
/// A collection whose fetch failed is empty and listed in `failed`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteSnapshot {
    pub applications: Vec<JobApplication>,
    pub resumes: Vec<Resume>,
    pub cover_letters: Vec<CoverLetter>,
    pub failed: Vec<Collection>,
}

/// A single remote write, queued after the in-memory change it mirrors.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteWrite {
    InsertApplication(JobApplication),
    UpdateApplication {
        id: String,
        patch: ApplicationPatch,
        updated_at: DateTime<Utc>,
    },
    DeleteApplication(String),
    InsertResume(Resume),
    InsertCoverLetter(CoverLetter),
}

impl RemoteWrite {
    pub fn record_id(&self) -> &str {
        match self {
            RemoteWrite::InsertApplication(app) => &app.id,
            RemoteWrite::UpdateApplication { id, .. } => id,
            RemoteWrite::DeleteApplication(id) => id,
            RemoteWrite::InsertResume(resume) => &resume.id,
            RemoteWrite::InsertCoverLetter(letter) => &letter.id,
        }
    }

    pub fn operation(&self) -> &'static str {
        match self {
            RemoteWrite::InsertApplication(_) => "insert application",
            RemoteWrite::UpdateApplication { .. } => "update application",
            RemoteWrite::DeleteApplication(_) => "delete application",
            RemoteWrite::InsertResume(_) => "insert resume",
            RemoteWrite::InsertCoverLetter(_) => "insert cover letter",
        }
    }
}

/// Remote side of the store's persistence.
#[derive(Clone)]
pub struct RemoteSync {
    remote: Arc<dyn RemoteStore>,
}

impl RemoteSync {
    pub fn new(remote: Arc<dyn RemoteStore>) -> Self {
        Self { remote }
    }

    /// Fetches all three collections for `user_id` concurrently.
    ///
    /// Each fetch fails independently: its collection comes back empty and
    /// the error is logged.
    pub async fn load_all(&self, user_id: &str) -> RemoteSnapshot {
        tracing::debug!("[RemoteSync] Loading collections for {}", user_id);
        let (applications, resumes, cover_letters) = tokio::join!(
            self.remote.fetch_applications(user_id),
            self.remote.fetch_resumes(user_id),
            self.remote.fetch_cover_letters(user_id),
        );

        let mut failed = Vec::new();
        let applications = or_empty(applications, Collection::Applications, &mut failed);
        let resumes = or_empty(resumes, Collection::Resumes, &mut failed);
        let cover_letters = or_empty(cover_letters, Collection::CoverLetters, &mut failed);

        tracing::info!(
            "[RemoteSync] Loaded {} applications, {} resumes, {} cover letters",
            applications.len(),
            resumes.len(),
            cover_letters.len()
        );
        RemoteSnapshot {
            applications,
            resumes,
            cover_letters,
            failed,
        }
    }

    /// Executes one write on behalf of `user_id`.
    pub async fn execute(&self, user_id: &str, write: &RemoteWrite) -> Result<()> {
        match write {
            RemoteWrite::InsertApplication(app) => self.remote.insert_application(user_id, app).await,
            RemoteWrite::UpdateApplication {
                id,
                patch,
                updated_at,
            } => {
                self.remote
                    .update_application(user_id, id, patch, *updated_at)
                    .await
            }
            RemoteWrite::DeleteApplication(id) => self.remote.delete_application(user_id, id).await,
            RemoteWrite::InsertResume(resume) => self.remote.insert_resume(user_id, resume).await,
            RemoteWrite::InsertCoverLetter(letter) => {
                self.remote.insert_cover_letter(user_id, letter).await
            }
        }
    }
}

fn or_empty<T>(result: Result<Vec<T>>, collection: Collection, failed: &mut Vec<Collection>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::error!("[RemoteSync] Failed to load {}: {}", collection.name(), e);
        failed.push(collection);
        Vec::new()
    })
}
