//! Remote store port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::application::{ApplicationPatch, JobApplication};
use crate::document::{CoverLetter, Resume};
use crate::error::Result;

/// Hosted tabular store holding every user's records.
///
/// Every call is scoped by `user_id`; implementations must include it in the
/// row filter so that one user can never read or write another's rows.
/// Reads return records newest `created_at` first.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn fetch_applications(&self, user_id: &str) -> Result<Vec<JobApplication>>;

    async fn fetch_resumes(&self, user_id: &str) -> Result<Vec<Resume>>;

    async fn fetch_cover_letters(&self, user_id: &str) -> Result<Vec<CoverLetter>>;

    async fn insert_application(&self, user_id: &str, application: &JobApplication) -> Result<()>;

    /// Writes only the columns present in `patch`, plus `updated_at`.
    async fn update_application(
        &self,
        user_id: &str,
        id: &str,
        patch: &ApplicationPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<()>;

    async fn delete_application(&self, user_id: &str, id: &str) -> Result<()>;

    async fn insert_resume(&self, user_id: &str, resume: &Resume) -> Result<()>;

    async fn insert_cover_letter(&self, user_id: &str, cover_letter: &CoverLetter) -> Result<()>;
}
