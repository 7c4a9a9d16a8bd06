use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jobtrack_core::application::{ApplicationPatch, JobApplication};
use jobtrack_core::document::{CoverLetter, Resume};
use jobtrack_core::error::{Result, TrackerError};
use jobtrack_core::sync::RemoteStore;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::client::{RestClient, eq};
use crate::dto::{ApplicationPatchRow, ApplicationRow, CoverLetterRow, ResumeRow};

const APPLICATIONS_TABLE: &str = "applications";
const RESUMES_TABLE: &str = "resumes";
const COVER_LETTERS_TABLE: &str = "cover_letters";

/// [`RemoteStore`] over the backend's REST table API.
#[derive(Clone)]
pub struct RestRemoteStore {
    client: RestClient,
}

impl RestRemoteStore {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    async fn fetch_rows<T: DeserializeOwned>(&self, table: &str, user_id: &str) -> Result<Vec<T>> {
        let request = self
            .client
            .get(&self.client.table_url(table))
            .query(&owner_query(user_id));
        let response = self.client.send(request).await?;
        let rows = response
            .json::<Vec<T>>()
            .await
            .map_err(|e| TrackerError::Serialization {
                format: "JSON".to_string(),
                message: format!("Failed to decode {} rows: {}", table, e),
            })?;
        tracing::debug!("[RestRemoteStore] Fetched {} rows from {}", rows.len(), table);
        Ok(rows)
    }

    async fn insert_row<T: Serialize + Sync>(&self, table: &str, row: &T) -> Result<()> {
        let request = self
            .client
            .post(&self.client.table_url(table))
            .header("Prefer", "return=minimal")
            .json(row);
        self.client.send(request).await?;
        Ok(())
    }
}

/// Filter and ordering for a user's rows, newest first.
fn owner_query(user_id: &str) -> Vec<(&'static str, String)> {
    vec![
        ("select", "*".to_string()),
        ("user_id", eq(user_id)),
        ("order", "created_at.desc".to_string()),
    ]
}

/// Filter matching one row owned by one user.
fn record_query(id: &str, user_id: &str) -> Vec<(&'static str, String)> {
    vec![("id", eq(id)), ("user_id", eq(user_id))]
}

#[async_trait]
impl RemoteStore for RestRemoteStore {
    async fn fetch_applications(&self, user_id: &str) -> Result<Vec<JobApplication>> {
        let rows: Vec<ApplicationRow> = self.fetch_rows(APPLICATIONS_TABLE, user_id).await?;
        Ok(rows.into_iter().map(ApplicationRow::into_domain).collect())
    }

    async fn fetch_resumes(&self, user_id: &str) -> Result<Vec<Resume>> {
        let rows: Vec<ResumeRow> = self.fetch_rows(RESUMES_TABLE, user_id).await?;
        Ok(rows.into_iter().map(ResumeRow::into_domain).collect())
    }

    async fn fetch_cover_letters(&self, user_id: &str) -> Result<Vec<CoverLetter>> {
        let rows: Vec<CoverLetterRow> = self.fetch_rows(COVER_LETTERS_TABLE, user_id).await?;
        Ok(rows.into_iter().map(CoverLetterRow::into_domain).collect())
    }

    async fn insert_application(&self, user_id: &str, application: &JobApplication) -> Result<()> {
        let row = ApplicationRow::from_domain(user_id, application);
        self.insert_row(APPLICATIONS_TABLE, &row).await
    }

    async fn update_application(
        &self,
        user_id: &str,
        id: &str,
        patch: &ApplicationPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let body = ApplicationPatchRow::from_patch(patch, updated_at);
        let request = self
            .client
            .patch(&self.client.table_url(APPLICATIONS_TABLE))
            .query(&record_query(id, user_id))
            .header("Prefer", "return=minimal")
            .json(&body);
        self.client.send(request).await?;
        Ok(())
    }

    async fn delete_application(&self, user_id: &str, id: &str) -> Result<()> {
        let request = self
            .client
            .delete(&self.client.table_url(APPLICATIONS_TABLE))
            .query(&record_query(id, user_id));
        self.client.send(request).await?;
        Ok(())
    }

    async fn insert_resume(&self, user_id: &str, resume: &Resume) -> Result<()> {
        let row = ResumeRow::from_domain(user_id, resume);
        self.insert_row(RESUMES_TABLE, &row).await
    }

    async fn insert_cover_letter(&self, user_id: &str, cover_letter: &CoverLetter) -> Result<()> {
        let row = CoverLetterRow::from_domain(user_id, cover_letter);
        self.insert_row(COVER_LETTERS_TABLE, &row).await
    }
}
