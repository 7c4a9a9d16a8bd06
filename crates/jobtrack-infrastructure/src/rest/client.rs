use std::sync::{Arc, RwLock};
use std::time::Duration;

use jobtrack_core::error::{Result, TrackerError};
use reqwest::{Client, RequestBuilder, Response};

/// Shared HTTP client for the hosted backend.
///
/// Cloning is cheap; clones share the connection pool and the access token.
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
    anon_key: String,
    access_token: Arc<RwLock<Option<String>>>,
    timeout: Duration,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>, timeout: Duration) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            access_token: Arc::new(RwLock::new(None)),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn access_token(&self) -> Option<String> {
        self.access_token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn set_access_token(&self, token: Option<String>) {
        *self
            .access_token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = token;
    }

    /// `{base}/rest/v1/{table}`
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// `{base}/auth/v1/{path}`
    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.authorize(self.client.get(url))
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.authorize(self.client.post(url))
    }

    pub fn patch(&self, url: &str) -> RequestBuilder {
        self.authorize(self.client.patch(url))
    }

    pub fn delete(&self, url: &str) -> RequestBuilder {
        self.authorize(self.client.delete(url))
    }

    /// Adds the project key, the bearer token (the user's access token when
    /// signed in, the project key otherwise) and the request timeout.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self.access_token().unwrap_or_else(|| self.anon_key.clone());
        request
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", bearer))
            .timeout(self.timeout)
    }

    /// Sends the request and turns transport failures and non-success
    /// statuses into [`TrackerError::Remote`].
    pub async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| TrackerError::transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(TrackerError::remote(status.as_u16(), error_text))
    }
}

/// PostgREST equality filter value.
pub(crate) fn eq(value: &str) -> String {
    format!("eq.{}", value)
}
