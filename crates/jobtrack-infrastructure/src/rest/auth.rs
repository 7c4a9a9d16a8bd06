//! Auth provider backed by the hosted auth service.
//!
//! Only password sign-in is supported. The access token is cached in a JSON
//! file (when one is configured) so the session survives restarts.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use jobtrack_core::error::{Result, TrackerError};
use jobtrack_core::session::{AuthEvent, Session, UserIdentity};
use jobtrack_core::sync::AuthProvider;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::client::RestClient;

const EVENT_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Serialize)]
struct PasswordGrantRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUserResponse,
}

#[derive(Debug, Deserialize)]
struct AuthUserResponse {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: Option<serde_json::Value>,
}

impl AuthUserResponse {
    fn into_identity(self) -> UserIdentity {
        let display_name = self.user_metadata.as_ref().and_then(|meta| {
            ["full_name", "name"]
                .iter()
                .find_map(|key| meta.get(key).and_then(|v| v.as_str()))
                .map(str::to_string)
        });
        UserIdentity {
            user_id: self.id,
            email: self.email,
            display_name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CachedToken {
    access_token: String,
}

/// [`AuthProvider`] talking to the backend's `/auth/v1` endpoints.
pub struct RestAuthProvider {
    client: RestClient,
    events: broadcast::Sender<AuthEvent>,
    token_file: Option<PathBuf>,
}

impl RestAuthProvider {
    pub fn new(client: RestClient) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            client,
            events,
            token_file: None,
        }
    }

    /// Persists the access token at `path` and restores one already there.
    pub fn with_token_file(mut self, path: PathBuf) -> Self {
        match Self::read_cached_token(&path) {
            Ok(Some(token)) => {
                tracing::debug!("[RestAuth] Restored cached access token");
                self.client.set_access_token(Some(token));
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("[RestAuth] Ignoring unreadable token cache: {}", e),
        }
        self.token_file = Some(path);
        self
    }

    fn read_cached_token(path: &Path) -> Result<Option<String>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let cached: CachedToken = serde_json::from_str(&content)?;
        Ok(Some(cached.access_token))
    }

    fn store_token(&self, token: Option<String>) {
        if let Some(path) = &self.token_file {
            let result = match &token {
                Some(access_token) => write_token_file(path, access_token),
                None => match fs::remove_file(path) {
                    Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
                    _ => Ok(()),
                },
            };
            if let Err(e) = result {
                tracing::warn!("[RestAuth] Failed to update token cache: {}", e);
            }
        }
        self.client.set_access_token(token);
    }

    /// Signs in with email and password and publishes `SignedIn`.
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<UserIdentity> {
        let request = self
            .client
            .post(&self.client.auth_url("token"))
            .query(&[("grant_type", "password")])
            .json(&PasswordGrantRequest { email, password });

        let response = self.client.send(request).await.map_err(|e| match e {
            TrackerError::Remote {
                status: Some(400..=499),
                message,
            } => TrackerError::auth(format!("Sign-in rejected: {}", message)),
            other => other,
        })?;

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| TrackerError::auth(format!("Malformed token response: {}", e)))?;

        let user = token.user.into_identity();
        self.store_token(Some(token.access_token));

        tracing::info!("[RestAuth] Signed in as {}", user.user_id);
        let _ = self.events.send(AuthEvent::SignedIn { user: user.clone() });
        Ok(user)
    }

    /// Revokes the session (best effort), forgets the token and publishes
    /// `SignedOut`.
    pub async fn sign_out(&self) -> Result<()> {
        if self.client.access_token().is_some() {
            let request = self.client.post(&self.client.auth_url("logout"));
            if let Err(e) = self.client.send(request).await {
                tracing::warn!("[RestAuth] Remote logout failed, clearing local token anyway: {}", e);
            }
        }
        self.store_token(None);

        tracing::info!("[RestAuth] Signed out");
        let _ = self.events.send(AuthEvent::SignedOut);
        Ok(())
    }
}

fn write_token_file(path: &Path, access_token: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string(&CachedToken {
        access_token: access_token.to_string(),
    })?;
    fs::write(path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

#[async_trait]
impl AuthProvider for RestAuthProvider {
    async fn current_session(&self) -> Result<Session> {
        if self.client.access_token().is_none() {
            return Ok(Session::Anonymous);
        }

        let request = self.client.get(&self.client.auth_url("user"));
        match self.client.send(request).await {
            Ok(response) => {
                let user: AuthUserResponse = response
                    .json()
                    .await
                    .map_err(|e| TrackerError::auth(format!("Malformed user response: {}", e)))?;
                Ok(Session::Authenticated(user.into_identity()))
            }
            Err(TrackerError::Remote {
                status: Some(401 | 403),
                ..
            }) => {
                tracing::info!("[RestAuth] Cached token rejected, continuing anonymously");
                self.store_token(None);
                Ok(Session::Anonymous)
            }
            Err(e) => Err(e),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}
