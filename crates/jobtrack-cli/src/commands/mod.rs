//! Command implementations and the runtime they share.

pub mod applications;
pub mod auth;
pub mod documents;
pub mod insights;

use std::sync::Arc;

use anyhow::{Context, Result};
use jobtrack_application::{SessionMonitor, SyncTimeouts, TrackerStore};
use jobtrack_core::application::{ApplicationStatus, Priority};
use jobtrack_core::clock::SystemClock;
use jobtrack_core::sync::{AuthProvider, KeyValueStore, RemoteStore};
use jobtrack_infrastructure::paths::TrackerPaths;
use jobtrack_infrastructure::{
    FileKeyValueStore, OfflineAuthProvider, OfflineRemoteStore, RestAuthProvider, RestClient,
    RestRemoteStore, TrackerConfig,
};
use serde::Serialize;

/// A started store plus the monitor keeping its session current.
pub struct Runtime {
    pub store: Arc<TrackerStore>,
    pub monitor: SessionMonitor,
    /// Present when a remote backend is configured.
    pub auth: Option<Arc<RestAuthProvider>>,
}

impl Runtime {
    pub async fn start(config: &TrackerConfig) -> Result<Self> {
        let data_dir = config.data_dir()?;
        let local: Arc<dyn KeyValueStore> =
            Arc::new(FileKeyValueStore::new(TrackerPaths::local_store_dir(&data_dir)));

        let (remote, auth_provider, rest_auth) = match config.remote.endpoint() {
            Some((url, anon_key)) => {
                let client = RestClient::new(url, anon_key, config.remote.request_timeout());
                let token_file = TrackerPaths::auth_token_file()?;
                let rest_auth = Arc::new(RestAuthProvider::new(client.clone()).with_token_file(token_file));
                let remote: Arc<dyn RemoteStore> = Arc::new(RestRemoteStore::new(client));
                let auth_provider: Arc<dyn AuthProvider> = rest_auth.clone();
                (remote, auth_provider, Some(rest_auth))
            }
            None => {
                tracing::info!("No remote backend configured, running on local data only");
                let remote: Arc<dyn RemoteStore> = Arc::new(OfflineRemoteStore);
                let auth_provider: Arc<dyn AuthProvider> = Arc::new(OfflineAuthProvider::new());
                (remote, auth_provider, None)
            }
        };

        let store = Arc::new(TrackerStore::new(remote, local, Arc::new(SystemClock))?);
        let timeouts = SyncTimeouts {
            auth: config.sync.auth_timeout(),
            load: config.sync.load_timeout(),
        };
        let monitor = SessionMonitor::start(store.clone(), auth_provider, timeouts).await;

        Ok(Self {
            store,
            monitor,
            auth: rest_auth,
        })
    }

    pub fn rest_auth(&self) -> Result<&RestAuthProvider> {
        self.auth
            .as_deref()
            .context("No remote backend configured. Set JOBTRACK_REMOTE_URL and JOBTRACK_ANON_KEY.")
    }

    /// Stops the monitor and waits for queued remote writes.
    pub async fn shutdown(self) {
        self.monitor.shutdown().await;
        self.store.close().await;
        let summary = self.store.write_summary();
        for failure in &summary.diverged {
            eprintln!(
                "⚠️  Could not {} {}: {}",
                failure.operation, failure.record_id, failure.error
            );
        }
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Accepts `final_interview`, `final-interview` and any casing.
pub fn parse_status(value: &str) -> Result<ApplicationStatus, String> {
    normalize(value)
        .parse()
        .map_err(|_| format!("unknown status '{}'", value))
}

pub fn parse_priority(value: &str) -> Result<Priority, String> {
    normalize(value)
        .parse()
        .map_err(|_| format!("unknown priority '{}' (high, medium, low)", value))
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase().replace('-', "_")
}
