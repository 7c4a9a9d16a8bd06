//! Session monitor.
//!
//! Resolves the session at startup, performs the initial load and then
//! follows the auth provider's sign-in / sign-out events for as long as the
//! monitor lives. The store itself never talks to the auth provider.

use std::sync::Arc;
use std::time::Duration;

use jobtrack_core::error::{Result, TrackerError};
use jobtrack_core::session::{AuthEvent, Session, UserIdentity};
use jobtrack_core::sync::AuthProvider;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::timeout;

use crate::store::{Action, TrackerStore};

/// Time budgets for the startup sequence and sign-in reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncTimeouts {
    /// Budget for resolving the current session.
    pub auth: Duration,
    /// Budget for fetching the remote collections.
    pub load: Duration,
}

impl Default for SyncTimeouts {
    fn default() -> Self {
        Self {
            auth: Duration::from_secs(5),
            load: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorPhase {
    Initializing,
    Anonymous,
    Authenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorStatus {
    pub phase: MonitorPhase,
    /// Auth events processed since startup.
    pub events_handled: u64,
}

/// Owns the auth event subscription. Dropping the monitor (or calling
/// [`SessionMonitor::shutdown`]) releases it.
pub struct SessionMonitor {
    status: watch::Receiver<MonitorStatus>,
    task: Option<JoinHandle<()>>,
}

impl SessionMonitor {
    /// Runs the startup sequence, then starts listening for auth events.
    ///
    /// Startup never fails: an auth lookup that errors or exceeds
    /// `timeouts.auth` continues anonymously, and a remote load that exceeds
    /// `timeouts.load` falls back to the local store anonymously. The store
    /// is `initialized` and no longer `loading` when this returns.
    pub async fn start(
        store: Arc<TrackerStore>,
        auth: Arc<dyn AuthProvider>,
        timeouts: SyncTimeouts,
    ) -> Self {
        // Subscribe first so no transition between startup and listening is lost.
        let events = auth.subscribe();
        let (status_tx, status_rx) = watch::channel(MonitorStatus {
            phase: MonitorPhase::Initializing,
            events_handled: 0,
        });

        let phase = initialize(&store, auth.as_ref(), timeouts).await;
        status_tx.send_replace(MonitorStatus {
            phase,
            events_handled: 0,
        });
        tracing::info!("[SessionMonitor] Initialized ({:?})", phase);

        let task = tokio::spawn(listen(store, events, status_tx, timeouts));
        Self {
            status: status_rx,
            task: Some(task),
        }
    }

    pub fn status(&self) -> MonitorStatus {
        *self.status.borrow()
    }

    pub fn phase(&self) -> MonitorPhase {
        self.status().phase
    }

    /// Waits until at least `count` auth events have been handled.
    pub async fn wait_for_events(&self, count: u64) -> Result<MonitorStatus> {
        let mut status = self.status.clone();
        let current = status
            .wait_for(|s| s.events_handled >= count)
            .await
            .map_err(|_| TrackerError::internal("session monitor stopped"))?;
        Ok(*current)
    }

    /// Stops listening for auth events.
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
        tracing::debug!("[SessionMonitor] Shut down");
    }
}

impl Drop for SessionMonitor {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn initialize(store: &TrackerStore, auth: &dyn AuthProvider, timeouts: SyncTimeouts) -> MonitorPhase {
    let session = match timeout(timeouts.auth, auth.current_session()).await {
        Ok(Ok(session)) => session,
        Ok(Err(e)) => {
            tracing::warn!("[SessionMonitor] Session lookup failed, continuing anonymously: {}", e);
            Session::Anonymous
        }
        Err(elapsed) => {
            tracing::warn!(
                "[SessionMonitor] Session lookup exceeded {:?}, continuing anonymously: {}",
                timeouts.auth,
                TrackerError::from(elapsed)
            );
            Session::Anonymous
        }
    };

    let phase = match session {
        Session::Authenticated(user) => {
            store.set_session(Session::Authenticated(user.clone())).await;
            match timeout(timeouts.load, store.fetch_remote(&user.user_id)).await {
                Ok(snapshot) => {
                    store.apply_remote(snapshot).await;
                    MonitorPhase::Authenticated
                }
                Err(elapsed) => {
                    tracing::warn!(
                        "[SessionMonitor] Initial load exceeded {:?}, using local data: {}",
                        timeouts.load,
                        TrackerError::from(elapsed)
                    );
                    store.set_session(Session::Anonymous).await;
                    store.load_local().await;
                    MonitorPhase::Anonymous
                }
            }
        }
        Session::Anonymous => {
            store.load_local().await;
            MonitorPhase::Anonymous
        }
    };

    store
        .dispatch([Action::SetLoading(false), Action::SetInitialized(true)])
        .await;
    phase
}

async fn listen(
    store: Arc<TrackerStore>,
    mut events: broadcast::Receiver<AuthEvent>,
    status: watch::Sender<MonitorStatus>,
    timeouts: SyncTimeouts,
) {
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!("[SessionMonitor] Missed {} auth events", skipped);
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => {
                tracing::debug!("[SessionMonitor] Auth event stream closed");
                break;
            }
        };

        let phase = match event {
            AuthEvent::SignedIn { user } => handle_sign_in(&store, user, timeouts.load).await,
            AuthEvent::SignedOut => handle_sign_out(&store).await,
        };
        status.send_modify(|s| {
            s.phase = phase;
            s.events_handled += 1;
        });
    }
}

async fn handle_sign_in(store: &TrackerStore, user: UserIdentity, load_timeout: Duration) -> MonitorPhase {
    tracing::info!("[SessionMonitor] Signed in as {}, reloading from remote", user.user_id);
    let user_id = user.user_id.clone();
    store
        .dispatch([
            Action::SetSession(Session::Authenticated(user)),
            Action::SetLoading(true),
        ])
        .await;

    match timeout(load_timeout, store.fetch_remote(&user_id)).await {
        Ok(snapshot) => store.apply_remote(snapshot).await,
        Err(elapsed) => {
            tracing::warn!(
                "[SessionMonitor] Reload exceeded {:?}, collections left empty: {}",
                load_timeout,
                TrackerError::from(elapsed)
            );
            store.clear_collections().await;
        }
    }

    store
        .dispatch([Action::SetLoading(false), Action::SetInitialized(true)])
        .await;
    MonitorPhase::Authenticated
}

async fn handle_sign_out(store: &TrackerStore) -> MonitorPhase {
    tracing::info!("[SessionMonitor] Signed out, switching to local data");
    store
        .dispatch([
            Action::SetLoading(true),
            Action::SetSession(Session::Anonymous),
            Action::SetApplications(Vec::new()),
            Action::SetResumes(Vec::new()),
            Action::SetCoverLetters(Vec::new()),
        ])
        .await;
    store.load_local().await;
    store
        .dispatch([Action::SetLoading(false), Action::SetInitialized(true)])
        .await;
    MonitorPhase::Anonymous
}

#[cfg(test)]
#[path = "monitor_test.rs"]
mod tests;
