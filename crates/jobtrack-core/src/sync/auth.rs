//! Auth provider port.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::Result;
use crate::session::{AuthEvent, Session};

/// Resolves the current session and publishes sign-in / sign-out events.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Looks up the session for whatever credentials the provider holds.
    /// Returns `Session::Anonymous` when there are none.
    async fn current_session(&self) -> Result<Session>;

    /// Subscribes to auth transitions. Dropping the receiver releases the
    /// subscription.
    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}
