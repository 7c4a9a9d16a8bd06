//! Persistence and session ports.
//!
//! These traits are implemented by the infrastructure crate and consumed by
//! the application layer's store and session monitor.

mod auth;
mod local;
mod remote;

pub use auth::AuthProvider;
pub use local::{KeyValueStore, LocalKey};
pub use remote::RemoteStore;
