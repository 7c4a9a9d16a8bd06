//! REST adapters for the hosted backend.
//!
//! The backend exposes its tables through a PostgREST-style API under
//! `/rest/v1` and its auth service under `/auth/v1`. Both adapters share one
//! [`RestClient`], so a token obtained by the auth provider is used by the
//! remote store for row-level security.

mod auth;
mod client;
mod remote_store;

pub use auth::RestAuthProvider;
pub use client::RestClient;
pub use remote_store::RestRemoteStore;
