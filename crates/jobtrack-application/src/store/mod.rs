//! The tracker's state store.
//!
//! # Module Structure
//!
//! - `state`: the state value, actions and reducer
//! - `tracker_store`: the shared store that applies actions and routes
//!   persistence

mod state;
mod tracker_store;

pub use state::{Action, Collection, TrackerState};
pub use tracker_store::TrackerStore;
