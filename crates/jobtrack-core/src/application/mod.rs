//! Job application domain module.
//!
//! # Module Structure
//!
//! - `model`: the application record, its status/priority enums, creation
//!   input and patch type

mod model;

pub use model::{
    ApplicationPatch, ApplicationStatus, JobApplication, NewApplication, Priority,
    normalize_tags, parse_loose_datetime,
};
