//! Row DTOs of the remote store.
//!
//! The remote tables use snake_case columns and a `user_id` owner column;
//! the domain models use camelCase and carry no owner. These types are the
//! only place the two shapes meet.

mod application_row;
mod document_row;

pub use application_row::{ApplicationPatchRow, ApplicationRow};
pub use document_row::{CoverLetterRow, ResumeRow};
