//! Resume and cover letter domain module.

mod model;

pub use model::{CoverLetter, NewCoverLetter, NewResume, Resume};
