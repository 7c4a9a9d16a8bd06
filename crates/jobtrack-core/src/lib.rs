pub mod application;
pub mod clock;
pub mod document;
pub mod error;
pub mod insights;
pub mod session;
pub mod sync;

// Re-export common error type
pub use error::TrackerError;
