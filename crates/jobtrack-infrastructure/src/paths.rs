//! Unified path management for jobtrack configuration and data files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/jobtrack/           # Config directory
//! ├── config.toml               # Application configuration
//! └── auth.json                 # Cached access token of the signed-in user
//!
//! ~/.local/share/jobtrack/      # Data directory
//! └── local/                    # Local fallback key/value store
//!     ├── jobTracker_applications.json
//!     ├── jobTracker_resumes.json
//!     └── jobTracker_coverLetters.json
//! ```

use std::path::PathBuf;

const APP_DIR_NAME: &str = "jobtrack";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for jobtrack.
///
/// Paths are resolved through the `dirs` crate, so they follow XDG on Linux
/// and the platform conventions elsewhere.
pub struct TrackerPaths;

impl TrackerPaths {
    /// Returns the jobtrack configuration directory (e.g. `~/.config/jobtrack/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the jobtrack data directory (e.g. `~/.local/share/jobtrack/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path of the cached auth token.
    ///
    /// The file holds a bearer token and should be readable by the user only.
    pub fn auth_token_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("auth.json"))
    }

    /// Returns the directory of the local fallback store below `data_dir`.
    pub fn local_store_dir(data_dir: &std::path::Path) -> PathBuf {
        data_dir.join("local")
    }
}
