//! Directory-backed key/value store with atomic writes.
//!
//! Each key is one `<key>.json` file. Writes go through a temporary file that
//! is fsynced and renamed over the target while an exclusive lock file is
//! held, so a crash never leaves a half-written value behind.

use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use jobtrack_core::error::{Result, TrackerError};
use jobtrack_core::sync::KeyValueStore;

/// Key/value store rooted at a directory.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    root: PathBuf,
}

impl FileKeyValueStore {
    /// Creates a store rooted at `root`. The directory is created on first
    /// write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
            && !key.starts_with('.');
        if !valid {
            return Err(TrackerError::config(format!("Invalid storage key: {:?}", key)));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }

    fn read_blocking(path: &Path) -> Result<Option<String>> {
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn write_blocking(path: &Path, value: &str) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let _lock = FileLock::acquire(path)?;

        let tmp_path = temp_path(path)?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(value.as_bytes())?;

        // Ensure data is written to disk
        tmp_file.sync_all()?;
        drop(tmp_file);

        // Atomic rename
        fs::rename(&tmp_path, path)?;
        Ok(())
    }

}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| TrackerError::internal(format!("Failed to join task: {}", e)))?
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        run_blocking(move || Self::read_blocking(&path)).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let value = value.to_string();
        run_blocking(move || Self::write_blocking(&path, &value)).await
    }
}

/// `.<name>.tmp` next to the target, so the rename stays on one filesystem.
fn temp_path(path: &Path) -> Result<PathBuf> {
    let parent = path.parent().ok_or_else(|| TrackerError::io("Path has no parent directory"))?;
    let file_name = path.file_name().ok_or_else(|| TrackerError::io("Path has no file name"))?;
    Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
}

/// Exclusive lock on `<key>.lock`, released when the guard is dropped.
///
/// The lock file itself stays on disk: deleting it while another writer is
/// blocked on it would let a third writer lock a fresh inode alongside.
struct FileLock {
    _file: File,
}

impl FileLock {
    /// Acquires an exclusive lock on the given path.
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| TrackerError::io(format!("Failed to acquire lock: {}", e)))?;
        }

        Ok(FileLock { _file: file })
    }
}
