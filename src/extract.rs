//! One-shot extraction of a single entry into the scratch cache.

use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::archive::ArchiveBackend;
use crate::error::{Error, Result};

/// Subdirectory of the storage root that receives extracted entries.
pub const CACHE_DIR: &str = "cache";

/// Writable base directory supplied by the host at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageRoot(PathBuf);

impl StorageRoot {
    /// Fails with [`Error::StorageRootUnset`] for an empty path.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(Error::StorageRootUnset);
        }
        Ok(Self(path))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// `<root>/cache`
    pub fn cache_dir(&self) -> PathBuf {
        self.0.join(CACHE_DIR)
    }
}

/// An entry written to the cache. The caller owns the file from here on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    pub entry_name: String,
    pub path: PathBuf,
}

/// Extract `entry_name` from the archive at `archive_path` into
/// `<storage_root>/cache/<entry_name>`.
///
/// The archive is reopened for every call. An existing file at the
/// destination is replaced, so repeating a call yields the same path and
/// content. Every failure comes back as [`Error::EntryNotFound`] or
/// [`Error::Extraction`].
pub async fn extract<B: ArchiveBackend>(
    backend: &B,
    archive_path: &Path,
    entry_name: &str,
    storage_root: &StorageRoot,
) -> Result<ExtractedFile> {
    let cache_dir = storage_root.cache_dir();
    debug!(
        "extracting {entry_name} from {} into {}",
        archive_path.display(),
        cache_dir.display()
    );

    let handle = backend
        .open(archive_path)
        .await
        .map_err(|e| Error::extraction(entry_name, e))?;

    tokio::fs::create_dir_all(&cache_dir)
        .await
        .map_err(|e| Error::extraction(entry_name, e.into()))?;

    let path = backend
        .extract_entry(&handle, entry_name, &cache_dir)
        .await
        .map_err(|e| Error::extraction(entry_name, e))?;
    info!("extracted {entry_name} to {}", path.display());

    Ok(ExtractedFile {
        entry_name: entry_name.to_string(),
        path,
    })
}
