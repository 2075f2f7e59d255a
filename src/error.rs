//! Error types for listing and extracting archive entries.

use std::path::PathBuf;
use thiserror::Error;

use crate::session::DocumentId;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while opening archives, extracting entries, or
/// dispatching view events.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes on disk are not a readable zip archive.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// The archive path is missing, unreadable, or not an archive.
    #[error("cannot open archive {}: {reason}", path.display())]
    ArchiveOpen { path: PathBuf, reason: String },

    /// No entry with this exact name exists in the archive.
    #[error("entry {name} not found in {}", archive.display())]
    EntryNotFound { name: String, archive: PathBuf },

    /// The entry exists but could not be written to the cache.
    #[error("extract entry {name} failed: {reason}")]
    Extraction { name: String, reason: String },

    /// An extraction was requested for a document that is not open.
    #[error("no active archive for document {document}")]
    NoActiveArchive { document: DocumentId },

    /// Extraction attempted before a storage root was configured.
    #[error("storage root is not configured")]
    StorageRootUnset,

    /// Entry uses a compression method the codec cannot decode.
    #[error("unsupported compression method: {0}")]
    UnsupportedCompression(u16),

    /// Entry name would resolve outside the cache directory.
    #[error("unsafe entry path: {0}")]
    UnsafeEntryPath(String),
}

impl Error {
    /// Returns `true` when the failure should be shown as a notification
    /// while the current view stays open.
    ///
    /// Only [`Error::ArchiveOpen`] aborts a document's listing.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::ArchiveOpen { .. })
    }

    pub(crate) fn extraction(name: &str, source: Self) -> Self {
        match source {
            err @ (Self::EntryNotFound { .. } | Self::Extraction { .. }) => err,
            other => Self::Extraction {
                name: name.to_string(),
                reason: other.to_string(),
            },
        }
    }
}
