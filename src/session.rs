//! Open documents and the message protocol between a listing view and the
//! host.
//!
//! Every view carries its own [`DocumentId`]; the session maps it to the
//! archive path, so several archives can be open side by side and an event
//! for a closed or unknown document fails with [`Error::NoActiveArchive`].

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::archive::ArchiveBackend;
use crate::error::{Error, Result};
use crate::extract::{ExtractedFile, StorageRoot, extract};
use crate::listing::{Listing, build_listing};

/// Identifies one open listing view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Message posted by a listing view.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum ViewEvent {
    OpenFile {
        #[serde(rename = "entryName")]
        entry_name: String,
    },
    RevealFile {
        path: String,
    },
    Alert {
        text: String,
    },
}

/// Action the host is asked to perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "request", rename_all = "camelCase")]
pub enum HostRequest {
    /// One-line notification.
    ShowMessage { text: String },
    /// Close the listing view that issued the event.
    CloseActiveEditor,
    /// Open a file in the editor.
    Open { path: PathBuf },
    /// Show a file in the OS file browser.
    RevealInOs { path: PathBuf },
}

/// Tracks open documents and answers their view events.
pub struct Session<B: ArchiveBackend> {
    backend: B,
    storage_root: Option<StorageRoot>,
    documents: HashMap<DocumentId, PathBuf>,
    next_id: u64,
}

impl<B: ArchiveBackend> Session<B> {
    pub fn new(backend: B, storage_root: Option<StorageRoot>) -> Self {
        Self {
            backend,
            storage_root,
            documents: HashMap::new(),
            next_id: 1,
        }
    }

    /// Build the listing for `path` and register a document for it.
    ///
    /// Nothing is registered when the archive cannot be opened.
    pub async fn open_document(&mut self, path: &Path) -> Result<(DocumentId, Listing)> {
        let listing = build_listing(&self.backend, path).await?;

        let id = DocumentId(self.next_id);
        self.next_id += 1;
        self.documents.insert(id, path.to_path_buf());
        debug!("document {id} opened for {}", path.display());

        Ok((id, listing))
    }

    /// Forget a document. Returns `false` if it was not open.
    pub fn close_document(&mut self, id: DocumentId) -> bool {
        let closed = self.documents.remove(&id).is_some();
        if closed {
            debug!("document {id} closed");
        }
        closed
    }

    /// Archive behind an open document.
    pub fn archive_path(&self, id: DocumentId) -> Result<&Path> {
        self.documents
            .get(&id)
            .map(PathBuf::as_path)
            .ok_or(Error::NoActiveArchive { document: id })
    }

    /// Extract one entry of the document's archive into the cache.
    pub async fn open_entry(&self, id: DocumentId, entry_name: &str) -> Result<ExtractedFile> {
        let archive = self.archive_path(id)?;
        let root = self.storage_root.as_ref().ok_or(Error::StorageRootUnset)?;
        extract(&self.backend, archive, entry_name, root).await
    }

    /// Translate a view event into host requests.
    ///
    /// A successful `openFile` replaces the view, so the document is closed
    /// and later events for it fail with [`Error::NoActiveArchive`].
    /// Failures become a single [`HostRequest::ShowMessage`]; the view
    /// stays open.
    pub async fn handle_event(&mut self, id: DocumentId, event: ViewEvent) -> Vec<HostRequest> {
        match event {
            ViewEvent::OpenFile { entry_name } => match self.open_entry(id, &entry_name).await {
                Ok(file) => {
                    self.close_document(id);
                    vec![
                        HostRequest::CloseActiveEditor,
                        HostRequest::Open { path: file.path },
                    ]
                }
                Err(err) => {
                    warn!("document {id}: {err}");
                    vec![HostRequest::ShowMessage {
                        text: extraction_notice(&entry_name, &err),
                    }]
                }
            },
            ViewEvent::RevealFile { path } => vec![HostRequest::RevealInOs {
                path: PathBuf::from(path),
            }],
            ViewEvent::Alert { text } => vec![HostRequest::ShowMessage { text }],
        }
    }
}

/// `"extract entry NAME failed: REASON"`
fn extraction_notice(entry_name: &str, err: &Error) -> String {
    match err {
        Error::Extraction { .. } => err.to_string(),
        other => format!("extract entry {entry_name} failed: {other}"),
    }
}
