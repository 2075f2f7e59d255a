//! Archive capability used by the lister and the extractor.
//!
//! The viewer never touches the zip codec directly: it goes through
//! [`ArchiveBackend`], so any archive library able to open a path, enumerate
//! entries, and extract one named entry can stand in for [`ZipBackend`].

use async_trait::async_trait;
use log::debug;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::io::LocalFileReader;
use crate::zip::{ZipEntry, ZipExtractor};

/// One stored record of an archive, as enumerated by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveEntry {
    /// Path inside the archive, `/`-separated.
    pub name: String,
    pub is_directory: bool,
    /// Entry comment, empty when the archive stores none.
    pub comment: String,
    pub uncompressed_size: u64,
    pub compressed_size: u64,
}

impl From<&ZipEntry> for ArchiveEntry {
    fn from(entry: &ZipEntry) -> Self {
        Self {
            name: entry.file_name.clone(),
            is_directory: entry.is_directory,
            comment: entry.comment.clone(),
            uncompressed_size: entry.uncompressed_size,
            compressed_size: entry.compressed_size,
        }
    }
}

/// Open/list/extract contract over an archive library.
#[async_trait]
pub trait ArchiveBackend: Send + Sync {
    /// Opened archive. Owned by the operation that opened it.
    type Handle: Send + Sync;

    /// Open the archive at `path` read-only.
    ///
    /// Fails with [`Error::ArchiveOpen`] when the path is missing or is not
    /// a readable archive.
    async fn open(&self, path: &Path) -> Result<Self::Handle>;

    /// Entries in the archive's native order, directories included.
    fn entries<'h>(&self, handle: &'h Self::Handle) -> &'h [ArchiveEntry];

    /// Extract the entry named exactly `name` below `dest_dir`, keeping its
    /// relative path and replacing any existing file.
    ///
    /// Fails with [`Error::EntryNotFound`] or [`Error::Extraction`].
    async fn extract_entry(
        &self,
        handle: &Self::Handle,
        name: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf>;
}

/// An opened zip archive.
pub struct ZipHandle {
    path: PathBuf,
    raw: Vec<ZipEntry>,
    entries: Vec<ArchiveEntry>,
    extractor: ZipExtractor<LocalFileReader>,
}

impl ZipHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// [`ArchiveBackend`] backed by the crate's own zip codec.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipBackend;

#[async_trait]
impl ArchiveBackend for ZipBackend {
    type Handle = ZipHandle;

    async fn open(&self, path: &Path) -> Result<ZipHandle> {
        let open_error = |err: Error| Error::ArchiveOpen {
            path: path.to_path_buf(),
            reason: match err {
                Error::Io(io) => io.to_string(),
                Error::InvalidArchive(msg) => msg,
                other => other.to_string(),
            },
        };

        let reader = LocalFileReader::open(path).map_err(open_error)?;
        let extractor = ZipExtractor::new(Arc::new(reader));
        let raw = extractor.list_entries().await.map_err(open_error)?;
        let entries = raw.iter().map(ArchiveEntry::from).collect();
        debug!("opened {} with {} entries", path.display(), raw.len());

        Ok(ZipHandle {
            path: path.to_path_buf(),
            raw,
            entries,
            extractor,
        })
    }

    fn entries<'h>(&self, handle: &'h ZipHandle) -> &'h [ArchiveEntry] {
        &handle.entries
    }

    async fn extract_entry(&self, handle: &ZipHandle, name: &str, dest_dir: &Path) -> Result<PathBuf> {
        let entry = handle
            .raw
            .iter()
            .find(|e| !e.is_directory && e.file_name == name)
            .ok_or_else(|| Error::EntryNotFound {
                name: name.to_string(),
                archive: handle.path.clone(),
            })?;

        let relative = entry_relative_path(name).map_err(|e| Error::extraction(name, e))?;
        let output_path = dest_dir.join(relative);
        handle
            .extractor
            .extract_to_file(entry, &output_path)
            .await
            .map_err(|e| Error::extraction(name, e))?;

        Ok(output_path)
    }
}

/// Map an entry name onto a relative path that stays inside the
/// destination directory.
///
/// Both `/` and `\` separate components. Absolute names, drive prefixes and
/// `..` components are refused.
pub fn entry_relative_path(name: &str) -> Result<PathBuf> {
    let unsafe_path = || Error::UnsafeEntryPath(name.to_string());

    if name.starts_with(['/', '\\']) || name.contains('\0') {
        return Err(unsafe_path());
    }

    let mut relative = PathBuf::new();
    for part in name.split(['/', '\\']).filter(|p| !p.is_empty() && *p != ".") {
        let mut components = Path::new(part).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(c)), None) => relative.push(c),
            _ => return Err(unsafe_path()),
        }
    }

    if relative.as_os_str().is_empty() {
        return Err(unsafe_path());
    }
    Ok(relative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ZipTestBuilder;

    fn write_archive(dir: &Path, data: Vec<u8>) -> PathBuf {
        let path = dir.join("fixture.zip");
        std::fs::write(&path, data).unwrap();
        path
    }

    #[test]
    fn test_entry_relative_path_accepts_nested_names() {
        assert_eq!(
            entry_relative_path("docs/guide/intro.md").unwrap(),
            PathBuf::from("docs").join("guide").join("intro.md")
        );
        assert_eq!(
            entry_relative_path("./a//b.txt").unwrap(),
            PathBuf::from("a").join("b.txt")
        );
    }

    #[test]
    fn test_entry_relative_path_rejects_escapes() {
        for name in ["../evil.sh", "a/../../b", "/etc/passwd", "\\windows\\x", "..", "", "a\0b"] {
            assert!(
                matches!(entry_relative_path(name), Err(Error::UnsafeEntryPath(_))),
                "{name:?} should be refused"
            );
        }
    }

    #[tokio::test]
    async fn test_open_missing_path() {
        let err = ZipBackend
            .open(Path::new("/nonexistent/dir/archive.zip"))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, Error::ArchiveOpen { .. }));
    }

    #[tokio::test]
    async fn test_open_lists_entries_with_metadata() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_archive(
            tmp.path(),
            ZipTestBuilder::new()
                .directory("src/")
                .stored_with_comment("src/main.rs", b"fn main() {}", "entry point")
                .build(),
        );

        let handle = ZipBackend.open(&path).await.unwrap();
        assert_eq!(handle.path(), path);
        let entries = ZipBackend.entries(&handle);
        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_directory);
        assert_eq!(
            entries[1],
            ArchiveEntry {
                name: "src/main.rs".into(),
                is_directory: false,
                comment: "entry point".into(),
                uncompressed_size: 12,
                compressed_size: 12,
            }
        );
    }

    #[tokio::test]
    async fn test_extract_directory_name_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_archive(tmp.path(), ZipTestBuilder::new().directory("src/").build());

        let handle = ZipBackend.open(&path).await.unwrap();
        let err = ZipBackend
            .extract_entry(&handle, "src/", tmp.path())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EntryNotFound { .. }));
    }

    #[tokio::test]
    async fn test_extract_unsafe_name_is_extraction_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_archive(tmp.path(), ZipTestBuilder::new().stored("../up.txt", b"x").build());

        let handle = ZipBackend.open(&path).await.unwrap();
        let dest = tmp.path().join("cache");
        let err = ZipBackend
            .extract_entry(&handle, "../up.txt", &dest)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Extraction { .. }));
        assert!(!tmp.path().join("up.txt").exists());
    }
}
