//! Archive listing: the ordered, directory-free view of an archive.

use log::debug;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::archive::{ArchiveBackend, ArchiveEntry};
use crate::error::{Error, Result};

/// Divisor between size units. Decimal, not binary.
const SIZE_STEP: f64 = 1000.0;

/// Units stop at MB; larger files keep growing the MB figure.
const SIZE_UNITS: [&str; 3] = ["B", "KB", "MB"];

/// One file row of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRow {
    /// Entry name; also the key used to request extraction.
    pub name: String,
    pub comment: String,
    pub uncompressed_size: u64,
    pub compressed_size: u64,
}

impl ListingRow {
    /// `"<uncompressed> bytes ==> <compressed> bytes"`
    pub fn size_annotation(&self) -> String {
        format!(
            "{} bytes ==> {} bytes",
            self.uncompressed_size, self.compressed_size
        )
    }
}

impl From<&ArchiveEntry> for ListingRow {
    fn from(entry: &ArchiveEntry) -> Self {
        Self {
            name: entry.name.clone(),
            comment: entry.comment.clone(),
            uncompressed_size: entry.uncompressed_size,
            compressed_size: entry.compressed_size,
        }
    }
}

/// Snapshot of an archive's files at the moment it was opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// The archive path exactly as given; also the reveal target.
    pub archive_path: PathBuf,
    /// Size of the archive file on disk, in bytes.
    pub file_size: u64,
    pub rows: Vec<ListingRow>,
}

impl Listing {
    /// Human-readable archive size, see [`format_size`].
    pub fn size_label(&self) -> String {
        format_size(self.file_size)
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.archive_path.display())?;
        writeln!(f, "file size : {}", self.size_label())?;
        for (i, row) in self.rows.iter().enumerate() {
            writeln!(f, "{:>4}. {}", i + 1, row.name)?;
            if !row.comment.is_empty() {
                writeln!(f, "      {}", row.comment)?;
            }
            writeln!(f, "      size: {}", row.size_annotation())?;
        }
        Ok(())
    }
}

/// Build the listing for the archive at `archive_path`.
///
/// Rows keep the backend's enumeration order; directory entries are skipped.
pub async fn build_listing<B: ArchiveBackend>(backend: &B, archive_path: &Path) -> Result<Listing> {
    let handle = backend.open(archive_path).await?;

    let file_size = tokio::fs::metadata(archive_path)
        .await
        .map_err(|e| Error::ArchiveOpen {
            path: archive_path.to_path_buf(),
            reason: e.to_string(),
        })?
        .len();

    let rows: Vec<ListingRow> = backend
        .entries(&handle)
        .iter()
        .filter(|e| !e.is_directory)
        .map(ListingRow::from)
        .collect();
    debug!("listed {} files in {}", rows.len(), archive_path.display());

    Ok(Listing {
        archive_path: archive_path.to_path_buf(),
        file_size,
        rows,
    })
}

/// Format a byte count as `"<value><unit> (<bytes>B)"`.
///
/// The value is divided by 1000 while it exceeds 1000, up to MB, and shown
/// with two decimals. The exact byte count always follows in parentheses.
///
/// ```
/// use zipview::listing::format_size;
///
/// assert_eq!(format_size(1500), "1.50KB (1500B)");
/// ```
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value > SIZE_STEP && unit < SIZE_UNITS.len() - 1 {
        value /= SIZE_STEP;
        unit += 1;
    }
    format!("{value:.2}{} ({bytes}B)", SIZE_UNITS[unit])
}
