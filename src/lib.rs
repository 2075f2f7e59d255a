//! # zipview
//!
//! Inline viewer for zip archives.
//!
//! Opening an archive produces a [`Listing`]: every non-directory entry in
//! archive order with its comment and sizes, under a header showing the
//! archive path and its size. A listing renders to an HTML page whose links
//! post `openFile` and `revealFile` messages back to the host. Opening an
//! entry extracts it into `<storage root>/cache` and hands the path to the
//! host.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use zipview::{StorageRoot, ZipBackend, build_listing, extract};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let archive = Path::new("bundle.zip");
//!     let listing = build_listing(&ZipBackend, archive).await?;
//!     print!("{listing}");
//!
//!     let root = StorageRoot::new("/tmp/zipview")?;
//!     if let Some(row) = listing.rows.first() {
//!         let file = extract(&ZipBackend, archive, &row.name, &root).await?;
//!         println!("{}", file.path.display());
//!     }
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod cli;
pub mod error;
pub mod extract;
pub mod io;
pub mod listing;
pub mod render;
pub mod session;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod zip;

pub use archive::{ArchiveBackend, ArchiveEntry, ZipBackend, ZipHandle};
pub use cli::Cli;
pub use error::{Error, Result};
pub use extract::{ExtractedFile, StorageRoot, extract};
pub use io::{LocalFileReader, ReadAt};
pub use listing::{Listing, ListingRow, build_listing, format_size};
pub use render::render_page;
pub use session::{DocumentId, HostRequest, Session, ViewEvent};
