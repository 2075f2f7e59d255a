//! Zip codec used by the viewer.
//!
//! - [`structures`]: on-disk records (EOCD, ZIP64 records, entry metadata)
//! - [`parser`]: central directory parsing from a [`ReadAt`](crate::io::ReadAt) source
//! - [`extractor`]: single-entry decoding (STORED and DEFLATE) with CRC-32 checks
//!
//! Encryption and multi-disk archives are not supported.

mod extractor;
mod parser;
mod structures;

pub use extractor::ZipExtractor;
pub use parser::ZipParser;
pub use structures::*;
