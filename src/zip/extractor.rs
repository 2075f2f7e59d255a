use flate2::Crc;
use flate2::read::DeflateDecoder;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};
use crate::io::ReadAt;

use super::parser::ZipParser;
use super::structures::{CompressionMethod, ZipEntry};

/// Upper bound on buffer space reserved from a declared entry size
const MAX_PREALLOC: u64 = 1 << 20;

/// Decodes single entries out of a zip archive
pub struct ZipExtractor<R: ReadAt> {
    parser: ZipParser<R>,
}

impl<R: ReadAt> ZipExtractor<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            parser: ZipParser::new(reader),
        }
    }

    /// List all entries in the archive
    pub async fn list_entries(&self) -> Result<Vec<ZipEntry>> {
        self.parser.list_entries().await
    }

    /// Decode an entry into memory and verify it against its CRC-32
    pub async fn extract_to_memory(&self, entry: &ZipEntry) -> Result<Vec<u8>> {
        let data_offset = self.parser.data_offset(entry).await?;
        let reader = self.parser.reader();

        let data_end = data_offset.checked_add(entry.compressed_size);
        if data_end.is_none_or(|end| end > reader.size()) {
            return Err(Error::InvalidArchive(format!(
                "data of {} extends past end of archive",
                entry.file_name
            )));
        }

        // Bounded by the archive size checked above
        let mut raw = vec![0u8; entry.compressed_size as usize];
        reader.read_exact_at(data_offset, &mut raw).await?;

        let data = match entry.compression_method {
            CompressionMethod::Stored => raw,
            CompressionMethod::Deflate => {
                let mut out =
                    Vec::with_capacity(entry.uncompressed_size.min(MAX_PREALLOC) as usize);
                // One byte past the declared size is enough to detect overflow
                DeflateDecoder::new(raw.as_slice())
                    .take(entry.uncompressed_size.saturating_add(1))
                    .read_to_end(&mut out)
                    .map_err(|e| Error::InvalidArchive(format!("corrupt deflate stream: {e}")))?;
                out
            }
            CompressionMethod::Unknown(method) => {
                return Err(Error::UnsupportedCompression(method));
            }
        };

        if data.len() as u64 != entry.uncompressed_size {
            return Err(Error::InvalidArchive(format!(
                "size mismatch: expected {} bytes, got {}",
                entry.uncompressed_size,
                data.len()
            )));
        }

        let mut crc = Crc::new();
        crc.update(&data);
        if crc.sum() != entry.crc32 {
            return Err(Error::InvalidArchive(format!(
                "CRC mismatch: expected {:08x}, got {:08x}",
                entry.crc32,
                crc.sum()
            )));
        }

        Ok(data)
    }

    /// Extract an entry to disk, replacing any existing file
    pub async fn extract_to_file(&self, entry: &ZipEntry, output_path: &Path) -> Result<()> {
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let data = self.extract_to_memory(entry).await?;

        let mut file = fs::File::create(output_path).await?;
        file.write_all(&data).await?;
        file.flush().await?;

        Ok(())
    }
}
