//! Builder for in-memory zip archives used by tests.
//!
//! The builder writes local headers, data, the central directory and the
//! EOCD record directly, so fixtures can carry per-entry comments, ZIP64
//! records and deliberately wrong declared sizes. Interop with a real
//! archiver is covered separately with `zip::ZipWriter`.
//!
//! # Panics
//!
//! Functions here panic on encoder failures; they are meant for tests only.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use flate2::Compression;
use flate2::Crc;
use flate2::write::DeflateEncoder;
use std::io::Write;

const SATURATED_U16: u16 = 0xFFFF;
const SATURATED_U32: u32 = 0xFFFF_FFFF;

struct FixtureEntry {
    name: String,
    comment: String,
    method: u16,
    crc32: u32,
    uncompressed_size: u64,
    payload: Vec<u8>,
    /// Sizes written to the ZIP64 extra field instead of the real ones
    declared: Option<(u64, u64)>,
}

/// Builder for zip archives with stored, deflated and directory entries.
#[derive(Default)]
pub struct ZipTestBuilder {
    entries: Vec<FixtureEntry>,
    archive_comment: String,
    zip64: bool,
}

impl ZipTestBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an uncompressed entry.
    #[must_use]
    pub fn stored(self, name: &str, data: &[u8]) -> Self {
        self.stored_with_comment(name, data, "")
    }

    /// Adds an uncompressed entry carrying an entry comment.
    #[must_use]
    pub fn stored_with_comment(self, name: &str, data: &[u8], comment: &str) -> Self {
        self.push(name, comment, 0, data, data.to_vec())
    }

    /// Adds a DEFLATE-compressed entry.
    #[must_use]
    pub fn deflated(self, name: &str, data: &[u8]) -> Self {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        let payload = encoder.finish().unwrap();
        self.push(name, "", 8, data, payload)
    }

    /// Adds a directory record; `name` should end with `/`.
    #[must_use]
    pub fn directory(self, name: &str) -> Self {
        self.push(name, "", 0, &[], Vec::new())
    }

    /// Sets the archive-level comment stored after the EOCD record.
    #[must_use]
    pub fn archive_comment(mut self, comment: &str) -> Self {
        self.archive_comment = comment.to_string();
        self
    }

    /// Writes every central directory record with saturated sizes and
    /// offset plus a ZIP64 extra field, and ends the archive with a ZIP64
    /// EOCD, its locator, and a saturated regular EOCD.
    #[must_use]
    pub fn zip64(mut self) -> Self {
        self.zip64 = true;
        self
    }

    /// Declares sizes for the most recently added entry that differ from
    /// its real data. The entry's central record is written in ZIP64 form.
    #[must_use]
    pub fn declare_sizes(mut self, compressed: u64, uncompressed: u64) -> Self {
        if let Some(entry) = self.entries.last_mut() {
            entry.declared = Some((compressed, uncompressed));
        }
        self
    }

    fn push(mut self, name: &str, comment: &str, method: u16, data: &[u8], payload: Vec<u8>) -> Self {
        let mut crc = Crc::new();
        crc.update(data);
        self.entries.push(FixtureEntry {
            name: name.to_string(),
            comment: comment.to_string(),
            method,
            crc32: crc.sum(),
            uncompressed_size: data.len() as u64,
            payload,
            declared: None,
        });
        self
    }

    /// Serializes the archive.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        let mut out = Vec::new();
        let mut offsets = Vec::with_capacity(self.entries.len());

        for entry in &self.entries {
            offsets.push(out.len() as u64);
            out.extend_from_slice(b"PK\x03\x04");
            put_u16(&mut out, 20); // version needed
            put_u16(&mut out, 0); // flags
            put_u16(&mut out, entry.method);
            put_u16(&mut out, 0); // mod time
            put_u16(&mut out, 0x21); // mod date: 1980-01-01
            put_u32(&mut out, entry.crc32);
            put_u32(&mut out, u32::try_from(entry.payload.len()).unwrap());
            put_u32(&mut out, u32::try_from(entry.uncompressed_size).unwrap());
            put_u16(&mut out, u16::try_from(entry.name.len()).unwrap());
            put_u16(&mut out, 0); // extra length
            out.extend_from_slice(entry.name.as_bytes());
            out.extend_from_slice(&entry.payload);
        }

        let cd_offset = out.len() as u64;
        for (entry, offset) in self.entries.iter().zip(offsets) {
            let compressed = entry.payload.len() as u64;
            let wide = self.zip64 || entry.declared.is_some();

            out.extend_from_slice(b"PK\x01\x02");
            put_u16(&mut out, if wide { 45 } else { 20 }); // version made by
            put_u16(&mut out, if wide { 45 } else { 20 }); // version needed
            put_u16(&mut out, 0);
            put_u16(&mut out, entry.method);
            put_u16(&mut out, 0);
            put_u16(&mut out, 0x21);
            put_u32(&mut out, entry.crc32);
            if wide {
                put_u32(&mut out, SATURATED_U32);
                put_u32(&mut out, SATURATED_U32);
            } else {
                put_u32(&mut out, u32::try_from(compressed).unwrap());
                put_u32(&mut out, u32::try_from(entry.uncompressed_size).unwrap());
            }
            put_u16(&mut out, u16::try_from(entry.name.len()).unwrap());
            put_u16(&mut out, if wide { 28 } else { 0 });
            put_u16(&mut out, u16::try_from(entry.comment.len()).unwrap());
            put_u16(&mut out, 0); // disk number start
            put_u16(&mut out, 0); // internal attrs
            put_u32(&mut out, 0); // external attrs
            if wide {
                put_u32(&mut out, SATURATED_U32);
            } else {
                put_u32(&mut out, u32::try_from(offset).unwrap());
            }
            out.extend_from_slice(entry.name.as_bytes());
            if wide {
                let (compressed, uncompressed) = entry
                    .declared
                    .unwrap_or((compressed, entry.uncompressed_size));
                put_u16(&mut out, 0x0001);
                put_u16(&mut out, 24);
                put_u64(&mut out, uncompressed);
                put_u64(&mut out, compressed);
                put_u64(&mut out, offset);
            }
            out.extend_from_slice(entry.comment.as_bytes());
        }
        let cd_size = out.len() as u64 - cd_offset;
        let count = self.entries.len() as u64;

        if self.zip64 {
            let eocd64_offset = out.len() as u64;
            out.extend_from_slice(b"PK\x06\x06");
            put_u64(&mut out, 44); // size of the remaining record
            put_u16(&mut out, 45);
            put_u16(&mut out, 45);
            put_u32(&mut out, 0);
            put_u32(&mut out, 0);
            put_u64(&mut out, count);
            put_u64(&mut out, count);
            put_u64(&mut out, cd_size);
            put_u64(&mut out, cd_offset);

            out.extend_from_slice(b"PK\x06\x07");
            put_u32(&mut out, 0);
            put_u64(&mut out, eocd64_offset);
            put_u32(&mut out, 1); // total disks
        }

        out.extend_from_slice(b"PK\x05\x06");
        put_u16(&mut out, 0);
        put_u16(&mut out, 0);
        if self.zip64 {
            put_u16(&mut out, SATURATED_U16);
            put_u16(&mut out, SATURATED_U16);
            put_u32(&mut out, SATURATED_U32);
            put_u32(&mut out, SATURATED_U32);
        } else {
            put_u16(&mut out, u16::try_from(count).unwrap());
            put_u16(&mut out, u16::try_from(count).unwrap());
            put_u32(&mut out, u32::try_from(cd_size).unwrap());
            put_u32(&mut out, u32::try_from(cd_offset).unwrap());
        }
        put_u16(&mut out, u16::try_from(self.archive_comment.len()).unwrap());
        out.extend_from_slice(self.archive_comment.as_bytes());

        out
    }
}

fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn put_u64(out: &mut Vec<u8>, value: u64) {
    out.extend_from_slice(&value.to_le_bytes());
}
