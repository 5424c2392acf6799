//! Output archive assembly.
//!
//! Entries accumulate in upload order and are serialized exactly once, after
//! every job has completed. A batch that fails part-way never produces an
//! archive at all.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;

/// One converted file waiting to be zipped.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub name: String,
    pub data: Vec<u8>,
}

/// Ordered collection of converted outputs.
#[derive(Debug, Default)]
pub struct OutputArchive {
    entries: Vec<ArchiveEntry>,
}

impl OutputArchive {
    pub fn new() -> Self {
        OutputArchive::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        OutputArchive {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, data: Vec<u8>) {
        self.entries.push(ArchiveEntry {
            name: name.into(),
            data,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Serialize all entries into a single in-memory ZIP buffer.
    pub fn into_zip_bytes(self) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for entry in &self.entries {
            writer.start_file(entry.name.as_str(), options)?;
            writer.write_all(&entry.data)?;
        }

        Ok(writer.finish()?.into_inner())
    }
}
