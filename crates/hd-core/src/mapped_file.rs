use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use memmap2::Mmap;

use crate::types::FileRegion;

/// A memory-mapped file providing zero-copy byte slices.
#[derive(Debug)]
pub struct MappedFile {
    mmap: Mmap,
}

impl MappedFile {
    /// Open and memory-map a file.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        Self::map(&file, path)
    }

    /// Memory-map an already opened file. `path` is only used in errors.
    pub fn map(file: &File, path: &Path) -> Result<Self> {
        // SAFETY: The file must not be modified externally while mapped.
        let mmap = unsafe { Mmap::map(file) }
            .with_context(|| format!("failed to mmap {}", path.display()))?;

        Ok(Self { mmap })
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.mmap
    }
}

/// The bytes a document renders, either mapped from disk or held in memory.
#[derive(Debug)]
pub enum ByteBuffer {
    Mapped(MappedFile),
    Owned(Vec<u8>),
}

impl Default for ByteBuffer {
    fn default() -> Self {
        ByteBuffer::Owned(Vec::new())
    }
}

impl From<Vec<u8>> for ByteBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        ByteBuffer::Owned(bytes)
    }
}

impl ByteBuffer {
    /// Map `path`, or read it into memory when it cannot be mapped
    /// (pipes, character devices, empty files, some virtual filesystems).
    ///
    /// Open errors are returned as is; only the mapping step falls back.
    pub fn open(path: &Path) -> Result<Self> {
        let mut file = File::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        let metadata = file
            .metadata()
            .with_context(|| format!("failed to read metadata for {}", path.display()))?;

        if metadata.is_file() && metadata.len() > 0 {
            match MappedFile::map(&file, path) {
                Ok(mapped) => return Ok(ByteBuffer::Mapped(mapped)),
                Err(err) => log::warn!("{err:#}; reading into memory instead"),
            }
        }

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(ByteBuffer::Owned(bytes))
    }

    pub fn as_slice(&self) -> &[u8] {
        match self {
            ByteBuffer::Mapped(m) => m.as_slice(),
            ByteBuffer::Owned(v) => v,
        }
    }

    /// Total size in bytes.
    pub fn len(&self) -> u64 {
        self.as_slice().len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Get a byte slice for the given region.
    /// Truncated at EOF; empty if the region starts past the end.
    pub fn slice(&self, region: FileRegion) -> &[u8] {
        let r = region.clamp(self.len());
        &self.as_slice()[r.offset as usize..r.end() as usize]
    }
}
