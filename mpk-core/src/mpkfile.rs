use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use memmap2::{Mmap, MmapOptions};

use crate::error::{MpkError, Result, io_error_at};
use crate::mpk::{MpkArchive, MpkEntry};
use crate::read;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MpkBackend {
    /// Use `memmap2` memory mapping.
    Mmap,
    /// Use regular file IO.
    #[default]
    File,
}

#[derive(Debug, Default)]
pub struct MpkFileBuilder {
    backend: MpkBackend,
}

impl MpkFileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn backend(mut self, backend: MpkBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn mmap(mut self, enabled: bool) -> Self {
        self.backend = if enabled { MpkBackend::Mmap } else { MpkBackend::File };
        self
    }

    pub fn open(self, path: impl AsRef<Path>) -> Result<MpkFile> {
        MpkFile::open_with_backend(path, self.backend)
    }
}

/// An opened container: parsed table plus access to the payloads.
pub struct MpkFile {
    path: PathBuf,
    archive: MpkArchive,
    backend: MpkBackend,
    len: u64,
    inner: MpkFileInner,
}

enum MpkFileInner {
    Mmap { mmap: Arc<Mmap> },
    File { file: File },
}

impl MpkFile {
    pub fn builder() -> MpkFileBuilder {
        MpkFileBuilder::new()
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_backend(path, MpkBackend::default())
    }

    pub fn open_with_backend(path: impl AsRef<Path>, backend: MpkBackend) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| io_error_at(e, path))?;
        let mut reader = BufReader::new(file);
        let archive = read::read_archive(&mut reader)?;

        let file = reader.into_inner();
        let len = file.metadata()?.len();

        let inner = match backend {
            MpkBackend::Mmap => {
                // SAFETY: read-only mapping; the file is held for the lifetime of the mmap.
                let mmap = unsafe { MmapOptions::new().map(&file)? };
                MpkFileInner::Mmap { mmap: Arc::new(mmap) }
            }
            MpkBackend::File => MpkFileInner::File { file },
        };

        Ok(Self {
            path: path.to_path_buf(),
            archive,
            backend,
            len,
            inner,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn archive(&self) -> &MpkArchive {
        &self.archive
    }

    pub fn backend(&self) -> MpkBackend {
        self.backend
    }

    /// Size of the container in bytes.
    pub fn file_size(&self) -> u64 {
        self.len
    }

    /// Reader over the stored bytes of `entry`, exactly `size` bytes long.
    pub fn open_entry(&self, entry: &MpkEntry) -> Result<Box<dyn BufRead + Send>> {
        let end = match entry.offset().checked_add(entry.size()) {
            Some(end) if end <= self.len => end,
            _ => {
                return Err(MpkError::InvalidEntryRange {
                    index: entry.entry_id(),
                    offset: entry.offset(),
                    size: entry.size(),
                    file_size: self.len,
                });
            }
        };

        let raw: Box<dyn BufRead + Send> = match &self.inner {
            MpkFileInner::Mmap { mmap } => {
                let start = entry.offset() as usize;
                Box::new(MmapRangeReader::new(Arc::clone(mmap), start, end as usize))
            }
            MpkFileInner::File { file } => {
                let mut f = file.try_clone()?;
                f.seek(SeekFrom::Start(entry.offset()))?;
                let take = f.take(entry.size());
                Box::new(BufReader::new(take))
            }
        };

        Ok(raw)
    }

    /// Read the stored bytes of `entry` into `buf`, replacing its contents.
    pub fn read_entry(&self, entry: &MpkEntry, buf: &mut Vec<u8>) -> Result<()> {
        let mut reader = self.open_entry(entry)?;
        buf.clear();
        buf.reserve(entry.size() as usize);
        reader.read_to_end(buf)?;
        if (buf.len() as u64) < entry.size() {
            return Err(MpkError::IO(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!("entry {} ended after {} of {} bytes", entry.entry_id(), buf.len(), entry.size()),
            )));
        }
        Ok(())
    }
}

struct MmapRangeReader {
    mmap: Arc<Mmap>,
    end: usize,
    pos: usize,
}

impl MmapRangeReader {
    fn new(mmap: Arc<Mmap>, start: usize, end: usize) -> Self {
        Self { mmap, end, pos: start }
    }
}

impl Read for MmapRangeReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let remaining = self.end.saturating_sub(self.pos);
        if remaining == 0 {
            return Ok(0);
        }
        let to_read = remaining.min(buf.len());
        let src = &self.mmap[self.pos..self.pos + to_read];
        buf[..to_read].copy_from_slice(src);
        self.pos += to_read;
        Ok(to_read)
    }
}

impl BufRead for MmapRangeReader {
    fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
        Ok(&self.mmap[self.pos..self.end])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.end);
    }
}
