use std::io::{Read, Seek, SeekFrom, Write};

use crate::align::align_up;
use crate::error::{MpkError, Result};
use crate::mpk::{Compression, MpkEntry, MpkHeader};
use crate::spec::{self, ALIGNMENT, FILENAME_LEN};

/// Streaming container writer.
///
/// The header and a zeroed entry table are written up front. Each
/// `start_file` pads the output to the next 2048-byte boundary and begins a
/// new payload, which is then fed through the `Write` impl. `finish` seeks
/// back and fills in the table.
///
/// ```no_run
/// use std::io::Write;
/// # fn main() -> mpk_core::error::Result<()> {
/// let file = std::fs::File::create("out.mpk")?;
/// let mut writer = mpk_core::write::MpkWriter::new(file, 1)?;
/// writer.start_file("hello.txt")?;
/// writer.write_all(b"hello")?;
/// writer.finish()?;
/// # Ok(())
/// # }
/// ```
pub struct MpkWriter<W: Write + Seek> {
    pub(crate) inner: W,
    header: MpkHeader,
    entries: Vec<MpkEntry>,
    current: Option<MpkEntry>,
    position: u64,
}

impl<W: Write + Seek> MpkWriter<W> {
    pub fn new(mut inner: W, entry_count: u64) -> Result<Self> {
        let header = MpkHeader::new(entry_count);
        spec::Header::from(&header).write_to(&mut inner)?;
        // reserved for the table, patched in `finish`
        let table_len = header.table_end() - spec::Header::SIZE as u64;
        write_zeros(&mut inner, table_len)?;

        Ok(Self {
            inner,
            position: header.table_end(),
            header,
            entries: Vec::with_capacity(entry_count as usize),
            current: None,
        })
    }

    /// Begin the next entry. Names longer than 223 bytes are cut short.
    pub fn start_file(&mut self, name: impl AsRef<[u8]>) -> Result<()> {
        self.finish_file();
        if self.entries.len() as u64 >= self.header.entry_count() {
            return Err(MpkError::EntryCountMismatch {
                expected: self.header.entry_count(),
                actual: self.entries.len() as u64 + 1,
            });
        }

        let offset = align_up(self.position, ALIGNMENT);
        write_zeros(&mut self.inner, offset - self.position)?;
        self.position = offset;

        let name = name.as_ref();
        let name = &name[..name.len().min(FILENAME_LEN - 1)];
        self.current = Some(MpkEntry {
            compression: Compression::Stored,
            entry_id: self.entries.len() as u32,
            offset,
            size: 0,
            size_decompressed: 0,
            filename: name.to_vec(),
        });

        Ok(())
    }

    /// Write the final entry table and return the inner writer, positioned
    /// at the end of the last payload.
    pub fn finish(mut self) -> Result<W> {
        self.finish_file();
        if self.entries.len() as u64 != self.header.entry_count() {
            return Err(MpkError::EntryCountMismatch {
                expected: self.header.entry_count(),
                actual: self.entries.len() as u64,
            });
        }

        self.inner.seek(SeekFrom::Start(spec::Header::SIZE as u64))?;
        for entry in &self.entries {
            self.inner.write_all(&entry.clone().into_bytes())?;
        }
        self.inner.seek(SeekFrom::Start(self.position))?;
        self.inner.flush()?;
        log::debug!("wrote {} entries, {} bytes", self.entries.len(), self.position);

        Ok(self.inner)
    }

    fn finish_file(&mut self) {
        if let Some(entry) = self.current.take() {
            log::debug!("entry {}: offset={:#x} size={}", entry.entry_id, entry.offset, entry.size);
            self.entries.push(entry);
        }
    }
}

impl<W: Write + Seek> Write for MpkWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let Some(entry) = self.current.as_mut() else {
            return Err(std::io::Error::other(MpkError::NoActiveEntry));
        };
        let n = self.inner.write(buf)?;
        entry.size += n as u64;
        entry.size_decompressed = entry.size;
        self.position += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

fn write_zeros<W: Write>(writer: &mut W, len: u64) -> std::io::Result<()> {
    std::io::copy(&mut std::io::repeat(0).take(len), writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::read::read_archive;

    fn pack(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = MpkWriter::new(Cursor::new(Vec::new()), files.len() as u64).unwrap();
        for (name, data) in files {
            writer.start_file(name).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_empty_container() {
        let bytes = pack(&[]);
        assert_eq!(bytes.len(), spec::Header::SIZE);
        assert_eq!(&bytes[..4], b"MPK\0");
        let archive = read_archive(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(archive.header().entry_count(), 0);
    }

    #[test]
    fn test_layout() {
        let bytes = pack(&[
            ("a.dat", b"".as_slice()),
            ("b.txt", b"xyz".as_slice()),
            ("c.bin", [7u8; 3000].as_slice()),
        ]);
        let archive = read_archive(&mut Cursor::new(bytes.clone())).unwrap();
        let entries = archive.entries();
        assert_eq!(archive.header().version(), 0x020000);
        assert_eq!(entries.len(), 3);

        assert_eq!(entries[0].offset(), 2048);
        assert_eq!(entries[0].size(), 0);
        assert_eq!(entries[1].offset(), 2048);
        assert_eq!(entries[2].offset(), 4096);
        assert_eq!(entries[2].size(), 3000);
        assert_eq!(bytes.len() as u64, 4096 + 3000);

        for (i, entry) in entries.iter().enumerate() {
            assert_eq!(entry.entry_id() as usize, i);
            assert_eq!(entry.offset() % ALIGNMENT, 0);
            assert!(entry.end() <= bytes.len() as u64);
            assert_eq!(entry.size(), entry.size_decompressed());
            assert!(entry.compression().is_stored());
        }
        assert_eq!(&bytes[2048..2051], b"xyz");
        assert!(bytes[2051..4096].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_trailing_empty_file_within_bounds() {
        let bytes = pack(&[("only.dat", b"".as_slice())]);
        let archive = read_archive(&mut Cursor::new(bytes.clone())).unwrap();
        let entry = &archive.entries()[0];
        assert_eq!(entry.offset(), 2048);
        assert!(entry.end() <= bytes.len() as u64);
    }

    #[test]
    fn test_long_name_does_not_spill() {
        let long = "x".repeat(300) + ".txt";
        let bytes = pack(&[(long.as_str(), b"1".as_slice()), ("next.dat", b"2".as_slice())]);
        let archive = read_archive(&mut Cursor::new(bytes)).unwrap();
        let entries = archive.entries();
        assert_eq!(entries[0].filename_bytes().len(), 223);
        assert_eq!(entries[0].extension(), ".bin");
        assert_eq!(entries[1].filename(), "next.dat");
        assert_eq!(entries[1].entry_id(), 1);
    }

    #[test]
    fn test_too_many_files() {
        let mut writer = MpkWriter::new(Cursor::new(Vec::new()), 1).unwrap();
        writer.start_file("a").unwrap();
        let err = writer.start_file("b").unwrap_err();
        assert!(matches!(
            err,
            MpkError::EntryCountMismatch {
                expected: 1,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_too_few_files() {
        let mut writer = MpkWriter::new(Cursor::new(Vec::new()), 2).unwrap();
        writer.start_file("a").unwrap();
        let err = writer.finish().unwrap_err();
        assert!(matches!(
            err,
            MpkError::EntryCountMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_write_without_entry() {
        let mut writer = MpkWriter::new(Cursor::new(Vec::new()), 1).unwrap();
        assert!(writer.write_all(b"data").is_err());
    }
}
