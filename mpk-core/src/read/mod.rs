use std::io::{BufReader, Read, Seek, SeekFrom};

use crate::error::{MpkError, Result};
use crate::mpk::{MpkArchive, MpkEntry, MpkHeader};
use crate::spec;

/// Parse the header and entry table of a container.
///
/// The reader may be positioned anywhere, its position afterwards is
/// unspecified. Bad magic is reported before the table is touched.
pub fn read_archive<R>(reader: &mut R) -> Result<MpkArchive>
where
    R: Read + Seek,
{
    let file_size = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(0))?;

    // read header
    let spec_header = spec::Header::from_reader(reader)?;
    let header = MpkHeader::try_from(spec_header)?;

    if header.table_end() > file_size {
        return Err(MpkError::TruncatedTable {
            entry_count: header.entry_count(),
            file_size,
        });
    }

    // read entries
    let entries = read_entries(&mut BufReader::new(reader), header.entry_count())?;
    log::debug!("read {} entries from container of {} bytes", entries.len(), file_size);

    Ok(MpkArchive::new(header, entries))
}

fn read_entries<R>(reader: &mut R, entry_count: u64) -> Result<Vec<MpkEntry>>
where
    R: Read,
{
    let mut entries = Vec::with_capacity(entry_count as usize);
    for _ in 0..entry_count {
        let spec_entry = spec::Entry::from_reader(reader)?;
        entries.push(MpkEntry::from(spec_entry));
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn container(entry_count: u64, entries: &[spec::Entry]) -> Vec<u8> {
        let mut bytes = spec::Header::new(entry_count).into_bytes().to_vec();
        for entry in entries {
            bytes.extend_from_slice(&entry.clone().into_bytes());
        }
        bytes
    }

    #[test]
    fn test_read_empty() {
        let bytes = container(0, &[]);
        let archive = read_archive(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(archive.header().entry_count(), 0);
        assert!(archive.entries().is_empty());
    }

    #[test]
    fn test_read_entries() {
        let entries = [
            spec::Entry {
                entry_id: 0,
                offset: 2048,
                filename: spec::encode_filename(b"a.dat"),
                ..Default::default()
            },
            spec::Entry {
                entry_id: 1,
                offset: 2048,
                size: 3,
                size_decompressed: 3,
                filename: spec::encode_filename(b"b.txt"),
                ..Default::default()
            },
        ];
        let mut bytes = container(2, &entries);
        bytes.resize(2048 + 3, 0);

        let archive = read_archive(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(archive.entries().len(), 2);
        assert_eq!(archive.entries()[0].filename(), "a.dat");
        assert_eq!(archive.entries()[1].size(), 3);
        assert!(archive.first_compressed().is_none());
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = container(0, &[]);
        bytes[..4].copy_from_slice(b"ZIP\0");
        let err = read_archive(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, MpkError::InvalidMagic { .. }));
    }

    #[test]
    fn test_truncated_table() {
        let bytes = container(1_000_000, &[]);
        let err = read_archive(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(
            err,
            MpkError::TruncatedTable {
                entry_count: 1_000_000,
                ..
            }
        ));
    }

    #[test]
    fn test_short_header() {
        let err = read_archive(&mut Cursor::new(vec![b'M', b'P', b'K'])).unwrap_err();
        assert!(matches!(err, MpkError::IO(_)));
    }
}
