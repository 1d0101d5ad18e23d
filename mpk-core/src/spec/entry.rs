use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::Result;

/// Width of the NUL-padded name field.
pub const FILENAME_LEN: usize = 0xE0;

#[derive(Debug, Clone)]
pub struct Entry {
    pub compression: u32,
    pub entry_id: u32,
    pub offset: u64,
    pub size: u64,
    pub size_decompressed: u64,
    pub filename: [u8; FILENAME_LEN],
}

static_assertions::const_assert_eq!(Entry::SIZE, 0x100);

impl Default for Entry {
    fn default() -> Self {
        Self {
            compression: 0,
            entry_id: 0,
            offset: 0,
            size: 0,
            size_decompressed: 0,
            filename: [0; FILENAME_LEN],
        }
    }
}

impl Entry {
    pub const SIZE: usize = 4 + 4 + 8 + 8 + 8 + FILENAME_LEN;

    pub fn from_reader<R>(reader: &mut R) -> Result<Self>
    where
        R: Read,
    {
        let compression = reader.read_u32::<LittleEndian>()?;
        let entry_id = reader.read_u32::<LittleEndian>()?;
        let offset = reader.read_u64::<LittleEndian>()?;
        let size = reader.read_u64::<LittleEndian>()?;
        let size_decompressed = reader.read_u64::<LittleEndian>()?;
        let mut filename = [0u8; FILENAME_LEN];
        reader.read_exact(&mut filename)?;

        Ok(Self {
            compression,
            entry_id,
            offset,
            size,
            size_decompressed,
            filename,
        })
    }

    pub fn write_to<W>(&self, writer: &mut W) -> Result<()>
    where
        W: Write,
    {
        writer.write_u32::<LittleEndian>(self.compression)?;
        writer.write_u32::<LittleEndian>(self.entry_id)?;
        writer.write_u64::<LittleEndian>(self.offset)?;
        writer.write_u64::<LittleEndian>(self.size)?;
        writer.write_u64::<LittleEndian>(self.size_decompressed)?;
        writer.write_all(&self.filename)?;
        Ok(())
    }

    pub fn into_bytes(self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        let _ = self.write_to(&mut &mut buf[..]);
        buf
    }
}

/// Copy `name` into a name field, keeping at most `FILENAME_LEN - 1` bytes
/// so the field always ends with a NUL.
pub fn encode_filename(name: &[u8]) -> [u8; FILENAME_LEN] {
    let mut field = [0u8; FILENAME_LEN];
    let len = name.len().min(FILENAME_LEN - 1);
    field[..len].copy_from_slice(&name[..len]);
    field
}

/// Bytes of a name field up to the first NUL.
pub fn decode_filename(field: &[u8; FILENAME_LEN]) -> &[u8] {
    let end = field.iter().position(|&b| b == 0).unwrap_or(FILENAME_LEN);
    &field[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write() {
        #[rustfmt::skip]
        let mut bytes = vec![
            0x00, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            0x00, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];
        let mut name = [0u8; FILENAME_LEN];
        name[..5].copy_from_slice(b"b.txt");
        bytes.extend_from_slice(&name);
        assert_eq!(bytes.len(), Entry::SIZE);

        let entry = Entry::from_reader(&mut &bytes[..]).unwrap();
        assert_eq!(entry.compression, 0);
        assert_eq!(entry.entry_id, 1);
        assert_eq!(entry.offset, 2048);
        assert_eq!(entry.size, 3);
        assert_eq!(entry.size_decompressed, 3);
        assert_eq!(decode_filename(&entry.filename), b"b.txt");

        let write_bytes = entry.into_bytes();
        assert_eq!(&write_bytes[..], &bytes[..]);
    }

    #[test]
    fn test_long_filename_truncated() {
        let long = vec![b'a'; 300];
        let field = encode_filename(&long);
        assert_eq!(field[FILENAME_LEN - 1], 0);
        assert_eq!(decode_filename(&field).len(), FILENAME_LEN - 1);
    }

    #[test]
    fn test_filename_without_nul() {
        let field = [b'x'; FILENAME_LEN];
        assert_eq!(decode_filename(&field).len(), FILENAME_LEN);
    }
}
