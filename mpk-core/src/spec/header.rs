use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::Result;

pub const RESERVED_LEN: usize = 0x30;

#[derive(Debug, Clone)]
pub struct Header {
    pub magic: [u8; 4],
    pub version: u32,
    pub entry_count: u64,
    pub reserved: [u8; RESERVED_LEN],
}

static_assertions::const_assert_eq!(Header::SIZE, 0x40);

impl Header {
    pub const SIZE: usize = 4 + 4 + 8 + RESERVED_LEN;

    pub fn new(entry_count: u64) -> Self {
        Self {
            magic: super::MAGIC,
            version: super::VERSION,
            entry_count,
            reserved: [0; RESERVED_LEN],
        }
    }

    pub fn from_reader<R>(reader: &mut R) -> Result<Self>
    where
        R: Read,
    {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        let version = reader.read_u32::<LittleEndian>()?;
        let entry_count = reader.read_u64::<LittleEndian>()?;
        let mut reserved = [0u8; RESERVED_LEN];
        reader.read_exact(&mut reserved)?;

        Ok(Self {
            magic,
            version,
            entry_count,
            reserved,
        })
    }

    pub fn write_to<W>(&self, writer: &mut W) -> Result<()>
    where
        W: Write,
    {
        writer.write_all(&self.magic)?;
        writer.write_u32::<LittleEndian>(self.version)?;
        writer.write_u64::<LittleEndian>(self.entry_count)?;
        writer.write_all(&self.reserved)?;
        Ok(())
    }

    pub fn into_bytes(self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        // a fixed-size slice never runs out of room for exactly SIZE bytes
        let _ = self.write_to(&mut &mut buf[..]);
        buf
    }
}
