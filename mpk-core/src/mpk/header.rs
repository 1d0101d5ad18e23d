use serde::Serialize;

use crate::serde_util::{serialize_magic, serialize_u32_hex};
use crate::spec;

#[derive(Clone, Serialize)]
pub struct MpkHeader {
    #[serde(serialize_with = "serialize_magic")]
    magic: [u8; 4],
    #[serde(serialize_with = "serialize_u32_hex")]
    version: u32,
    entry_count: u64,
}

impl MpkHeader {
    pub fn new(entry_count: u64) -> Self {
        Self {
            magic: spec::MAGIC,
            version: spec::VERSION,
            entry_count,
        }
    }

    #[inline]
    pub fn magic(&self) -> [u8; 4] {
        self.magic
    }

    #[inline]
    pub fn version(&self) -> u32 {
        self.version
    }

    #[inline]
    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }

    /// Offset right after the entry table.
    pub fn table_end(&self) -> u64 {
        spec::Header::SIZE as u64 + self.entry_count.saturating_mul(spec::Entry::SIZE as u64)
    }
}

impl TryFrom<spec::Header> for MpkHeader {
    type Error = crate::error::MpkError;

    fn try_from(this: spec::Header) -> Result<Self, Self::Error> {
        if this.magic != spec::MAGIC {
            return Err(Self::Error::InvalidMagic {
                expected: spec::MAGIC,
                found: this.magic,
            });
        }

        Ok(MpkHeader {
            magic: this.magic,
            version: this.version,
            entry_count: this.entry_count,
        })
    }
}

impl From<&MpkHeader> for spec::Header {
    fn from(value: &MpkHeader) -> Self {
        let mut header = spec::Header::new(value.entry_count);
        header.version = value.version;
        header
    }
}

impl std::fmt::Debug for MpkHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MpkHeader")
            .field("magic", &format!("{:02x?}", self.magic))
            .field("version", &format!("{:#08x}", self.version))
            .field("entry_count", &self.entry_count)
            .finish()
    }
}
