use std::borrow::Cow;
use std::path::Path;

use serde::Serialize;

use crate::serde_util::serialize_lossy;
use crate::spec;

use super::compression::Compression;

/// Extension used when the stored name has none.
pub const DEFAULT_EXTENSION: &str = ".bin";

#[derive(Clone, Default, Serialize)]
pub struct MpkEntry {
    pub(crate) compression: Compression,
    pub(crate) entry_id: u32,
    pub(crate) offset: u64,
    pub(crate) size: u64,
    pub(crate) size_decompressed: u64,
    #[serde(serialize_with = "serialize_lossy")]
    pub(crate) filename: Vec<u8>,
}

impl MpkEntry {
    pub fn compression(&self) -> Compression {
        self.compression
    }

    pub fn entry_id(&self) -> u32 {
        self.entry_id
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn size_decompressed(&self) -> u64 {
        self.size_decompressed
    }

    /// Stored name bytes, without the NUL padding.
    pub fn filename_bytes(&self) -> &[u8] {
        &self.filename
    }

    pub fn filename(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.filename)
    }

    /// Extension of the stored name including the dot, or `.bin`.
    pub fn extension(&self) -> String {
        let name = self.filename();
        match Path::new(name.as_ref()).extension() {
            Some(ext) => format!(".{}", ext.to_string_lossy()),
            None => DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Name of the extracted file for the entry at `index`: `base_name`,
    /// then the 1-based index, then the stored extension.
    pub fn unpacked_file_name(&self, base_name: &str, index: usize) -> String {
        format!("{}{}{}", base_name, index + 1, self.extension())
    }

    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.size)
    }

    pub fn into_bytes(self) -> [u8; spec::Entry::SIZE] {
        spec::Entry::from(self).into_bytes()
    }
}

impl From<spec::Entry> for MpkEntry {
    fn from(value: spec::Entry) -> Self {
        Self {
            compression: value.compression.into(),
            entry_id: value.entry_id,
            offset: value.offset,
            size: value.size,
            size_decompressed: value.size_decompressed,
            filename: spec::decode_filename(&value.filename).to_vec(),
        }
    }
}

impl From<MpkEntry> for spec::Entry {
    fn from(value: MpkEntry) -> Self {
        Self {
            compression: value.compression.code(),
            entry_id: value.entry_id,
            offset: value.offset,
            size: value.size,
            size_decompressed: value.size_decompressed,
            filename: spec::encode_filename(&value.filename),
        }
    }
}

impl std::fmt::Debug for MpkEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MpkEntry")
            .field("compression", &self.compression)
            .field("entry_id", &self.entry_id)
            .field("offset", &format!("{:#x}", self.offset))
            .field("size", &self.size)
            .field("size_decompressed", &self.size_decompressed)
            .field("filename", &self.filename())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_named(name: &str) -> MpkEntry {
        MpkEntry {
            filename: name.as_bytes().to_vec(),
            ..Default::default()
        }
    }

    #[test]
    fn test_extension() {
        assert_eq!(entry_named("b.txt").extension(), ".txt");
        assert_eq!(entry_named("archive.tar.gz").extension(), ".gz");
        assert_eq!(entry_named("README").extension(), ".bin");
        assert_eq!(entry_named(".hidden").extension(), ".bin");
        assert_eq!(entry_named("").extension(), ".bin");
    }

    #[test]
    fn test_unpacked_file_name() {
        assert_eq!(entry_named("a.dat").unpacked_file_name("test", 0), "test1.dat");
        assert_eq!(entry_named("b.txt").unpacked_file_name("test", 1), "test2.txt");
        assert_eq!(entry_named("noext").unpacked_file_name("chara", 9), "chara10.bin");
    }

    #[test]
    fn test_spec_round_trip_truncates_name() {
        let entry = MpkEntry {
            entry_id: 4,
            offset: 4096,
            size: 10,
            size_decompressed: 10,
            filename: vec![b'n'; 400],
            ..Default::default()
        };
        let back = MpkEntry::from(spec::Entry::from(entry));
        assert_eq!(back.entry_id(), 4);
        assert_eq!(back.offset(), 4096);
        assert_eq!(back.filename_bytes().len(), spec::FILENAME_LEN - 1);
    }
}
