mod compression;
mod entry;
mod header;

use serde::Serialize;

pub use compression::*;
pub use entry::*;
pub use header::*;

/// MPK container, stores the header and entries.
#[derive(Debug, Clone, Serialize)]
pub struct MpkArchive {
    header: MpkHeader,
    entries: Vec<MpkEntry>,
}

impl MpkArchive {
    pub fn new(header: MpkHeader, entries: Vec<MpkEntry>) -> Self {
        MpkArchive { header, entries }
    }

    pub fn header(&self) -> &MpkHeader {
        &self.header
    }

    pub fn entries(&self) -> &[MpkEntry] {
        &self.entries
    }

    /// First entry whose compression is not `Stored`, with its index.
    pub fn first_compressed(&self) -> Option<(usize, &MpkEntry)> {
        self.entries.iter().enumerate().find(|(_, e)| !e.compression().is_stored())
    }
}
