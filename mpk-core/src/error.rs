use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, MpkError>;

#[derive(Debug, thiserror::Error)]
pub enum MpkError {
    #[error("Upstream IO Error: {0}")]
    IO(#[from] std::io::Error),
    #[error("Failed to walk input directory: {0}")]
    WalkDir(#[from] walkdir::Error),
    #[error("Failed to persist output file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Invalid input directory: {}", .0.display())]
    InvalidInputDir(PathBuf),
    #[error("Output path exists and is not a directory: {}", .0.display())]
    OutputNotDir(PathBuf),
    #[error("Invalid MPK file magic: expected {expected:X?}, found {found:X?}")]
    InvalidMagic { expected: [u8; 4], found: [u8; 4] },
    #[error("Entry table of {entry_count} entries exceeds file size {file_size}")]
    TruncatedTable { entry_count: u64, file_size: u64 },
    #[error("Invalid entry range: index={index}, offset={offset}, size={size}, file_size={file_size}")]
    InvalidEntryRange {
        index: u32,
        offset: u64,
        size: u64,
        file_size: u64,
    },
    #[error("Entry {index} uses unsupported compression code 0x{code:X}")]
    UnsupportedCompression { index: u32, code: u32 },

    #[error("Entry count mismatch: declared {expected}, got {actual}")]
    EntryCountMismatch { expected: u64, actual: u64 },
    #[error("No active entry, call `start_file` before writing data")]
    NoActiveEntry,
}

/// Attach `path` to an IO error so the message names the file involved.
pub(crate) fn io_error_at(e: std::io::Error, path: &std::path::Path) -> MpkError {
    MpkError::IO(std::io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))
}
