//! On-disk record layouts.
//!
//! Every record is encoded field by field in little-endian order, so the
//! byte layout never depends on how Rust lays out the structs in memory.

mod entry;
mod header;

pub use entry::*;
pub use header::*;

/// Container magic, `'M' 'P' 'K' '\0'`.
pub const MAGIC: [u8; 4] = *b"MPK\0";
/// Version stamped by the writer. Readers accept any value.
pub const VERSION: u32 = 0x020000;
/// Every payload starts on a multiple of this.
pub const ALIGNMENT: u64 = 2048;
