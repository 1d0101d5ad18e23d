pub mod align;
pub mod error;
pub mod extract;
pub mod mpk;
pub mod mpkfile;
pub mod pack;
pub mod read;
pub mod spec;
pub mod write;

mod serde_util;
