//! deldocs - per-segment deleted-documents log codec
//!
//! Reads and writes `<segment>.del` files: an ordered list of deleted
//! document offsets framed by a magic block, a fixed-width header, and a
//! CRC32 checksum.

pub mod cli;
pub mod codec;
pub mod fs;
pub mod lifecycle;
pub mod observability;
pub mod segment;
