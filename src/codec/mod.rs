//! Deleted-docs codec
//!
//! Persists a segment's deleted offsets as `<stem>.del`:
//! magic | fixed-width header | payload | CRC32 over header + payload.
//!
//! # Guarantees
//!
//! - Magic is checked before any header parsing
//! - Checksum is verified before any offset reaches the caller
//! - Short files are reported, never returned as short lists
//! - Every opened stream is closed on every exit path
//! - Only write failures are fatal; the codec reports them and leaves the
//!   shutdown decision to its owner

mod deleted_docs_format;
mod errors;
mod framing;
mod header;

pub use deleted_docs_format::{DeletedDocsFormat, DELETED_DOCS_POSTFIX};
pub use errors::{CodecError, CodecErrorCode, CodecResult, Severity};
pub use framing::{
    check_magic, compute_checksum, verify_checksum, write_checksum, write_magic, MAGIC,
    MAGIC_SIZE, SUM_SIZE,
};
pub use header::{decode_header, encode_header, header_size_field, HeaderMap, HEADER_SIZE, SIZE_KEY};
