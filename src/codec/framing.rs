//! Magic block and CRC32 checksum framing
//!
//! Every deleted-docs file starts with `MAGIC` and ends with a CRC32 (IEEE)
//! over the header block followed by the payload. The magic block is not
//! covered by the checksum; it only establishes file identity before any
//! header parsing happens.

use crc32fast::Hasher;

use super::errors::{CodecError, CodecResult};
use crate::fs::{ReadGuard, StreamError, StreamReader, StreamResult, StreamWriter, WriteGuard};

/// File identity marker
pub const MAGIC: [u8; MAGIC_SIZE] = *b"DELDOCS1";

/// Width of the magic block in bytes
pub const MAGIC_SIZE: usize = 8;

/// Width of the checksum block in bytes
pub const SUM_SIZE: usize = 4;

/// Write the magic block at the current position.
pub fn write_magic<W: StreamWriter + ?Sized>(stream: &mut WriteGuard<'_, W>) -> StreamResult<()> {
    stream.write(&MAGIC)
}

/// Read the magic block and compare it against `MAGIC`.
///
/// A file too short to hold the magic block is not ours either, so a short
/// read is reported as a format mismatch. Any other read failure is
/// `ReadFailed`.
pub fn check_magic<R: StreamReader + ?Sized>(
    stream: &mut ReadGuard<'_, R>,
    path: &str,
) -> CodecResult<()> {
    let mut magic = [0u8; MAGIC_SIZE];
    match stream.read(&mut magic) {
        Ok(()) => {}
        Err(StreamError::ShortRead { got, .. }) => {
            return Err(CodecError::format_mismatch(
                path,
                format!("file holds {} bytes, magic block needs {}", got, MAGIC_SIZE),
            ));
        }
        Err(e) => return Err(CodecError::read_failed(path, e)),
    }

    if magic != MAGIC {
        return Err(CodecError::format_mismatch(
            path,
            format!("bad magic {:02x?}", magic),
        ));
    }
    Ok(())
}

/// CRC32 over `header` followed by `payload`.
///
/// Deterministic: the same input always produces the same output.
pub fn compute_checksum(header: &[u8], payload: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(header);
    hasher.update(payload);
    hasher.finalize()
}

/// Append the checksum over `header` and `payload` as a little-endian u32.
pub fn write_checksum<W: StreamWriter + ?Sized>(
    stream: &mut WriteGuard<'_, W>,
    header: &[u8],
    payload: &[u8],
) -> StreamResult<()> {
    let checksum = compute_checksum(header, payload);
    stream.write(&checksum.to_le_bytes())
}

/// Recompute the checksum and compare against the stored value.
pub fn verify_checksum(header: &[u8], payload: &[u8], stored: u32) -> CodecResult<()> {
    let computed = compute_checksum(header, payload);
    if computed != stored {
        return Err(CodecError::checksum_mismatch(stored, computed));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecErrorCode;
    use crate::fs::{FsHandler, MemoryStore};

    #[test]
    fn test_checksum_deterministic() {
        let a = compute_checksum(b"header", b"payload");
        let b = compute_checksum(b"header", b"payload");
        assert_eq!(a, b);
    }

    #[test]
    fn test_checksum_is_over_concatenation() {
        assert_eq!(
            compute_checksum(b"head", b"erpayload"),
            compute_checksum(b"header", b"payload")
        );
        assert_eq!(
            compute_checksum(b"header", b""),
            crc32fast::hash(b"header")
        );
    }

    #[test]
    fn test_checksum_detects_corruption() {
        let mut payload = vec![0x00, 0x01, 0x02, 0x03, 0x04];
        let original = compute_checksum(b"h", &payload);
        payload[2] ^= 0x01;
        assert_ne!(original, compute_checksum(b"h", &payload));
    }

    #[test]
    fn test_verify_checksum() {
        let checksum = compute_checksum(b"h", b"p");
        assert!(verify_checksum(b"h", b"p", checksum).is_ok());

        let err = verify_checksum(b"h", b"p", checksum ^ 1).unwrap_err();
        assert_eq!(err.code(), CodecErrorCode::ChecksumMismatch);
    }

    #[test]
    fn test_magic_round_trip() {
        let store = MemoryStore::new();
        let mut fs = FsHandler::memory(&store);

        let mut writer = WriteGuard::open(fs.writer.as_mut(), "m.del").unwrap();
        write_magic(&mut writer).unwrap();
        writer.finish().unwrap();
        assert_eq!(store.get("m.del").unwrap(), MAGIC.to_vec());

        let mut reader = ReadGuard::open(fs.reader.as_mut(), "m.del").unwrap();
        assert!(check_magic(&mut reader, "m.del").is_ok());
    }

    #[test]
    fn test_bad_magic_is_format_mismatch() {
        let store = MemoryStore::new();
        store.put("m.del", b"NOTMAGIC".to_vec());
        let mut fs = FsHandler::memory(&store);

        let mut reader = ReadGuard::open(fs.reader.as_mut(), "m.del").unwrap();
        let err = check_magic(&mut reader, "m.del").unwrap_err();
        assert_eq!(err.code(), CodecErrorCode::FormatMismatch);
    }

    #[derive(Debug)]
    struct UnreadableStream;

    impl StreamReader for UnreadableStream {
        fn open(&mut self, _path: &str) -> StreamResult<()> {
            Ok(())
        }

        fn read(&mut self, _buf: &mut [u8]) -> StreamResult<()> {
            Err(StreamError::io(
                "m.del",
                std::io::Error::new(std::io::ErrorKind::Other, "device error"),
            ))
        }

        fn length(&self) -> Option<u64> {
            None
        }

        fn close(&mut self) {}
    }

    #[test]
    fn test_io_error_on_magic_is_read_failed() {
        let mut stream = UnreadableStream;
        let mut reader = ReadGuard::open(&mut stream, "m.del").unwrap();

        let err = check_magic(&mut reader, "m.del").unwrap_err();
        assert_eq!(err.code(), CodecErrorCode::ReadFailed);
        assert!(err.to_string().contains("device error"));
    }

    #[test]
    fn test_short_file_is_format_mismatch() {
        let store = MemoryStore::new();
        store.put("m.del", b"DEL".to_vec());
        let mut fs = FsHandler::memory(&store);

        let mut reader = ReadGuard::open(fs.reader.as_mut(), "m.del").unwrap();
        let err = check_magic(&mut reader, "m.del").unwrap_err();
        assert_eq!(err.code(), CodecErrorCode::FormatMismatch);
    }
}
