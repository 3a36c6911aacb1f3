//! Deleted-docs file codec
//!
//! File layout:
//!
//! ```text
//! +------------------+
//! | Magic            | (MAGIC_SIZE bytes, "DELDOCS1")
//! +------------------+
//! | Header           | (HEADER_SIZE bytes, {"size":"<payload bytes>"} NUL-padded)
//! +------------------+
//! | Payload          | (size bytes, i64 LE offsets)
//! +------------------+
//! | Checksum         | (u32 LE, CRC32 over header block + payload)
//! +------------------+
//! ```
//!
//! Reads validate, in order: magic, header, declared size against the stream
//! length, payload length, checksum. Nothing is handed to the caller until the
//! checksum matches. Every stream the codec opens is closed before it returns.

use super::errors::{CodecError, CodecResult};
use super::framing::{
    check_magic, verify_checksum, write_checksum, write_magic, MAGIC_SIZE, SUM_SIZE,
};
use super::header::{decode_header, encode_header, header_size_field, HeaderMap, HEADER_SIZE, SIZE_KEY};
use crate::fs::{FsHandler, ReadGuard, StreamError, StreamReader, StreamResult, StreamWriter, WriteGuard};
use crate::observability::ObservationScope;
use crate::segment::{DeletedDocs, OFFSET_SIZE};

/// File name postfix for deleted-docs files
pub const DELETED_DOCS_POSTFIX: &str = ".del";

/// Header, payload and stored checksum of one file, not yet verified
struct Frame {
    header: Vec<u8>,
    payload: Vec<u8>,
    stored_checksum: u32,
}

/// Reads and writes `<stem>.del` files
pub struct DeletedDocsFormat;

impl DeletedDocsFormat {
    /// The postfix appended to every segment stem
    pub fn file_postfix() -> &'static str {
        DELETED_DOCS_POSTFIX
    }

    /// `stem` with the deleted-docs postfix appended
    pub fn full_path(stem: &str) -> String {
        format!("{}{}", stem, DELETED_DOCS_POSTFIX)
    }

    /// Read and verify the deleted-docs file for `stem`.
    ///
    /// # Errors
    ///
    /// - `CannotOpenFile` if the file cannot be opened
    /// - `FormatMismatch` if the magic block is wrong
    /// - `HeaderCorrupt` if the header is undecodable or `size` is invalid
    /// - `Truncated` / `ReadFailed` if the file ends early or a read fails
    /// - `ChecksumMismatch` if header or payload were altered, including a
    ///   header whose declared size no longer fits the file
    pub fn read(fs: &mut FsHandler, stem: &str) -> CodecResult<DeletedDocs> {
        let path = Self::full_path(stem);
        let scope = ObservationScope::with_fields("DELETED_DOCS_READ", &[("path", path.as_str())]);

        let result = Self::read_frame(fs.reader.as_mut(), &path).and_then(|frame| {
            Self::verify(&frame, &path)?;
            DeletedDocs::from_payload(&frame.payload).ok_or_else(|| {
                CodecError::header_corrupt("Payload is not a whole number of offsets")
                    .at_path(&path)
            })
        });

        match result {
            Ok(docs) => {
                let count = docs.count().to_string();
                scope.complete_with_fields(&[("count", count.as_str())]);
                Ok(docs)
            }
            Err(e) => {
                scope.fail(&e.to_string());
                Err(e)
            }
        }
    }

    /// Write `docs` as the deleted-docs file for `stem`, replacing any
    /// existing file.
    ///
    /// # Errors
    ///
    /// - `CannotCreateFile` if the file cannot be opened for writing
    /// - `HeaderOverflow` if the header does not fit (checked before opening)
    /// - `WriteFailed` (FATAL) if any write or the final close fails
    pub fn write(fs: &mut FsHandler, stem: &str, docs: &DeletedDocs) -> CodecResult<()> {
        let path = Self::full_path(stem);
        let count = docs.count().to_string();
        let scope = ObservationScope::with_fields(
            "DELETED_DOCS_WRITE",
            &[("path", path.as_str()), ("count", count.as_str())],
        );

        let payload = docs.to_payload();
        let mut map = HeaderMap::new();
        map.insert(SIZE_KEY.to_string(), payload.len().to_string());

        let header = match encode_header(&map) {
            Ok(header) => header,
            Err(e) => {
                let e = e.at_path(&path);
                scope.fail(&e.to_string());
                return Err(e);
            }
        };

        let mut stream = match WriteGuard::open(fs.writer.as_mut(), &path) {
            Ok(stream) => stream,
            Err(e) => {
                let e = CodecError::cannot_create_file(&path, e);
                scope.fail(&e.to_string());
                return Err(e);
            }
        };

        let written = match Self::write_frame(&mut stream, &header, &payload) {
            Ok(()) => stream.finish(),
            Err(e) => {
                drop(stream);
                Err(e)
            }
        };

        if let Err(e) = written {
            let e = CodecError::write_failed(&path, e);
            scope.fail_fatal(&e.to_string());
            return Err(e);
        }

        let bytes = payload.len().to_string();
        scope.complete_with_fields(&[("bytes", bytes.as_str())]);
        Ok(())
    }

    /// Number of offsets in the deleted-docs file for `stem`.
    ///
    /// Verifies the file exactly like [`DeletedDocsFormat::read`] (the payload
    /// is read in full so the checksum can be checked) but does not build the
    /// offset list. Uses the read stream only.
    pub fn read_size(fs: &mut FsHandler, stem: &str) -> CodecResult<usize> {
        let path = Self::full_path(stem);
        let scope = ObservationScope::with_fields("DELETED_DOCS_READ_SIZE", &[("path", path.as_str())]);

        let result = Self::read_frame(fs.reader.as_mut(), &path).and_then(|frame| {
            Self::verify(&frame, &path)?;
            Ok(frame.payload.len() / OFFSET_SIZE)
        });

        match result {
            Ok(count) => {
                let count_field = count.to_string();
                scope.complete_with_fields(&[("count", count_field.as_str())]);
                Ok(count)
            }
            Err(e) => {
                scope.fail(&e.to_string());
                Err(e)
            }
        }
    }

    /// Decode only the header of the deleted-docs file for `stem`.
    ///
    /// The checksum is not verified; this is a diagnostic view.
    pub fn inspect(fs: &mut FsHandler, stem: &str) -> CodecResult<HeaderMap> {
        let path = Self::full_path(stem);
        let mut stream = ReadGuard::open(fs.reader.as_mut(), &path)
            .map_err(|e| CodecError::cannot_open_file(&path, e))?;

        check_magic(&mut stream, &path)?;
        let header = Self::read_header_block(&mut stream, &path)?;
        decode_header(&header).map_err(|e| e.at_path(&path))
    }

    fn read_frame<R: StreamReader + ?Sized>(reader: &mut R, path: &str) -> CodecResult<Frame> {
        let mut stream =
            ReadGuard::open(reader, path).map_err(|e| CodecError::cannot_open_file(path, e))?;

        check_magic(&mut stream, path)?;

        let header = Self::read_header_block(&mut stream, path)?;
        let size = match Self::declared_size(&header, path) {
            Ok(size) => size,
            Err(e) => return Err(Self::classify_header_failure(&mut stream, &header, path, e)),
        };

        // Refuse to allocate for a payload the file cannot hold
        if let Some(length) = stream.length() {
            let framing = (MAGIC_SIZE + HEADER_SIZE + SUM_SIZE) as u64;
            let needed = framing.checked_add(size);
            if needed.map_or(true, |needed| needed > length) {
                let short = CodecError::truncated(
                    path,
                    format!(
                        "header declares {} payload bytes, file holds {}",
                        size,
                        length.saturating_sub(framing)
                    ),
                );
                return Err(Self::classify_header_failure(&mut stream, &header, path, short));
            }
        }

        let size = usize::try_from(size).map_err(|_| {
            CodecError::header_corrupt(format!("Payload size {} exceeds address space", size))
                .at_path(path)
        })?;

        let mut payload = vec![0u8; size];
        stream
            .read(&mut payload)
            .map_err(|e| Self::read_error(path, "payload", e))?;

        let mut checksum = [0u8; SUM_SIZE];
        stream
            .read(&mut checksum)
            .map_err(|e| Self::read_error(path, "checksum", e))?;

        stream.close();

        Ok(Frame {
            header,
            payload,
            stored_checksum: u32::from_le_bytes(checksum),
        })
    }

    fn declared_size(header: &[u8], path: &str) -> CodecResult<u64> {
        let map = decode_header(header).map_err(|e| e.at_path(path))?;
        let size = header_size_field(&map).map_err(|e| e.at_path(path))?;

        if size % OFFSET_SIZE as u64 != 0 {
            return Err(CodecError::header_corrupt(format!(
                "Payload size {} is not a multiple of {}",
                size, OFFSET_SIZE
            ))
            .at_path(path));
        }
        Ok(size)
    }

    /// Decide whether a header that cannot be used was written that way or
    /// damaged afterwards.
    ///
    /// Covers an undecodable header and a declared size the file cannot hold.
    /// When the stream length is known, everything after the header is taken
    /// as payload + checksum. If that checksum fails the file was altered or
    /// cut short on disk and is reported as a checksum mismatch; otherwise the
    /// writer really produced this header and `header_error` stands.
    ///
    /// The rest of the file is read into one buffer. Its size comes from the
    /// stream length, never from the declared size, so it is bounded by what
    /// is actually on disk.
    fn classify_header_failure<R: StreamReader + ?Sized>(
        stream: &mut ReadGuard<'_, R>,
        header: &[u8],
        path: &str,
        header_error: CodecError,
    ) -> CodecError {
        let Some(length) = stream.length() else {
            return header_error;
        };
        let framing = (MAGIC_SIZE + HEADER_SIZE + SUM_SIZE) as u64;
        let Some(body) = length
            .checked_sub(framing)
            .and_then(|body| usize::try_from(body).ok())
        else {
            return header_error;
        };

        let mut payload = vec![0u8; body];
        let mut checksum = [0u8; SUM_SIZE];
        if stream.read(&mut payload).is_err() || stream.read(&mut checksum).is_err() {
            return header_error;
        }

        match verify_checksum(header, &payload, u32::from_le_bytes(checksum)) {
            Ok(()) => header_error,
            Err(mismatch) => mismatch.at_path(path),
        }
    }

    fn read_header_block<R: StreamReader + ?Sized>(
        stream: &mut ReadGuard<'_, R>,
        path: &str,
    ) -> CodecResult<Vec<u8>> {
        let mut header = vec![0u8; HEADER_SIZE];
        stream
            .read(&mut header)
            .map_err(|e| Self::read_error(path, "header", e))?;
        Ok(header)
    }

    fn write_frame<W: StreamWriter + ?Sized>(
        stream: &mut WriteGuard<'_, W>,
        header: &[u8],
        payload: &[u8],
    ) -> StreamResult<()> {
        write_magic(stream)?;
        stream.write(header)?;
        stream.write(payload)?;
        write_checksum(stream, header, payload)
    }

    fn verify(frame: &Frame, path: &str) -> CodecResult<()> {
        verify_checksum(&frame.header, &frame.payload, frame.stored_checksum)
            .map_err(|e| e.at_path(path))
    }

    fn read_error(path: &str, block: &str, error: StreamError) -> CodecError {
        match error {
            StreamError::ShortRead { wanted, got } => CodecError::truncated(
                path,
                format!("{} block needs {} bytes, got {}", block, wanted, got),
            ),
            other => CodecError::read_failed(path, other),
        }
    }
}
