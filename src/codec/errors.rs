//! Codec error types for deleted-docs files
//!
//! Error codes:
//! - DELDOCS_CANNOT_OPEN_FILE (ERROR severity)
//! - DELDOCS_CANNOT_CREATE_FILE (ERROR severity)
//! - DELDOCS_FORMAT_MISMATCH (ERROR severity)
//! - DELDOCS_HEADER_CORRUPT (ERROR severity)
//! - DELDOCS_HEADER_OVERFLOW (ERROR severity)
//! - DELDOCS_TRUNCATED (ERROR severity)
//! - DELDOCS_READ_FAILED (ERROR severity)
//! - DELDOCS_CHECKSUM_MISMATCH (ERROR severity)
//! - DELDOCS_WRITE_FAILED (FATAL severity)
//!
//! Read-side failures are recoverable: the caller decides whether a missing
//! or corrupt deletion log means "no deletions" or a hard failure. A failed
//! write may leave a half-written file behind, so it is the only fatal kind.

use std::fmt;

use crate::fs::StreamError;

/// Severity levels for codec errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, owner continues
    Error,
    /// Owner should begin an orderly shutdown
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Codec error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecErrorCode {
    /// Read stream could not be opened
    CannotOpenFile,
    /// Write stream could not be opened
    CannotCreateFile,
    /// Magic block does not match
    FormatMismatch,
    /// Header block undecodable or missing a required key
    HeaderCorrupt,
    /// Header map does not fit in the fixed header block
    HeaderOverflow,
    /// Stream ended before the declared payload or checksum
    Truncated,
    /// I/O failure while reading an open file
    ReadFailed,
    /// Stored checksum disagrees with header + payload
    ChecksumMismatch,
    /// I/O failure while writing or closing the file
    WriteFailed,
}

impl CodecErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            CodecErrorCode::CannotOpenFile => "DELDOCS_CANNOT_OPEN_FILE",
            CodecErrorCode::CannotCreateFile => "DELDOCS_CANNOT_CREATE_FILE",
            CodecErrorCode::FormatMismatch => "DELDOCS_FORMAT_MISMATCH",
            CodecErrorCode::HeaderCorrupt => "DELDOCS_HEADER_CORRUPT",
            CodecErrorCode::HeaderOverflow => "DELDOCS_HEADER_OVERFLOW",
            CodecErrorCode::Truncated => "DELDOCS_TRUNCATED",
            CodecErrorCode::ReadFailed => "DELDOCS_READ_FAILED",
            CodecErrorCode::ChecksumMismatch => "DELDOCS_CHECKSUM_MISMATCH",
            CodecErrorCode::WriteFailed => "DELDOCS_WRITE_FAILED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            CodecErrorCode::WriteFailed => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for CodecErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Codec error with the full file path in its message
#[derive(Debug)]
pub struct CodecError {
    code: CodecErrorCode,
    message: String,
    details: Option<String>,
    source: Option<StreamError>,
}

impl CodecError {
    fn new(code: CodecErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Read stream could not be opened
    pub fn cannot_open_file(path: &str, source: StreamError) -> Self {
        Self {
            source: Some(source),
            ..Self::new(
                CodecErrorCode::CannotOpenFile,
                format!("Fail to open deleted docs file: {}", path),
            )
        }
    }

    /// Write stream could not be opened
    pub fn cannot_create_file(path: &str, source: StreamError) -> Self {
        Self {
            source: Some(source),
            ..Self::new(
                CodecErrorCode::CannotCreateFile,
                format!("Fail to create deleted docs file: {}", path),
            )
        }
    }

    /// Magic block mismatch
    pub fn format_mismatch(path: &str, reason: impl Into<String>) -> Self {
        Self::new(
            CodecErrorCode::FormatMismatch,
            format!("Not a deleted docs file: {}", path),
        )
        .with_details(reason)
    }

    /// Header could not be decoded
    ///
    /// Raised by the header codec before a path is known; the format layer
    /// rewraps it with [`CodecError::at_path`].
    pub fn header_corrupt(reason: impl Into<String>) -> Self {
        Self::new(CodecErrorCode::HeaderCorrupt, reason)
    }

    /// Encoded header exceeds the fixed block
    pub fn header_overflow(encoded_len: usize, capacity: usize) -> Self {
        Self::new(
            CodecErrorCode::HeaderOverflow,
            format!(
                "Encoded header is {} bytes, capacity is {}",
                encoded_len, capacity
            ),
        )
    }

    /// Stream ended early
    pub fn truncated(path: &str, reason: impl Into<String>) -> Self {
        Self::new(
            CodecErrorCode::Truncated,
            format!("Truncated deleted docs file: {}", path),
        )
        .with_details(reason)
    }

    /// Read from an open stream failed
    pub fn read_failed(path: &str, source: StreamError) -> Self {
        Self {
            source: Some(source),
            ..Self::new(
                CodecErrorCode::ReadFailed,
                format!("Failed to read deleted docs file: {}", path),
            )
        }
    }

    /// Checksum disagreement
    pub fn checksum_mismatch(expected: u32, actual: u32) -> Self {
        Self::new(CodecErrorCode::ChecksumMismatch, "Checksum mismatch").with_details(format!(
            "stored: {:08x}, computed: {:08x}",
            expected, actual
        ))
    }

    /// Write or close failed (FATAL)
    pub fn write_failed(path: &str, source: StreamError) -> Self {
        Self {
            source: Some(source),
            ..Self::new(
                CodecErrorCode::WriteFailed,
                format!("Failed to write deleted docs: {}", path),
            )
        }
    }

    /// Attaches additional context
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Appends the file this error concerns to the message.
    pub fn at_path(mut self, path: &str) -> Self {
        let original = std::mem::take(&mut self.message);
        self.message = format!("{}: {}", original, path);
        self
    }

    /// Returns the error code
    pub fn code(&self) -> CodecErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns whether the owner should shut down
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        if let Some(ref source) = self.source {
            write!(f, ": {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;
