//! CLI-specific error types

use std::fmt;
use std::io;

use crate::codec::CodecError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdout)
    IoError,
    /// Codec operation failed
    CodecFailed,
    /// Codec failure that requested shutdown
    Fatal,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "DELDOCS_CLI_CONFIG_ERROR",
            Self::IoError => "DELDOCS_CLI_IO_ERROR",
            Self::CodecFailed => "DELDOCS_CLI_CODEC_FAILED",
            Self::Fatal => "DELDOCS_CLI_FATAL",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn fatal(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::Fatal, msg)
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        Self::io_error(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", err))
    }
}

impl From<CodecError> for CliError {
    fn from(err: CodecError) -> Self {
        Self::new(CliErrorCode::CodecFailed, err.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
