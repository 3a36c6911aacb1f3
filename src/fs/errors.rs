//! # Byte Stream Errors

use thiserror::Error;

/// Result type for stream operations
pub type StreamResult<T> = Result<T, StreamError>;

/// Errors raised by stream readers and writers
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Stream is not open")]
    NotOpen,

    #[error("Short read: wanted {wanted} bytes, got {got}")]
    ShortRead { wanted: usize, got: usize },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl StreamError {
    /// Wrap an I/O error with the path it occurred on
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        StreamError::Io {
            path: path.into(),
            source,
        }
    }
}
