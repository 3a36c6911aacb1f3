//! # Local Filesystem Streams

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::PathBuf;

use super::backend::{StreamReader, StreamWriter};
use super::errors::{StreamError, StreamResult};

/// Reads files relative to a root directory
#[derive(Debug)]
pub struct LocalStreamReader {
    root: PathBuf,
    path: String,
    file: Option<BufReader<File>>,
    length: Option<u64>,
}

impl LocalStreamReader {
    /// Create a reader rooted at `root`
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            path: String::new(),
            file: None,
            length: None,
        }
    }
}

impl StreamReader for LocalStreamReader {
    fn open(&mut self, path: &str) -> StreamResult<()> {
        self.close();
        let full_path = self.root.join(path);

        let file = File::open(&full_path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StreamError::NotFound(full_path.display().to_string())
            } else {
                StreamError::io(full_path.display().to_string(), e)
            }
        })?;
        let length = file
            .metadata()
            .map_err(|e| StreamError::io(full_path.display().to_string(), e))?
            .len();

        self.path = full_path.display().to_string();
        self.file = Some(BufReader::new(file));
        self.length = Some(length);
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> StreamResult<()> {
        let file = self.file.as_mut().ok_or(StreamError::NotOpen)?;

        let mut filled = 0;
        while filled < buf.len() {
            match file.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(StreamError::io(self.path.clone(), e)),
            }
        }

        if filled < buf.len() {
            return Err(StreamError::ShortRead {
                wanted: buf.len(),
                got: filled,
            });
        }
        Ok(())
    }

    fn length(&self) -> Option<u64> {
        self.length
    }

    fn close(&mut self) {
        self.file = None;
        self.length = None;
    }
}

/// Writes files relative to a root directory, creating parents as needed
#[derive(Debug)]
pub struct LocalStreamWriter {
    root: PathBuf,
    sync_on_close: bool,
    path: String,
    file: Option<BufWriter<File>>,
}

impl LocalStreamWriter {
    /// Create a writer rooted at `root`
    ///
    /// With `sync_on_close`, `close` fsyncs the file before releasing it.
    pub fn new(root: PathBuf, sync_on_close: bool) -> Self {
        Self {
            root,
            sync_on_close,
            path: String::new(),
            file: None,
        }
    }
}

impl StreamWriter for LocalStreamWriter {
    fn open(&mut self, path: &str) -> StreamResult<()> {
        let full_path = self.root.join(path);
        let display = full_path.display().to_string();

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(|e| StreamError::io(display.clone(), e))?;
        }

        let file = File::create(&full_path).map_err(|e| StreamError::io(display.clone(), e))?;

        self.path = display;
        self.file = Some(BufWriter::new(file));
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> StreamResult<()> {
        let file = self.file.as_mut().ok_or(StreamError::NotOpen)?;
        file.write_all(data)
            .map_err(|e| StreamError::io(self.path.clone(), e))
    }

    fn close(&mut self) -> StreamResult<()> {
        let Some(writer) = self.file.take() else {
            return Ok(());
        };

        let file = writer
            .into_inner()
            .map_err(|e| StreamError::io(self.path.clone(), e.into_error()))?;

        if self.sync_on_close {
            // fsync - the file must be durable before the write is acknowledged
            file.sync_all()
                .map_err(|e| StreamError::io(self.path.clone(), e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_read() {
        let temp = TempDir::new().unwrap();
        let mut writer = LocalStreamWriter::new(temp.path().to_path_buf(), true);
        writer.open("seg_1.del").unwrap();
        writer.write(b"hello").unwrap();
        writer.close().unwrap();

        let mut reader = LocalStreamReader::new(temp.path().to_path_buf());
        reader.open("seg_1.del").unwrap();
        assert_eq!(reader.length(), Some(5));

        let mut buf = [0u8; 5];
        reader.read(&mut buf).unwrap();
        assert_eq!(&buf, b"hello");
        reader.close();
    }

    #[test]
    fn test_nested_path() {
        let temp = TempDir::new().unwrap();
        let mut writer = LocalStreamWriter::new(temp.path().to_path_buf(), false);
        writer.open("a/b/c/seg.del").unwrap();
        writer.write(b"nested").unwrap();
        writer.close().unwrap();

        assert!(temp.path().join("a/b/c/seg.del").exists());
    }

    #[test]
    fn test_open_missing_is_not_found() {
        let temp = TempDir::new().unwrap();
        let mut reader = LocalStreamReader::new(temp.path().to_path_buf());

        let err = reader.open("missing.del").unwrap_err();
        assert!(matches!(err, StreamError::NotFound(_)));
    }

    #[test]
    fn test_short_read_reports_counts() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("short.del"), b"abc").unwrap();

        let mut reader = LocalStreamReader::new(temp.path().to_path_buf());
        reader.open("short.del").unwrap();

        let mut buf = [0u8; 8];
        match reader.read(&mut buf) {
            Err(StreamError::ShortRead { wanted, got }) => {
                assert_eq!(wanted, 8);
                assert_eq!(got, 3);
            }
            other => panic!("expected short read, got {:?}", other),
        }
    }

    #[test]
    fn test_read_without_open() {
        let temp = TempDir::new().unwrap();
        let mut reader = LocalStreamReader::new(temp.path().to_path_buf());
        let mut buf = [0u8; 1];
        assert!(matches!(reader.read(&mut buf), Err(StreamError::NotOpen)));
    }
}
