//! # Byte Stream Traits
//!
//! The codec never touches files directly. It is handed a reader and a
//! writer that open a named file, move bytes, and close it again. Guards in
//! this module make sure a stream opened by the codec is closed on every exit
//! path, including early returns through `?`.

use std::fmt;
use std::path::PathBuf;

use super::errors::StreamResult;
use super::local::{LocalStreamReader, LocalStreamWriter};
use super::memory::MemoryStore;

/// Read side of a byte stream
pub trait StreamReader: Send + fmt::Debug {
    /// Open the named file for reading
    fn open(&mut self, path: &str) -> StreamResult<()>;

    /// Fill `buf` completely or fail with `StreamError::ShortRead`
    fn read(&mut self, buf: &mut [u8]) -> StreamResult<()>;

    /// Total length of the open file, when the backend knows it
    fn length(&self) -> Option<u64>;

    /// Release the open file. Closing a closed reader is a no-op.
    fn close(&mut self);
}

/// Write side of a byte stream
pub trait StreamWriter: Send + fmt::Debug {
    /// Create (or truncate) the named file for writing
    fn open(&mut self, path: &str) -> StreamResult<()>;

    /// Append all of `data`
    fn write(&mut self, data: &[u8]) -> StreamResult<()>;

    /// Commit and release the open file
    fn close(&mut self) -> StreamResult<()>;
}

/// Reader/writer pair handed to the codec
#[derive(Debug)]
pub struct FsHandler {
    pub reader: Box<dyn StreamReader>,
    pub writer: Box<dyn StreamWriter>,
}

impl FsHandler {
    /// Bundle an arbitrary reader and writer
    pub fn new(reader: Box<dyn StreamReader>, writer: Box<dyn StreamWriter>) -> Self {
        Self { reader, writer }
    }

    /// Streams over the local filesystem, rooted at `root`
    pub fn local(root: impl Into<PathBuf>, sync_on_close: bool) -> Self {
        let root = root.into();
        Self {
            reader: Box::new(LocalStreamReader::new(root.clone())),
            writer: Box::new(LocalStreamWriter::new(root, sync_on_close)),
        }
    }

    /// Streams over a shared in-memory store
    pub fn memory(store: &MemoryStore) -> Self {
        Self {
            reader: Box::new(store.reader()),
            writer: Box::new(store.writer()),
        }
    }
}

/// An open reader that is closed when the guard goes out of scope
pub struct ReadGuard<'a, R: StreamReader + ?Sized> {
    reader: &'a mut R,
}

impl<'a, R: StreamReader + ?Sized> ReadGuard<'a, R> {
    /// Open `path` and take ownership of closing it
    pub fn open(reader: &'a mut R, path: &str) -> StreamResult<Self> {
        reader.open(path)?;
        Ok(Self { reader })
    }

    pub fn read(&mut self, buf: &mut [u8]) -> StreamResult<()> {
        self.reader.read(buf)
    }

    pub fn length(&self) -> Option<u64> {
        self.reader.length()
    }

    /// Close now instead of at end of scope
    pub fn close(self) {
        drop(self);
    }
}

impl<R: StreamReader + ?Sized> Drop for ReadGuard<'_, R> {
    fn drop(&mut self) {
        self.reader.close();
    }
}

/// An open writer that is closed on drop unless `finish` already closed it
pub struct WriteGuard<'a, W: StreamWriter + ?Sized> {
    writer: &'a mut W,
    closed: bool,
}

impl<'a, W: StreamWriter + ?Sized> WriteGuard<'a, W> {
    /// Open `path` and take ownership of closing it
    pub fn open(writer: &'a mut W, path: &str) -> StreamResult<Self> {
        writer.open(path)?;
        Ok(Self {
            writer,
            closed: false,
        })
    }

    pub fn write(&mut self, data: &[u8]) -> StreamResult<()> {
        self.writer.write(data)
    }

    /// Close the writer and report whether the commit succeeded
    pub fn finish(mut self) -> StreamResult<()> {
        self.closed = true;
        self.writer.close()
    }
}

impl<W: StreamWriter + ?Sized> Drop for WriteGuard<'_, W> {
    fn drop(&mut self) {
        if !self.closed {
            // Error path; the caller already has a failure to report.
            let _ = self.writer.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_guard_closes_on_drop() {
        let store = MemoryStore::new();
        store.put("a.del", vec![1, 2, 3]);
        let mut fs = FsHandler::memory(&store);

        {
            let mut guard = ReadGuard::open(fs.reader.as_mut(), "a.del").unwrap();
            let mut buf = [0u8; 2];
            guard.read(&mut buf).unwrap();
            assert_eq!(store.open_streams(), 1);
        }

        assert_eq!(store.open_streams(), 0);
    }

    #[test]
    fn test_read_guard_closes_after_short_read() {
        let store = MemoryStore::new();
        store.put("a.del", vec![1, 2, 3]);
        let mut fs = FsHandler::memory(&store);

        fn read_too_much(reader: &mut dyn StreamReader) -> StreamResult<()> {
            let mut guard = ReadGuard::open(reader, "a.del")?;
            let mut buf = [0u8; 8];
            guard.read(&mut buf)
        }

        assert!(read_too_much(fs.reader.as_mut()).is_err());
        assert_eq!(store.open_streams(), 0);
    }

    #[test]
    fn test_write_guard_finish_commits() {
        let store = MemoryStore::new();
        let mut fs = FsHandler::memory(&store);

        let mut guard = WriteGuard::open(fs.writer.as_mut(), "b.del").unwrap();
        guard.write(b"hello").unwrap();
        guard.finish().unwrap();

        assert_eq!(store.get("b.del").unwrap(), b"hello");
        assert_eq!(store.open_streams(), 0);
    }

    #[test]
    fn test_write_guard_closes_on_drop() {
        let store = MemoryStore::new();
        let mut fs = FsHandler::memory(&store);

        {
            let mut guard = WriteGuard::open(fs.writer.as_mut(), "c.del").unwrap();
            guard.write(b"partial").unwrap();
            assert_eq!(store.open_streams(), 1);
        }

        assert_eq!(store.open_streams(), 0);
    }
}
