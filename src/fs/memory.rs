//! # In-Memory Streams
//!
//! Files live in a shared map. A writer only publishes its bytes on `close`,
//! so a reader never observes a half-written file.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::backend::{StreamReader, StreamWriter};
use super::errors::{StreamError, StreamResult};

#[derive(Debug, Default)]
struct Inner {
    files: HashMap<String, Vec<u8>>,
    open_streams: usize,
}

/// Shared in-memory file store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Create a reader over this store
    pub fn reader(&self) -> MemoryStreamReader {
        MemoryStreamReader {
            store: self.clone(),
            data: None,
            position: 0,
        }
    }

    /// Create a writer over this store
    pub fn writer(&self) -> MemoryStreamWriter {
        MemoryStreamWriter {
            store: self.clone(),
            path: None,
            buffer: Vec::new(),
        }
    }

    /// Contents of a file, if present
    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.lock().files.get(path).cloned()
    }

    /// Replace the contents of a file
    pub fn put(&self, path: &str, data: Vec<u8>) {
        self.lock().files.insert(path.to_string(), data);
    }

    pub fn contains(&self, path: &str) -> bool {
        self.lock().files.contains_key(path)
    }

    /// Number of readers and writers currently holding a file open
    pub fn open_streams(&self) -> usize {
        self.lock().open_streams
    }

    fn stream_opened(&self) {
        self.lock().open_streams += 1;
    }

    fn stream_closed(&self) {
        let mut inner = self.lock();
        inner.open_streams = inner.open_streams.saturating_sub(1);
    }
}

/// Reader over a [`MemoryStore`]
#[derive(Debug)]
pub struct MemoryStreamReader {
    store: MemoryStore,
    data: Option<Vec<u8>>,
    position: usize,
}

impl StreamReader for MemoryStreamReader {
    fn open(&mut self, path: &str) -> StreamResult<()> {
        self.close();
        let data = self
            .store
            .get(path)
            .ok_or_else(|| StreamError::NotFound(path.to_string()))?;

        self.data = Some(data);
        self.position = 0;
        self.store.stream_opened();
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> StreamResult<()> {
        let data = self.data.as_ref().ok_or(StreamError::NotOpen)?;
        let remaining = &data[self.position..];

        if remaining.len() < buf.len() {
            self.position = data.len();
            return Err(StreamError::ShortRead {
                wanted: buf.len(),
                got: remaining.len(),
            });
        }

        buf.copy_from_slice(&remaining[..buf.len()]);
        self.position += buf.len();
        Ok(())
    }

    fn length(&self) -> Option<u64> {
        self.data.as_ref().map(|d| d.len() as u64)
    }

    fn close(&mut self) {
        if self.data.take().is_some() {
            self.store.stream_closed();
        }
        self.position = 0;
    }
}

/// Writer over a [`MemoryStore`]
#[derive(Debug)]
pub struct MemoryStreamWriter {
    store: MemoryStore,
    path: Option<String>,
    buffer: Vec<u8>,
}

impl StreamWriter for MemoryStreamWriter {
    fn open(&mut self, path: &str) -> StreamResult<()> {
        if self.path.is_some() {
            self.close()?;
        }
        self.path = Some(path.to_string());
        self.buffer.clear();
        self.store.stream_opened();
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> StreamResult<()> {
        if self.path.is_none() {
            return Err(StreamError::NotOpen);
        }
        self.buffer.extend_from_slice(data);
        Ok(())
    }

    fn close(&mut self) -> StreamResult<()> {
        if let Some(path) = self.path.take() {
            let data = std::mem::take(&mut self.buffer);
            self.store.put(&path, data);
            self.store.stream_closed();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_publishes_on_close() {
        let store = MemoryStore::new();
        let mut writer = store.writer();

        writer.open("seg.del").unwrap();
        writer.write(b"abc").unwrap();
        assert!(!store.contains("seg.del"));

        writer.close().unwrap();
        assert_eq!(store.get("seg.del").unwrap(), b"abc");
    }

    #[test]
    fn test_reader_missing_file() {
        let store = MemoryStore::new();
        let mut reader = store.reader();
        assert!(matches!(reader.open("nope.del"), Err(StreamError::NotFound(_))));
        assert_eq!(store.open_streams(), 0);
    }

    #[test]
    fn test_reader_sequential_reads() {
        let store = MemoryStore::new();
        store.put("seg.del", vec![1, 2, 3, 4]);

        let mut reader = store.reader();
        reader.open("seg.del").unwrap();
        assert_eq!(reader.length(), Some(4));

        let mut first = [0u8; 3];
        reader.read(&mut first).unwrap();
        assert_eq!(first, [1, 2, 3]);

        let mut second = [0u8; 2];
        assert!(matches!(
            reader.read(&mut second),
            Err(StreamError::ShortRead { wanted: 2, got: 1 })
        ));

        reader.close();
        assert_eq!(store.open_streams(), 0);
    }
}
