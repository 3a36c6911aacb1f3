//! Per-segment owner of the deleted-docs list
//!
//! Holds the in-memory `DeletedDocs` for one segment and moves it to and
//! from `<segment>.del` through the codec. This is where codec failures turn
//! into policy:
//!
//! - A missing file on load means the segment has no deletions yet.
//! - Any other load failure is returned to the caller.
//! - A fatal persist failure is sent to the shutdown listener before the
//!   error is returned.

use super::deleted_docs::{DeletedDocs, SegmentOffset};
use crate::codec::{CodecErrorCode, CodecResult, DeletedDocsFormat};
use crate::fs::FsHandler;
use crate::lifecycle::ShutdownNotifier;
use crate::observability::Logger;

/// Deletion log of one segment
#[derive(Debug)]
pub struct SegmentDeletionLog {
    segment: String,
    fs: FsHandler,
    shutdown: ShutdownNotifier,
    deleted: DeletedDocs,
}

impl SegmentDeletionLog {
    /// Create an empty log for `segment` (the path stem, without postfix)
    pub fn new(segment: impl Into<String>, fs: FsHandler, shutdown: ShutdownNotifier) -> Self {
        Self {
            segment: segment.into(),
            fs,
            shutdown,
            deleted: DeletedDocs::empty(),
        }
    }

    pub fn segment(&self) -> &str {
        &self.segment
    }

    /// Replace the in-memory list with the one on disk.
    pub fn load(&mut self) -> CodecResult<&DeletedDocs> {
        match DeletedDocsFormat::read(&mut self.fs, &self.segment) {
            Ok(docs) => self.deleted = docs,
            Err(e) if e.code() == CodecErrorCode::CannotOpenFile => {
                Logger::info(
                    "SEGMENT_DELETIONS_ABSENT",
                    &[("segment", self.segment.as_str())],
                );
                self.deleted = DeletedDocs::empty();
            }
            Err(e) => return Err(e),
        }
        Ok(&self.deleted)
    }

    /// Append `offsets` to the in-memory list. Nothing is written until
    /// [`SegmentDeletionLog::persist`].
    pub fn mark_deleted(&mut self, offsets: &[SegmentOffset]) {
        self.deleted = self.deleted.extended(offsets);
    }

    /// Write the in-memory list to disk.
    ///
    /// A fatal failure also sends a shutdown request.
    pub fn persist(&mut self) -> CodecResult<()> {
        let result = DeletedDocsFormat::write(&mut self.fs, &self.segment, &self.deleted);

        if let Err(ref e) = result {
            if e.is_fatal() {
                let origin = format!("segment {}", self.segment);
                if !self.shutdown.request(origin, e.to_string()) {
                    Logger::warn(
                        "SHUTDOWN_LISTENER_GONE",
                        &[("segment", self.segment.as_str())],
                    );
                }
            }
        }
        result
    }

    /// In-memory deleted offsets
    pub fn deleted(&self) -> &DeletedDocs {
        &self.deleted
    }

    /// Number of in-memory deleted offsets
    pub fn count(&self) -> usize {
        self.deleted.count()
    }

    /// Number of offsets in the persisted file
    pub fn stored_count(&mut self) -> CodecResult<usize> {
        DeletedDocsFormat::read_size(&mut self.fs, &self.segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{MemoryStore, StreamError, StreamResult, StreamWriter};
    use crate::lifecycle::shutdown_channel;

    #[test]
    fn test_load_missing_is_empty() {
        let store = MemoryStore::new();
        let (notifier, _listener) = shutdown_channel();
        let mut log = SegmentDeletionLog::new("seg_1", FsHandler::memory(&store), notifier);

        assert!(log.load().unwrap().is_empty());
    }

    #[test]
    fn test_mark_persist_load() {
        let store = MemoryStore::new();
        let (notifier, listener) = shutdown_channel();

        let mut log = SegmentDeletionLog::new("seg_1", FsHandler::memory(&store), notifier.clone());
        log.mark_deleted(&[10, 37]);
        log.mark_deleted(&[512]);
        log.persist().unwrap();
        assert_eq!(log.stored_count().unwrap(), 3);

        let mut reopened = SegmentDeletionLog::new("seg_1", FsHandler::memory(&store), notifier);
        assert_eq!(reopened.load().unwrap().offsets(), &[10, 37, 512]);
        assert!(listener.try_recv().is_none());
    }

    #[test]
    fn test_corrupt_load_propagates() {
        let store = MemoryStore::new();
        store.put("seg_1.del", b"garbage!garbage!".to_vec());
        let (notifier, listener) = shutdown_channel();

        let mut log = SegmentDeletionLog::new("seg_1", FsHandler::memory(&store), notifier);
        let err = log.load().unwrap_err();
        assert_eq!(err.code(), CodecErrorCode::FormatMismatch);
        assert!(listener.try_recv().is_none());
    }

    #[derive(Debug)]
    struct BrokenWriter;

    impl StreamWriter for BrokenWriter {
        fn open(&mut self, _path: &str) -> StreamResult<()> {
            Ok(())
        }

        fn write(&mut self, _data: &[u8]) -> StreamResult<()> {
            Err(StreamError::io(
                "broken",
                std::io::Error::new(std::io::ErrorKind::Other, "device gone"),
            ))
        }

        fn close(&mut self) -> StreamResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_fatal_persist_requests_shutdown() {
        let store = MemoryStore::new();
        let fs = FsHandler::new(Box::new(store.reader()), Box::new(BrokenWriter));
        let (notifier, listener) = shutdown_channel();

        let mut log = SegmentDeletionLog::new("seg_9", fs, notifier);
        log.mark_deleted(&[1]);

        let err = log.persist().unwrap_err();
        assert!(err.is_fatal());

        let request = listener.try_recv().unwrap();
        assert_eq!(request.origin, "segment seg_9");
        assert!(request.reason.contains("DELDOCS_WRITE_FAILED"));
    }
}
