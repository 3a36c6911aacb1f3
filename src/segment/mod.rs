//! Segment-side view of deleted documents
//!
//! - `DeletedDocs`: the ordered offset list for one segment
//! - `SegmentDeletionLog`: owns a segment's list and persists it through the
//!   deleted-docs codec

mod deleted_docs;
mod deletion_log;

pub use deleted_docs::{DeletedDocs, SegmentOffset, OFFSET_SIZE};
pub use deletion_log::SegmentDeletionLog;
