//! Deleted document offsets for one segment

/// Position of a document within its segment
pub type SegmentOffset = i64;

/// Width of one encoded offset in bytes
pub const OFFSET_SIZE: usize = std::mem::size_of::<SegmentOffset>();

/// Ordered list of offsets logically deleted from a segment.
///
/// Immutable once built. Order is preserved exactly as given; duplicates are
/// kept because the list is a log, not a set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletedDocs {
    offsets: Vec<SegmentOffset>,
}

impl DeletedDocs {
    pub fn new(offsets: Vec<SegmentOffset>) -> Self {
        Self { offsets }
    }

    /// An empty deletion list
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of deleted offsets
    pub fn count(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// The backing offsets, in order
    pub fn offsets(&self) -> &[SegmentOffset] {
        &self.offsets
    }

    /// Byte length of the encoded payload
    pub fn payload_size(&self) -> usize {
        self.offsets.len() * OFFSET_SIZE
    }

    /// Encode offsets as consecutive little-endian i64 values
    pub fn to_payload(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.payload_size());
        for offset in &self.offsets {
            buf.extend_from_slice(&offset.to_le_bytes());
        }
        buf
    }

    /// Decode a payload produced by [`DeletedDocs::to_payload`].
    ///
    /// Returns `None` if the length is not a whole number of offsets.
    pub fn from_payload(payload: &[u8]) -> Option<Self> {
        if payload.len() % OFFSET_SIZE != 0 {
            return None;
        }

        let offsets = payload
            .chunks_exact(OFFSET_SIZE)
            .map(|chunk| {
                let mut bytes = [0u8; OFFSET_SIZE];
                bytes.copy_from_slice(chunk);
                SegmentOffset::from_le_bytes(bytes)
            })
            .collect();

        Some(Self { offsets })
    }

    /// A new list with `more` appended after the existing offsets
    pub fn extended(&self, more: &[SegmentOffset]) -> Self {
        let mut offsets = Vec::with_capacity(self.offsets.len() + more.len());
        offsets.extend_from_slice(&self.offsets);
        offsets.extend_from_slice(more);
        Self { offsets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_and_size() {
        let docs = DeletedDocs::new(vec![10, 37, 512]);
        assert_eq!(docs.count(), 3);
        assert_eq!(docs.payload_size(), 24);
        assert_eq!(docs.offsets(), &[10, 37, 512]);
    }

    #[test]
    fn test_payload_is_little_endian() {
        let docs = DeletedDocs::new(vec![1, -1]);
        let payload = docs.to_payload();
        assert_eq!(&payload[0..8], &[1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&payload[8..16], &[0xFF; 8]);
    }

    #[test]
    fn test_from_payload_rejects_partial_offset() {
        assert!(DeletedDocs::from_payload(&[0u8; 12]).is_none());
        assert_eq!(DeletedDocs::from_payload(&[]).unwrap(), DeletedDocs::empty());
    }

    #[test]
    fn test_extended_preserves_order() {
        let docs = DeletedDocs::new(vec![5, 3]);
        let more = docs.extended(&[9, 3]);
        assert_eq!(more.offsets(), &[5, 3, 9, 3]);
        assert_eq!(docs.count(), 2);
    }
}
