/// Size of a record header: three big-endian `i32` fields.
pub const HEADER_SIZE: usize = 12;

/// Fixed-size record header as it appears on the wire.
///
/// ```text
/// [4 bytes: start of replaced base range (big-endian i32)]
/// [4 bytes: end of replaced base range   (big-endian i32)]
/// [4 bytes: replacement length           (big-endian i32)]
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordHeader {
    pub start: i32,
    pub end: i32,
    pub len: i32,
}

impl RecordHeader {
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..4].copy_from_slice(&self.start.to_be_bytes());
        out[4..8].copy_from_slice(&self.end.to_be_bytes());
        out[8..12].copy_from_slice(&self.len.to_be_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Self {
        let field = |i: usize| i32::from_be_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
        Self {
            start: field(0),
            end: field(4),
            len: field(8),
        }
    }
}

/// A decoded record: replace base bytes `[start, end)` with `data`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatchRecord<'a> {
    /// Position of the record header within the patch.
    pub offset: usize,
    pub start: usize,
    pub end: usize,
    pub data: &'a [u8],
}

impl PatchRecord<'_> {
    /// Number of base bytes this record removes.
    pub fn replaced_len(&self) -> usize {
        self.end - self.start
    }

    /// Bytes this record occupies in the patch.
    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE + self.data.len()
    }
}
