use bdiff_diff::Hunk;
use bdiff_lines::{split_lines, LineSequence};
use tracing::debug;

use crate::error::{PatchError, PatchResult};
use crate::record::{RecordHeader, HEADER_SIZE};

/// Builds a patch one record at a time.
#[derive(Debug, Default)]
pub struct PatchWriter {
    buf: Vec<u8>,
    previous_end: usize,
    records: usize,
}

impl PatchWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record replacing base bytes `[start, end)` with `data`.
    ///
    /// Records must arrive in base order and must not overlap.
    pub fn push_record(&mut self, start: usize, end: usize, data: &[u8]) -> PatchResult<()> {
        let offset = self.buf.len();
        if start > end {
            return Err(PatchError::InvertedRange { offset, start, end });
        }
        if start < self.previous_end {
            return Err(PatchError::NonMonotonic {
                offset,
                start,
                previous_end: self.previous_end,
            });
        }

        let header = RecordHeader {
            start: to_field("start", start)?,
            end: to_field("end", end)?,
            len: to_field("length", data.len())?,
        };

        self.buf
            .try_reserve(HEADER_SIZE + data.len())
            .map_err(PatchError::exhausted("writing patch record"))?;
        self.buf.extend_from_slice(&header.to_bytes());
        self.buf.extend_from_slice(data);

        self.previous_end = end;
        self.records += 1;
        Ok(())
    }

    /// Number of records written.
    pub fn record_count(&self) -> usize {
        self.records
    }

    /// Size of the patch so far, in bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if no record has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The finished patch bytes.
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

fn to_field(field: &'static str, value: usize) -> PatchResult<i32> {
    i32::try_from(value).map_err(|_| PatchError::ValueOverflow { field, value })
}

/// Serialize `hunks` (computed between `old` and `new`) as a patch.
///
/// Each hunk becomes one record: the byte range of old lines
/// `[old_start, old_end)` is replaced by the bytes of new lines
/// `[new_start, new_end)`. A line index equal to the line count maps to
/// the end of the buffer.
pub fn encode(old: &LineSequence<'_>, new: &LineSequence<'_>, hunks: &[Hunk]) -> PatchResult<Vec<u8>> {
    let mut writer = PatchWriter::new();
    for hunk in hunks.iter().filter(|h| !h.is_noop()) {
        let out_of_range = || PatchError::HunkOutOfRange {
            hunk: *hunk,
            old_lines: old.len(),
            new_lines: new.len(),
        };
        let start = old.offset_of(hunk.old_start).ok_or_else(out_of_range)?;
        let end = old.offset_of(hunk.old_end).ok_or_else(out_of_range)?;
        let data = new
            .span(hunk.new_start, hunk.new_end)
            .ok_or_else(out_of_range)?;
        writer.push_record(start, end, data)?;
    }
    Ok(writer.finish())
}

/// Compute the patch that turns `old` into `new`.
pub fn diff_patch(old: &[u8], new: &[u8]) -> PatchResult<Vec<u8>> {
    let old_lines = split_lines(old)?;
    let new_lines = split_lines(new)?;
    let hunks = bdiff_diff::diff(&old_lines, &new_lines)?;
    let patch = encode(&old_lines, &new_lines, &hunks)?;
    debug!(
        old_len = old.len(),
        new_len = new.len(),
        hunks = hunks.len(),
        patch_len = patch.len(),
        "encoded patch"
    );
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(start: i32, end: i32, len: i32) -> Vec<u8> {
        RecordHeader { start, end, len }.to_bytes().to_vec()
    }

    #[test]
    fn insert_into_empty_base() {
        let patch = diff_patch(b"", b"hello\n").unwrap();
        let mut expected = header(0, 0, 6);
        expected.extend_from_slice(b"hello\n");
        assert_eq!(patch, expected);
    }

    #[test]
    fn identical_buffers_give_empty_patch() {
        assert!(diff_patch(b"a\nb\nc\n", b"a\nb\nc\n").unwrap().is_empty());
        assert!(diff_patch(b"", b"").unwrap().is_empty());
    }

    #[test]
    fn replacement_record() {
        let patch = diff_patch(b"a\nb\nc\n", b"a\nx\nc\n").unwrap();
        let mut expected = header(2, 4, 2);
        expected.extend_from_slice(b"x\n");
        assert_eq!(patch, expected);
    }

    #[test]
    fn deletion_record_has_no_payload() {
        let patch = diff_patch(b"a\nb\n", b"a\n").unwrap();
        assert_eq!(patch, header(2, 4, 0));
    }

    #[test]
    fn append_at_end_uses_base_length() {
        let patch = diff_patch(b"a\n", b"a\nb\n").unwrap();
        let mut expected = header(2, 2, 2);
        expected.extend_from_slice(b"b\n");
        assert_eq!(patch, expected);
    }

    #[test]
    fn unterminated_last_line() {
        let patch = diff_patch(b"a\nb", b"a\nc").unwrap();
        let mut expected = header(2, 3, 1);
        expected.push(b'c');
        assert_eq!(patch, expected);
    }

    #[test]
    fn writer_rejects_out_of_order_records() {
        let mut writer = PatchWriter::new();
        writer.push_record(4, 6, b"x").unwrap();
        let err = writer.push_record(5, 7, b"").unwrap_err();
        assert!(matches!(err, PatchError::NonMonotonic { offset: 13, start: 5, previous_end: 6 }));
        assert_eq!(writer.record_count(), 1);
        assert_eq!(writer.len(), 13);
    }

    #[test]
    fn writer_rejects_values_beyond_i32() {
        let mut writer = PatchWriter::new();
        let too_big = i32::MAX as usize + 1;
        let err = writer.push_record(0, too_big, b"").unwrap_err();
        assert!(matches!(err, PatchError::ValueOverflow { field: "end", .. }));
        assert!(writer.is_empty());
    }

    #[test]
    fn encode_skips_noop_hunks() {
        let old = split_lines(b"a\n").unwrap();
        let new = split_lines(b"a\n").unwrap();
        assert!(encode(&old, &new, &[Hunk::new(1, 1, 1, 1)]).unwrap().is_empty());
    }

    #[test]
    fn encode_rejects_foreign_hunks() {
        let old = split_lines(b"a\n").unwrap();
        let new = split_lines(b"b\n").unwrap();
        let err = encode(&old, &new, &[Hunk::new(0, 3, 0, 1)]).unwrap_err();
        assert!(matches!(err, PatchError::HunkOutOfRange { old_lines: 1, .. }));
    }
}
