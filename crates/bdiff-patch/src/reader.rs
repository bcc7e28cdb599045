use crate::error::{PatchError, PatchResult};
use crate::record::{PatchRecord, RecordHeader, HEADER_SIZE};

/// Iterates over the records of a patch without copying payloads.
///
/// Checks each record on its own: complete header, non-negative fields,
/// `start <= end`, complete payload. Checks that need the base buffer
/// (bounds, ordering) belong to [`patched_size`] and `apply`. After the
/// first error the iterator is exhausted.
#[derive(Clone, Debug)]
pub struct PatchReader<'a> {
    data: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> PatchReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            failed: false,
        }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn read_record(&mut self) -> PatchResult<PatchRecord<'a>> {
        let offset = self.pos;
        let rest = &self.data[offset..];

        let header_bytes: &[u8; HEADER_SIZE] = rest
            .get(..HEADER_SIZE)
            .and_then(|b| b.try_into().ok())
            .ok_or(PatchError::Truncated {
                offset,
                needed: HEADER_SIZE,
                available: rest.len(),
            })?;
        let header = RecordHeader::from_bytes(header_bytes);

        let start = non_negative(offset, "start", header.start)?;
        let end = non_negative(offset, "end", header.end)?;
        let len = non_negative(offset, "length", header.len)?;
        if start > end {
            return Err(PatchError::InvertedRange { offset, start, end });
        }

        let data = rest[HEADER_SIZE..]
            .get(..len)
            .ok_or(PatchError::Truncated {
                offset,
                needed: HEADER_SIZE + len,
                available: rest.len(),
            })?;

        self.pos = offset + HEADER_SIZE + len;
        Ok(PatchRecord {
            offset,
            start,
            end,
            data,
        })
    }
}

fn non_negative(offset: usize, field: &'static str, value: i32) -> PatchResult<usize> {
    usize::try_from(value).map_err(|_| PatchError::NegativeField {
        offset,
        field,
        value,
    })
}

impl<'a> Iterator for PatchReader<'a> {
    type Item = PatchResult<PatchRecord<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.data.len() {
            return None;
        }
        let result = self.read_record();
        self.failed = result.is_err();
        Some(result)
    }
}

/// Tracks ordering and bounds of successive records against a base length.
#[derive(Debug)]
pub(crate) struct BaseCursor {
    base_len: usize,
    previous_end: usize,
}

impl BaseCursor {
    pub(crate) fn new(base_len: usize) -> Self {
        Self {
            base_len,
            previous_end: 0,
        }
    }

    pub(crate) fn check(&mut self, record: &PatchRecord<'_>) -> PatchResult<()> {
        if record.start < self.previous_end {
            return Err(PatchError::NonMonotonic {
                offset: record.offset,
                start: record.start,
                previous_end: self.previous_end,
            });
        }
        if record.end > self.base_len {
            return Err(PatchError::OutOfBounds {
                offset: record.offset,
                start: record.start,
                end: record.end,
                base_len: self.base_len,
            });
        }
        self.previous_end = record.end;
        Ok(())
    }
}

/// Length of the buffer that applying `patch` to a base of `base_len`
/// bytes produces. Validates the whole patch without allocating.
pub fn patched_size(base_len: usize, patch: &[u8]) -> PatchResult<usize> {
    let mut cursor = BaseCursor::new(base_len);
    let mut removed = 0usize;
    let mut added = 0usize;
    for record in PatchReader::new(patch) {
        let record = record?;
        cursor.check(&record)?;
        removed += record.replaced_len();
        added += record.data.len();
    }
    Ok(base_len - removed + added)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(start: i32, end: i32, data: &[u8]) -> Vec<u8> {
        let header = RecordHeader {
            start,
            end,
            len: data.len() as i32,
        };
        let mut out = header.to_bytes().to_vec();
        out.extend_from_slice(data);
        out
    }

    #[test]
    fn empty_patch_has_no_records() {
        assert_eq!(PatchReader::new(&[]).count(), 0);
        assert_eq!(patched_size(7, &[]).unwrap(), 7);
    }

    #[test]
    fn reads_records_in_order() {
        let mut patch = record(0, 2, b"xy");
        patch.extend(record(4, 4, b"z"));
        let records: Vec<_> = PatchReader::new(&patch).collect::<PatchResult<_>>().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!((records[0].start, records[0].end, records[0].data), (0, 2, &b"xy"[..]));
        assert_eq!(records[1].offset, 14);
        assert_eq!(records[1].encoded_len(), 13);
    }

    #[test]
    fn truncated_header() {
        let err = PatchReader::new(&[0, 0, 0]).next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            PatchError::Truncated {
                offset: 0,
                needed: 12,
                available: 3
            }
        ));
    }

    #[test]
    fn truncated_payload() {
        let mut patch = record(0, 0, b"hello");
        patch.truncate(patch.len() - 1);
        let err = patched_size(0, &patch).unwrap_err();
        assert!(matches!(err, PatchError::Truncated { needed: 17, available: 16, .. }));
    }

    #[test]
    fn negative_fields_rejected() {
        let err = patched_size(10, &record(-1, 2, b"")).unwrap_err();
        assert!(matches!(err, PatchError::NegativeField { field: "start", value: -1, .. }));

        let mut patch = RecordHeader { start: 0, end: 0, len: -5 }.to_bytes().to_vec();
        patch.extend_from_slice(b"abc");
        let err = patched_size(10, &patch).unwrap_err();
        assert!(matches!(err, PatchError::NegativeField { field: "length", .. }));
    }

    #[test]
    fn inverted_range_rejected() {
        let err = patched_size(10, &record(5, 3, b"")).unwrap_err();
        assert!(matches!(err, PatchError::InvertedRange { start: 5, end: 3, .. }));
    }

    #[test]
    fn out_of_bounds_rejected() {
        let err = patched_size(4, &record(2, 5, b"")).unwrap_err();
        assert!(matches!(err, PatchError::OutOfBounds { base_len: 4, .. }));
    }

    #[test]
    fn overlapping_records_rejected() {
        let mut patch = record(0, 4, b"");
        patch.extend(record(3, 5, b""));
        let err = patched_size(10, &patch).unwrap_err();
        assert!(matches!(
            err,
            PatchError::NonMonotonic {
                offset: 12,
                start: 3,
                previous_end: 4
            }
        ));
        assert!(err.is_format_error());
    }

    #[test]
    fn reader_stops_after_error() {
        let patch = [0u8; 5];
        let mut reader = PatchReader::new(&patch);
        assert!(reader.next().unwrap().is_err());
        assert!(reader.next().is_none());
    }

    #[test]
    fn size_accounts_for_every_record() {
        let mut patch = record(0, 2, b"abcd");
        patch.extend(record(5, 8, b""));
        patch.extend(record(10, 10, b"!"));
        assert_eq!(patched_size(10, &patch).unwrap(), 10 - 2 + 4 - 3 + 1);
    }
}
