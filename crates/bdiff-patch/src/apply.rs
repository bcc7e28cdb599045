use std::borrow::Cow;

use tracing::debug;

use crate::error::{PatchError, PatchResult};
use crate::reader::{patched_size, BaseCursor, PatchReader};

/// Apply `patch` to `base` and return the patched buffer.
///
/// The patch is validated in full before any output is produced, so a
/// malformed patch never yields a partial result.
pub fn apply(base: &[u8], patch: &[u8]) -> PatchResult<Vec<u8>> {
    let size = patched_size(base.len(), patch)?;

    let mut out = Vec::new();
    out.try_reserve_exact(size)
        .map_err(PatchError::exhausted("allocating patched buffer"))?;

    let mut cursor = BaseCursor::new(base.len());
    let mut copied_to = 0;
    for record in PatchReader::new(patch) {
        let record = record?;
        cursor.check(&record)?;
        out.extend_from_slice(&base[copied_to..record.start]);
        out.extend_from_slice(record.data);
        copied_to = record.end;
    }
    out.extend_from_slice(&base[copied_to..]);

    debug!(base_len = base.len(), patch_len = patch.len(), out_len = out.len(), "applied patch");
    Ok(out)
}

/// Apply a chain of patches in order, each to the result of the previous.
///
/// An empty chain returns `base` unchanged.
pub fn apply_chain<I>(base: &[u8], patches: I) -> PatchResult<Vec<u8>>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let mut current = Cow::Borrowed(base);
    let mut applied = 0usize;
    for (index, patch) in patches.into_iter().enumerate() {
        let next = apply(&current, patch.as_ref()).map_err(|e| PatchError::Chain {
            index,
            source: Box::new(e),
        })?;
        current = Cow::Owned(next);
        applied += 1;
    }
    debug!(patches = applied, out_len = current.len(), "applied patch chain");
    Ok(current.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordHeader;
    use crate::writer::diff_patch;
    use proptest::prelude::*;

    fn record(start: i32, end: i32, data: &[u8]) -> Vec<u8> {
        let mut out = RecordHeader {
            start,
            end,
            len: data.len() as i32,
        }
        .to_bytes()
        .to_vec();
        out.extend_from_slice(data);
        out
    }

    #[test]
    fn empty_patch_is_identity() {
        assert_eq!(apply(b"abc\n", &[]).unwrap(), b"abc\n");
        assert_eq!(apply(b"", &[]).unwrap(), b"");
    }

    #[test]
    fn splices_records() {
        let mut patch = record(0, 1, b"XY");
        patch.extend(record(3, 5, b""));
        patch.extend(record(6, 6, b"!"));
        assert_eq!(apply(b"abcdefg", &patch).unwrap(), b"XYbcf!g");
    }

    #[test]
    fn scenarios_round_trip() {
        let cases: [(&[u8], &[u8]); 5] = [
            (b"", b"hello\n"),
            (b"a\nb\nc\n", b"a\nb\nc\n"),
            (b"a\nb\nc\n", b"a\nx\nc\n"),
            (b"a\nb\n", b"a\n"),
            (b"a\nb", b"a\nc"),
        ];
        for (old, new) in cases {
            let patch = diff_patch(old, new).unwrap();
            assert_eq!(apply(old, &patch).unwrap(), new);
        }
    }

    #[test]
    fn malformed_patch_yields_no_output() {
        let mut patch = record(0, 1, b"X");
        patch.extend(record(9, 12, b""));
        let err = apply(b"abc", &patch).unwrap_err();
        assert!(matches!(err, PatchError::OutOfBounds { offset: 13, .. }));
    }

    #[test]
    fn chain_rebuilds_latest_revision() {
        let r0 = b"one\ntwo\nthree\n".to_vec();
        let r1 = b"one\n2\nthree\nfour\n".to_vec();
        let r2 = b"zero\none\n2\nfour\n".to_vec();
        let p1 = diff_patch(&r0, &r1).unwrap();
        let p2 = diff_patch(&r1, &r2).unwrap();
        assert_eq!(apply_chain(&r0, [&p1, &p2]).unwrap(), r2);
        assert_eq!(apply_chain(&r0, Vec::<Vec<u8>>::new()).unwrap(), r0);
    }

    #[test]
    fn chain_reports_failing_link() {
        let p1 = diff_patch(b"a\n", b"b\n").unwrap();
        let bad = record(0, 100, b"");
        let err = apply_chain(b"a\n", [p1, bad]).unwrap_err();
        assert!(matches!(err, PatchError::Chain { index: 1, .. }));
        assert!(err.is_format_error());
    }

    fn text() -> impl Strategy<Value = Vec<u8>> {
        prop::collection::vec(
            prop_oneof![
                Just(b"alpha\n".to_vec()),
                Just(b"beta\n".to_vec()),
                Just(b"\n".to_vec()),
                Just(b"gamma".to_vec()),
                prop::collection::vec(any::<u8>(), 0..6),
            ],
            0..20,
        )
        .prop_map(|chunks| chunks.concat())
    }

    proptest! {
        #[test]
        fn round_trip(old in text(), new in text()) {
            let patch = diff_patch(&old, &new).unwrap();
            prop_assert_eq!(patched_size(old.len(), &patch).unwrap(), new.len());
            prop_assert_eq!(apply(&old, &patch).unwrap(), new);
        }

        #[test]
        fn identity_patch_is_empty(buf in text()) {
            prop_assert!(diff_patch(&buf, &buf).unwrap().is_empty());
        }

        #[test]
        fn records_are_ordered_and_disjoint(old in text(), new in text()) {
            let patch = diff_patch(&old, &new).unwrap();
            let mut previous_end = 0;
            for record in PatchReader::new(&patch) {
                let record = record.unwrap();
                prop_assert!(record.start >= previous_end);
                prop_assert!(record.start < record.end || !record.data.is_empty());
                previous_end = record.end;
            }
        }
    }
}
