use bdiff_sdk::{apply_patch, diff_hunks, diff_patch, split_lines, Hunk, PatchReader};
use proptest::prelude::*;

fn record(start: i32, end: i32, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&start.to_be_bytes());
    out.extend_from_slice(&end.to_be_bytes());
    out.extend_from_slice(&(data.len() as i32).to_be_bytes());
    out.extend_from_slice(data);
    out
}

#[test]
fn insert_into_empty() {
    assert_eq!(diff_hunks(b"", b"hello\n").unwrap(), vec![Hunk::new(0, 0, 0, 1)]);
    assert_eq!(diff_patch(b"", b"hello\n").unwrap(), record(0, 0, b"hello\n"));
}

#[test]
fn unchanged_buffer() {
    assert!(diff_hunks(b"a\nb\nc\n", b"a\nb\nc\n").unwrap().is_empty());
    assert!(diff_patch(b"a\nb\nc\n", b"a\nb\nc\n").unwrap().is_empty());
    assert_eq!(apply_patch(b"a\nb\nc\n", &[]).unwrap(), b"a\nb\nc\n");
}

#[test]
fn middle_line_replaced() {
    let (old, new) = (b"a\nb\nc\n", b"a\nx\nc\n");
    assert_eq!(diff_hunks(old, new).unwrap(), vec![Hunk::new(1, 2, 1, 2)]);
    let patch = diff_patch(old, new).unwrap();
    assert_eq!(apply_patch(old, &patch).unwrap(), new);
}

#[test]
fn trailing_line_deleted() {
    let (old, new) = (b"a\nb\n", b"a\n");
    assert_eq!(diff_hunks(old, new).unwrap(), vec![Hunk::new(1, 2, 1, 1)]);
    let patch = diff_patch(old, new).unwrap();
    let records: Vec<_> = PatchReader::new(&patch).map(Result::unwrap).collect();
    assert_eq!(records.len(), 1);
    assert!(records[0].data.is_empty());
}

#[test]
fn unterminated_last_line() {
    let (old, new) = (b"a\nb", b"a\nc");
    assert_eq!(diff_hunks(old, new).unwrap(), vec![Hunk::new(1, 2, 1, 2)]);
    let patch = diff_patch(old, new).unwrap();
    assert_eq!(apply_patch(old, &patch).unwrap(), new);
}

#[test]
fn malformed_patches_are_format_errors() {
    let truncated = &record(0, 0, b"abc")[..14];
    let err = bdiff_sdk::SdkError::from(apply_patch(b"x", truncated).unwrap_err());
    assert!(err.is_format_error());
    assert!(!err.is_resource_exhausted());
}

fn text() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        prop_oneof![
            Just(b"fn main() {\n".to_vec()),
            Just(b"}\n".to_vec()),
            Just(b"    let x = 1;\n".to_vec()),
            Just(b"\n".to_vec()),
            prop::collection::vec(any::<u8>(), 0..8),
        ],
        0..32,
    )
    .prop_map(|chunks| chunks.concat())
}

proptest! {
    #[test]
    fn apply_inverts_diff(old in text(), new in text()) {
        let patch = diff_patch(&old, &new).unwrap();
        prop_assert_eq!(apply_patch(&old, &patch).unwrap(), new);
    }

    #[test]
    fn unchanged_lines_stay_out_of_records(old in text(), new in text()) {
        let hunks = diff_hunks(&old, &new).unwrap();
        let patch = diff_patch(&old, &new).unwrap();
        let old_lines = split_lines(&old).unwrap();
        let records: Vec<_> = PatchReader::new(&patch).map(Result::unwrap).collect();
        prop_assert_eq!(records.len(), hunks.len());
        for (record, hunk) in records.iter().zip(&hunks) {
            prop_assert_eq!(Some(record.start), old_lines.offset_of(hunk.old_start));
            prop_assert_eq!(Some(record.end), old_lines.offset_of(hunk.old_end));
        }
    }

    #[test]
    fn split_lines_covers_buffer(buf in text()) {
        let lines = split_lines(&buf).unwrap();
        prop_assert_eq!(lines.iter().map(<[u8]>::len).sum::<usize>(), buf.len());
    }
}
