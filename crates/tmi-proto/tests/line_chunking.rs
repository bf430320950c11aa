//! Property tests for line framing.
//!
//! However a byte stream is cut into chunks, the lines coming out of a
//! `LineBuffer` must be exactly the lines of the unsplit stream, in order.

use proptest::prelude::*;
use tmi_proto::{LineBuffer, MemoryTransport};

/// Lines without terminators; may be empty.
fn line_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[^\r\n]{0,40}").expect("valid regex")
}

/// Cut `bytes` at the given (unsorted, possibly duplicated) positions.
fn split_at_points(bytes: &[u8], points: &[usize]) -> Vec<Vec<u8>> {
    let mut cuts: Vec<usize> = points
        .iter()
        .map(|p| p % (bytes.len() + 1))
        .collect();
    cuts.push(0);
    cuts.push(bytes.len());
    cuts.sort_unstable();
    cuts.dedup();

    cuts.windows(2)
        .map(|w| bytes[w[0]..w[1]].to_vec())
        .collect()
}

fn read_all(chunks: Vec<Vec<u8>>) -> Vec<String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");

    runtime.block_on(async move {
        let mut buffer = LineBuffer::new(MemoryTransport::new(chunks));
        let mut lines = Vec::new();
        loop {
            match buffer.read_line().await {
                Ok(line) => lines.push(line),
                Err(e) => {
                    assert!(e.is_fatal(), "unexpected per-line error: {}", e);
                    break;
                }
            }
        }
        lines
    })
}

proptest! {
    #[test]
    fn chunking_is_invisible(
        lines in prop::collection::vec(line_strategy(), 0..12),
        points in prop::collection::vec(any::<usize>(), 0..20),
        crlf in any::<bool>(),
    ) {
        let terminator = if crlf { "\r\n" } else { "\n" };
        let stream: String = lines.iter().map(|l| format!("{l}{terminator}")).collect();

        let whole = read_all(vec![stream.clone().into_bytes()]);
        let chunked = read_all(split_at_points(stream.as_bytes(), &points));

        prop_assert_eq!(&whole, &lines);
        prop_assert_eq!(&chunked, &lines);
    }
}

#[test]
fn test_multibyte_char_split_across_chunks() {
    let stream = "PRIVMSG #b :héllo\r\n".as_bytes();
    let cut = stream.iter().position(|b| *b == 0xc3).expect("two-byte char") + 1;

    let lines = read_all(vec![stream[..cut].to_vec(), stream[cut..].to_vec()]);
    assert_eq!(lines, vec!["PRIVMSG #b :héllo"]);
}

#[test]
fn test_chunk_ending_on_terminator_leaves_nothing_pending() {
    let lines = read_all(vec![b"a\r\n".to_vec(), b"b\r\n".to_vec()]);
    assert_eq!(lines, vec!["a", "b"]);
}
