use dotedit_buffer::{Address, Buffer, Selection, find_substring};
use proptest::prelude::*;

fn text() -> impl Strategy<Value = String> {
    "[abcü語\\n]{0,24}"
}

proptest! {
    #[test]
    fn contents_round_trip(s in text()) {
        prop_assert_eq!(Buffer::from(s.as_str()).contents(), s);
    }

    #[test]
    fn next_then_prev_returns(s in text(), row in 0..8usize, col in 0..8usize) {
        let buffer = Buffer::from(s.as_str());
        let addr = buffer.clamp(Address::new(row, col));
        if addr != buffer.last_address() {
            prop_assert_eq!(buffer.prev_address(buffer.next_address(addr)), addr);
        }
    }

    #[test]
    fn found_text_matches_pattern(s in text(), row in 0..8usize, col in 0..8usize, pattern in "[abc\\n]{1,3}") {
        let buffer = Buffer::from(s.as_str());
        let from = Address::new(row, col);
        let start = buffer.byte_offset(from);
        match find_substring(&buffer, from, &pattern) {
            Some(found) => {
                prop_assert!(found.from >= buffer.clamp(from) || buffer.byte_offset(found.to) <= start);
                prop_assert_eq!(buffer.selection_text(found), pattern);
            }
            None => {
                prop_assert!(!s[start..].contains(pattern.as_str()));
                prop_assert!(!s[..start].contains(pattern.as_str()));
            }
        }
    }

    #[test]
    fn replace_reports_inserted_span(s in text(), row in 0..8usize, col in 0..8usize, insert in text()) {
        let mut buffer = Buffer::from(s.as_str());
        let at = Selection::caret(Address::new(row, col));
        let span = buffer.replace(at, &insert);
        prop_assert_eq!(buffer.selection_text(span), insert);
    }
}
