//! Double-click selection.
//!
//! `auto_select` expands a click point into a selection. The rules are
//! tried in order and the first one that applies wins:
//!
//! 1. brackets: just inside an opening bracket, or just before a closing
//!    one, select up to the matching bracket (nesting honored)
//! 2. line: at column 0 or end of line, select the whole line
//! 3. quotes: just inside a quote, select up to the next same quote
//! 4. word: select the run of alphanumerics and `_` around the click
//!
//! When nothing applies the result is a caret at the click point.

use crate::{Address, Buffer, Selection};

const OPENERS: [char; 4] = ['{', '[', '(', '<'];
const CLOSERS: [char; 4] = ['}', ']', ')', '>'];
const QUOTES: [char; 3] = ['"', '\'', '`'];

/// Which way a delimiter scan walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Expands `addr` into a selection using the double-click rules.
pub fn auto_select(buffer: &Buffer, addr: Address) -> Selection {
    let addr = buffer.clamp(addr);

    if let Some(sel) = select_bracketed(buffer, addr) {
        return sel;
    }
    if let Some(sel) = select_line(buffer, addr) {
        return sel;
    }
    if let Some(sel) = select_quoted(buffer, addr) {
        return sel;
    }
    select_word(buffer, addr)
}

fn select_bracketed(buffer: &Buffer, addr: Address) -> Option<Selection> {
    let opener = buffer
        .rune_before(addr)
        .and_then(|c| OPENERS.iter().position(|&o| o == c));
    if let Some(i) = opener {
        let close = scan_for_match(buffer, addr, OPENERS[i], CLOSERS[i], Direction::Forward);
        if let Some(close) = close {
            return Some(Selection::new(addr, close));
        }
    }

    let closer = buffer
        .rune_at(addr)
        .and_then(|c| CLOSERS.iter().position(|&o| o == c));
    if let Some(i) = closer {
        let open = scan_for_match(buffer, addr, OPENERS[i], CLOSERS[i], Direction::Backward);
        if let Some(open) = open {
            return Some(Selection::new(open, addr));
        }
    }

    None
}

fn select_line(buffer: &Buffer, addr: Address) -> Option<Selection> {
    let len = buffer.rune_count(addr.row);
    if addr.col != 0 && addr.col != len {
        return None;
    }

    let from = Address::new(addr.row, 0);
    let to = if addr.row + 1 < buffer.line_count() {
        Address::new(addr.row + 1, 0)
    } else {
        Address::new(addr.row, len)
    };
    Some(Selection::new(from, to))
}

fn select_quoted(buffer: &Buffer, addr: Address) -> Option<Selection> {
    if let Some(q) = buffer.rune_before(addr).filter(|c| QUOTES.contains(c)) {
        if let Some(close) = scan_for_match(buffer, addr, q, q, Direction::Forward) {
            return Some(Selection::new(addr, close));
        }
    }

    if let Some(q) = buffer.rune_at(addr).filter(|c| QUOTES.contains(c)) {
        if let Some(open) = scan_for_match(buffer, addr, q, q, Direction::Backward) {
            return Some(Selection::new(open, addr));
        }
    }

    None
}

fn select_word(buffer: &Buffer, addr: Address) -> Selection {
    let mut from = addr;
    while from.col > 0 && buffer.rune_before(from).is_some_and(is_word_rune) {
        from.col -= 1;
    }

    // Only extend rightward when the click itself sits on a word rune;
    // otherwise keep the word that ends at the click.
    let mut to = addr;
    if buffer.rune_at(addr).is_some_and(is_word_rune) {
        let len = buffer.rune_count(addr.row);
        while to.col < len && buffer.rune_at(to).is_some_and(is_word_rune) {
            to.col += 1;
        }
    }

    Selection::new(from, to)
}

fn is_word_rune(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Scans from `start` for the delimiter that balances the one just
/// outside `start`.
///
/// Forward scans look at runes from `start` onward for `close` and
/// return the address of that closing rune. Backward scans look at runes
/// before `start` for `open` and return the address just after it.
/// Either way the result is the inner boundary of the delimited text.
///
/// When `open == close` (quotes) there is no nesting: the first
/// occurrence matches. Otherwise each `open` seen going forward (or
/// `close` going backward) deepens the nesting and only a delimiter at
/// depth zero matches.
pub fn scan_for_match(
    buffer: &Buffer,
    start: Address,
    open: char,
    close: char,
    direction: Direction,
) -> Option<Address> {
    let mut scan = Scan::new(open, close, direction);

    match direction {
        Direction::Forward => {
            let last_row = buffer.line_count() - 1;
            for row in start.row..=last_row {
                let first_col = if row == start.row { start.col } else { 0 };
                let runes = buffer.line_text(row).chars().skip(first_col);
                for (col, c) in (first_col..).zip(runes) {
                    if scan.step(c) {
                        return Some(Address::new(row, col));
                    }
                }
                if row < last_row && scan.step('\n') {
                    return Some(Address::new(row, buffer.rune_count(row)));
                }
            }
            None
        }
        Direction::Backward => {
            for row in (0..=start.row).rev() {
                let runes: Vec<char> = buffer.line_text(row).chars().collect();
                let end_col = if row == start.row {
                    start.col.min(runes.len())
                } else {
                    runes.len()
                };
                if row < start.row && scan.step('\n') {
                    return Some(Address::new(row + 1, 0));
                }
                for col in (0..end_col).rev() {
                    if scan.step(runes[col]) {
                        return Some(Address::new(row, col + 1));
                    }
                }
            }
            None
        }
    }
}

/// Nesting state for one delimiter scan.
struct Scan {
    target: char,
    nested: char,
    depth: usize,
}

impl Scan {
    fn new(open: char, close: char, direction: Direction) -> Self {
        let (target, nested) = match direction {
            Direction::Forward => (close, open),
            Direction::Backward => (open, close),
        };
        Self { target, nested, depth: 0 }
    }

    /// Feeds the next rune; returns true when it is the balancing delimiter.
    fn step(&mut self, c: char) -> bool {
        if c == self.target {
            if self.depth == 0 || self.target == self.nested {
                return true;
            }
            self.depth -= 1;
        } else if c == self.nested {
            self.depth += 1;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected(text: &str, row: usize, col: usize) -> String {
        let buffer = Buffer::from(text);
        let sel = auto_select(&buffer, Address::new(row, col));
        buffer.selection_text(sel)
    }

    #[test]
    fn test_nested_brackets_select_outer() {
        assert_eq!(selected("a(b(c)d)e", 0, 2), "b(c)d");
    }

    #[test]
    fn test_inner_bracket() {
        assert_eq!(selected("a(b(c)d)e", 0, 4), "c");
    }

    #[test]
    fn test_closing_bracket_scans_backward() {
        assert_eq!(selected("a(b(c)d)e", 0, 7), "b(c)d");
        assert_eq!(selected("x[1, [2]]", 0, 8), "1, [2]");
    }

    #[test]
    fn test_brackets_across_lines() {
        assert_eq!(selected("fn f() {\n    body\n}", 0, 8), "\n    body\n");
    }

    #[test]
    fn test_unmatched_bracket_falls_through() {
        // No closing paren: falls through to the word rule
        assert_eq!(selected("(abc def", 0, 1), "abc");
    }

    #[test]
    fn test_whole_line_at_column_zero() {
        assert_eq!(selected("first\nsecond\nthird", 1, 0), "second\n");
    }

    #[test]
    fn test_whole_line_at_end_of_final_line() {
        assert_eq!(selected("first\nlast", 1, 4), "last");
    }

    #[test]
    fn test_quoted() {
        assert_eq!(selected(r#"say "hello there" now"#, 0, 5), "hello there");
        assert_eq!(selected(r#"say "hello there" now"#, 0, 16), "hello there");
        assert_eq!(selected("a 'x' b", 0, 3), "x");
    }

    #[test]
    fn test_word() {
        assert_eq!(selected("let foo_bar = 1;", 0, 6), "foo_bar");
        assert_eq!(selected("naïve café", 0, 2), "naïve");
    }

    #[test]
    fn test_word_ending_at_click() {
        // Click sits on a space: keep the word to the left only
        assert_eq!(selected("alpha beta", 0, 5), "alpha");
    }

    #[test]
    fn test_nothing_applies_gives_caret() {
        let buffer = Buffer::from("a + b");
        let at = Address::new(0, 2);
        assert_eq!(auto_select(&buffer, at), Selection::caret(at));
    }

    #[test]
    fn test_scan_for_match_depth() {
        let buffer = Buffer::from("{ { } }");
        let close = scan_for_match(&buffer, Address::new(0, 1), '{', '}', Direction::Forward);
        assert_eq!(close, Some(Address::new(0, 6)));

        let open = scan_for_match(&buffer, Address::new(0, 6), '{', '}', Direction::Backward);
        assert_eq!(open, Some(Address::new(0, 1)));
    }

    #[test]
    fn test_scan_step_counts_depth() {
        let mut scan = Scan::new('(', ')', Direction::Forward);
        assert!(!scan.step('('));
        assert!(!scan.step('x'));
        assert!(!scan.step(')'));
        assert!(scan.step(')'));

        let mut quotes = Scan::new('"', '"', Direction::Backward);
        assert!(quotes.step('"'));
    }
}
