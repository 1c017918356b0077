//! Buffer coordinates.
//!
//! An `Address` is a `(row, col)` pair where `col` counts runes (`char`s),
//! never bytes. `"héllo"` has five columns even though it is six bytes long.

use serde::{Deserialize, Serialize};

/// A location in the buffer, zero-based.
///
/// Ordering is lexicographic: row first, then column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Address {
    /// Line index
    pub row: usize,
    /// Rune offset within the line
    pub col: usize,
}

impl Address {
    /// The start of the buffer.
    pub const ZERO: Address = Address { row: 0, col: 0 };

    /// Creates a new address.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns the address reached by walking over `text` starting here.
    ///
    /// Each `\n` moves to column 0 of the next row; every other rune
    /// advances the column by one.
    pub fn advance_over(self, text: &str) -> Address {
        match text.rfind('\n') {
            None => Address::new(self.row, self.col + text.chars().count()),
            Some(last) => {
                let breaks = text.bytes().filter(|&b| b == b'\n').count();
                Address::new(self.row + breaks, text[last + 1..].chars().count())
            }
        }
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // 1-indexed for humans
        write!(f, "{}:{}", self.row + 1, self.col + 1)
    }
}
