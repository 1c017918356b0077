//! Text selection ("dot").
//!
//! Selections are half-open ranges of addresses. `from == to` is a caret;
//! it selects nothing but still marks where typing goes.

use crate::Address;
use serde::{Deserialize, Serialize};

/// A span of text in the buffer.
///
/// `from` is never after `to`; constructors normalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Selection {
    /// Start address (inclusive)
    pub from: Address,
    /// End address (exclusive)
    pub to: Address,
}

impl Selection {
    /// Creates a new selection, swapping the ends if needed.
    pub fn new(a: Address, b: Address) -> Self {
        if a <= b {
            Self { from: a, to: b }
        } else {
            Self { from: b, to: a }
        }
    }

    /// Creates an empty selection at `addr`.
    pub fn caret(addr: Address) -> Self {
        Self {
            from: addr,
            to: addr,
        }
    }

    /// Returns true if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    /// Returns true if the selection spans more than one row.
    pub fn is_multiline(&self) -> bool {
        self.from.row != self.to.row
    }

    /// Returns true if `addr` lies within the selection.
    pub fn contains(&self, addr: Address) -> bool {
        addr >= self.from && addr < self.to
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "{}", self.from)
        } else {
            write!(f, "{},{}", self.from, self.to)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_normalization() {
        let sel = Selection::new(Address::new(2, 5), Address::new(1, 3));
        assert_eq!(sel.from, Address::new(1, 3));
        assert_eq!(sel.to, Address::new(2, 5));
        assert!(sel.is_multiline());
    }

    #[test]
    fn test_caret_is_empty() {
        let sel = Selection::caret(Address::new(4, 2));
        assert!(sel.is_empty());
        assert!(!sel.contains(Address::new(4, 2)));
    }

    #[test]
    fn test_contains_is_half_open() {
        let sel = Selection::new(Address::new(1, 0), Address::new(1, 10));
        assert!(sel.contains(Address::new(1, 5)));
        assert!(!sel.contains(Address::new(1, 10)));
    }

    #[test]
    fn test_display() {
        let sel = Selection::new(Address::new(0, 0), Address::new(1, 2));
        assert_eq!(sel.to_string(), "1:1,2:3");
    }
}
