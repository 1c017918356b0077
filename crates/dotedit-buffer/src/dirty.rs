//! Dirty line tracking.
//!
//! The buffer records which rows changed since the renderer last asked.
//! It never draws; `DirtyLines` is the whole contract.

/// Rows that need to be redrawn, in buffer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirtyLines {
    /// Nothing changed
    #[default]
    None,
    /// Rows `[from, to)` changed
    Range { from: usize, to: usize },
    /// Every row from `row` to the end changed (line count shifted)
    FromRow(usize),
    /// Everything changed (reload)
    All,
}

impl DirtyLines {
    /// Returns true if nothing needs redrawing.
    pub fn is_none(&self) -> bool {
        matches!(self, DirtyLines::None)
    }

    /// Returns true if something needs redrawing.
    pub fn is_dirty(&self) -> bool {
        !self.is_none()
    }

    /// A single dirty row.
    pub fn single(row: usize) -> Self {
        DirtyLines::Range {
            from: row,
            to: row + 1,
        }
    }

    /// Rows `[from, to)`, or `None` if the range is empty.
    pub fn range(from: usize, to: usize) -> Self {
        if from >= to {
            DirtyLines::None
        } else {
            DirtyLines::Range { from, to }
        }
    }

    /// Grows this region to also cover `other`.
    ///
    /// `None` is the identity and `All` absorbs everything.
    pub fn merge(&mut self, other: DirtyLines) {
        use DirtyLines::*;

        *self = match (*self, other) {
            (None, o) => o,
            (s, None) => s,
            (All, _) | (_, All) => All,
            (FromRow(a), FromRow(b)) => FromRow(a.min(b)),
            (FromRow(a), Range { from, .. }) | (Range { from, .. }, FromRow(a)) => {
                FromRow(a.min(from))
            }
            (Range { from: a, to: b }, Range { from: c, to: d }) => Range {
                from: a.min(c),
                to: b.max(d),
            },
        };
    }

    /// Returns true if `row` is covered.
    pub fn contains(&self, row: usize) -> bool {
        match *self {
            DirtyLines::None => false,
            DirtyLines::Range { from, to } => row >= from && row < to,
            DirtyLines::FromRow(from) => row >= from,
            DirtyLines::All => true,
        }
    }
}
