//! The line store.
//!
//! A `Buffer` is an ordered sequence of `Line`s, never empty: an empty
//! buffer is one zero-length line. Line breaks are implied between lines
//! and are never stored, so `contents()` has no trailing break unless the
//! last line is empty.
//!
//! Every operation takes `Address`/`Selection` values and clamps them
//! before touching the lines. Upstream cursor math may briefly compute
//! stale coordinates during multi-step edits; those land on the nearest
//! valid address instead of failing.

use std::path::Path;

use crate::dirty::DirtyLines;
use crate::line::Line;
use crate::metrics::FontMetrics;
use crate::{Address, BufferResult, Selection};

/// A mutable sequence of lines.
#[derive(Debug, Clone)]
pub struct Buffer {
    /// Never empty
    lines: Vec<Line>,

    /// Rows changed since the renderer last took the dirty region
    dirty: DirtyLines,
}

impl Buffer {
    /// Creates a buffer holding a single empty line.
    pub fn new() -> Self {
        Self {
            lines: vec![Line::default()],
            dirty: DirtyLines::All,
        }
    }

    /// Reads a buffer from a file.
    pub fn from_file(path: impl AsRef<Path>) -> BufferResult<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        let mut buffer = Self::new();
        buffer.load(&bytes);
        Ok(buffer)
    }

    /// Replaces the whole content.
    ///
    /// Invalid UTF-8 is replaced with U+FFFD rather than rejected.
    pub fn load(&mut self, bytes: &[u8]) {
        let text = String::from_utf8_lossy(bytes);
        self.lines = text.split('\n').map(Line::new).collect();
        self.dirty = DirtyLines::All;
    }

    // ==================== Text Access ====================

    /// Full content with lines joined by `\n`.
    pub fn contents(&self) -> String {
        let mut out = String::with_capacity(self.len_bytes());
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(line.text());
        }
        out
    }

    /// The text spanned by `sel`, with `\n` between lines.
    pub fn selection_text(&self, sel: Selection) -> String {
        let from = self.clamp(sel.from);
        let to = self.clamp(sel.to);
        let (from, to) = if from <= to { (from, to) } else { (to, from) };

        if from.row == to.row {
            return self.lines[from.row].slice(from.col, to.col).to_string();
        }

        let mut out = String::new();
        out.push_str(self.lines[from.row].tail(from.col));
        for line in &self.lines[from.row + 1..to.row] {
            out.push('\n');
            out.push_str(line.text());
        }
        out.push('\n');
        out.push_str(self.lines[to.row].head(to.col));
        out
    }

    /// Returns a line, if `row` exists.
    pub fn line(&self, row: usize) -> Option<&Line> {
        self.lines.get(row)
    }

    /// Text of `row`, or `""` past the end.
    pub fn line_text(&self, row: usize) -> &str {
        self.lines.get(row).map(Line::text).unwrap_or("")
    }

    /// The rune at `addr`. At the end of a non-final line this is the
    /// implied `\n`; at the end of the buffer there is none.
    pub fn rune_at(&self, addr: Address) -> Option<char> {
        let line = self.lines.get(addr.row)?;
        match line.rune_at(addr.col) {
            Some(c) => Some(c),
            None if addr.row + 1 < self.lines.len() => Some('\n'),
            None => None,
        }
    }

    /// The rune immediately left of `addr`, counting the implied `\n`
    /// at column 0 of every row but the first.
    pub fn rune_before(&self, addr: Address) -> Option<char> {
        let addr = self.clamp(addr);
        if addr.col > 0 {
            self.lines[addr.row].rune_at(addr.col - 1)
        } else if addr.row > 0 {
            Some('\n')
        } else {
            None
        }
    }

    // ==================== Measurements ====================

    /// Number of lines (at least one).
    #[inline]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Number of runes on `row`, or 0 past the end.
    pub fn rune_count(&self, row: usize) -> usize {
        self.lines.get(row).map(Line::rune_count).unwrap_or(0)
    }

    /// Byte length of `contents()`.
    pub fn len_bytes(&self) -> usize {
        self.lines.iter().map(|l| l.text().len()).sum::<usize>() + self.lines.len() - 1
    }

    /// Returns true if the buffer holds no text.
    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    /// Byte offset of `addr` within `contents()`.
    pub fn byte_offset(&self, addr: Address) -> usize {
        let addr = self.clamp(addr);
        let before: usize = self.lines[..addr.row]
            .iter()
            .map(|l| l.text().len() + 1)
            .sum();
        before + self.lines[addr.row].byte_offset(addr.col)
    }

    // ==================== Addresses ====================

    /// Pulls `addr` onto the nearest valid address.
    pub fn clamp(&self, addr: Address) -> Address {
        let row = addr.row.min(self.lines.len() - 1);
        let col = addr.col.min(self.lines[row].rune_count());
        Address::new(row, col)
    }

    /// Clamps both ends of a selection and restores `from <= to`.
    pub fn clamp_selection(&self, sel: Selection) -> Selection {
        Selection::new(self.clamp(sel.from), self.clamp(sel.to))
    }

    /// The end of the final line.
    pub fn last_address(&self) -> Address {
        let row = self.lines.len() - 1;
        Address::new(row, self.lines[row].rune_count())
    }

    /// Selection spanning the whole buffer.
    pub fn full_selection(&self) -> Selection {
        Selection::new(Address::ZERO, self.last_address())
    }

    /// One rune forward, wrapping onto the next line.
    /// Stays put at the end of the buffer.
    pub fn next_address(&self, addr: Address) -> Address {
        let addr = self.clamp(addr);
        if addr.col < self.lines[addr.row].rune_count() {
            Address::new(addr.row, addr.col + 1)
        } else if addr.row + 1 < self.lines.len() {
            Address::new(addr.row + 1, 0)
        } else {
            addr
        }
    }

    /// One rune backward, wrapping onto the end of the previous line.
    /// Stays put at the start of the buffer.
    pub fn prev_address(&self, addr: Address) -> Address {
        let addr = self.clamp(addr);
        if addr.col > 0 {
            Address::new(addr.row, addr.col - 1)
        } else if addr.row > 0 {
            Address::new(addr.row - 1, self.lines[addr.row - 1].rune_count())
        } else {
            addr
        }
    }

    // ==================== Mutations ====================

    /// Inserts `s` at `addr` and returns the address just past it.
    ///
    /// Text without line breaks is spliced into the line. Otherwise the
    /// line is split: the head keeps the first part, intermediate parts
    /// become new lines, and the last part is joined with the old tail.
    pub fn insert_text(&mut self, addr: Address, s: &str) -> Address {
        let addr = self.clamp(addr);
        if s.is_empty() {
            return addr;
        }

        let mut parts = s.split('\n');
        let first = parts.next().unwrap_or_default();
        let rest: Vec<&str> = parts.collect();

        let Some((last, middle)) = rest.split_last() else {
            self.lines[addr.row].insert_str(addr.col, first);
            self.dirty.merge(DirtyLines::single(addr.row));
            return Address::new(addr.row, addr.col + first.chars().count());
        };

        let tail = self.lines[addr.row].split_off(addr.col);
        self.lines[addr.row].push_str(first);

        let mut last_line = Line::new(*last);
        let end = Address::new(addr.row + rest.len(), last_line.rune_count());
        last_line.push_str(&tail);

        let new_lines = middle
            .iter()
            .map(|part| Line::new(*part))
            .chain(std::iter::once(last_line));
        self.lines.splice(addr.row + 1..addr.row + 1, new_lines);

        self.dirty.merge(DirtyLines::FromRow(addr.row));
        end
    }

    /// Removes the text spanned by `sel` and returns where it started.
    pub fn delete_selection(&mut self, sel: Selection) -> Address {
        let sel = self.clamp_selection(sel);
        let (from, to) = (sel.from, sel.to);
        if from == to {
            return from;
        }

        if from.row == to.row {
            self.lines[from.row].remove(from.col, to.col);
            self.dirty.merge(DirtyLines::single(from.row));
            return from;
        }

        let tail = self.lines[to.row].tail(to.col).to_string();
        let head = &mut self.lines[from.row];
        head.truncate(from.col);
        head.push_str(&tail);
        self.lines.drain(from.row + 1..=to.row);

        self.dirty.merge(DirtyLines::FromRow(from.row));
        from
    }

    /// Replaces the text in `sel` with `s`; returns the span of the new text.
    pub fn replace(&mut self, sel: Selection, s: &str) -> Selection {
        let from = self.delete_selection(sel);
        let to = self.insert_text(from, s);
        Selection::new(from, to)
    }

    // ==================== Rendering Support ====================

    /// Rows changed since the last `take_dirty`.
    pub fn dirty(&self) -> DirtyLines {
        self.dirty
    }

    /// Returns the dirty rows and resets tracking.
    pub fn take_dirty(&mut self) -> DirtyLines {
        std::mem::take(&mut self.dirty)
    }

    /// Flags rows for redraw without changing text (e.g. the dot moved).
    pub fn mark_dirty(&mut self, region: DirtyLines) {
        self.dirty.merge(region);
    }

    /// Fills the advance cache of `row` if it is stale and returns it.
    pub fn layout_line(&mut self, row: usize, metrics: &dyn FontMetrics) -> Option<&[f32]> {
        let line = self.lines.get_mut(row)?;
        if line.advances().is_none() {
            let advances = line.text().chars().map(|c| metrics.advance_of(c)).collect();
            line.set_advances(advances);
        }
        line.advances()
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for Buffer {
    fn from(s: &str) -> Self {
        let mut buffer = Self::new();
        buffer.load(s.as_bytes());
        buffer
    }
}

impl From<String> for Buffer {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}
