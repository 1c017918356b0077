//! A single line of text.
//!
//! Lines store UTF-8 and are indexed by rune. `byte_offset` is the one
//! place rune columns turn into byte positions; nothing outside this
//! module slices a line's bytes directly.

/// One line of the buffer, without its line break.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    text: String,
    /// Horizontal pixel advances, one per rune. Owned by the renderer;
    /// cleared on every mutation.
    advances: Option<Vec<f32>>,
}

impl Line {
    /// Creates a line from text that must not contain `\n`.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        debug_assert!(!text.contains('\n'));
        Self {
            text,
            advances: None,
        }
    }

    /// The line's text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of runes in the line.
    pub fn rune_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Returns true if the line holds no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Byte offset of rune column `col`, clamped to the end of the line.
    pub fn byte_offset(&self, col: usize) -> usize {
        self.text
            .char_indices()
            .nth(col)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    /// The rune at `col`, if any.
    pub fn rune_at(&self, col: usize) -> Option<char> {
        self.text.chars().nth(col)
    }

    /// Text from `col` to the end of the line.
    pub fn tail(&self, col: usize) -> &str {
        &self.text[self.byte_offset(col)..]
    }

    /// Text from the start of the line up to `col`.
    pub fn head(&self, col: usize) -> &str {
        &self.text[..self.byte_offset(col)]
    }

    /// Text between two columns.
    pub fn slice(&self, from: usize, to: usize) -> &str {
        let start = self.byte_offset(from);
        let end = self.byte_offset(to).max(start);
        &self.text[start..end]
    }

    /// Inserts `s` (no line breaks) at `col`.
    pub fn insert_str(&mut self, col: usize, s: &str) {
        let at = self.byte_offset(col);
        self.text.insert_str(at, s);
        self.advances = None;
    }

    /// Removes the runes in `from..to`.
    pub fn remove(&mut self, from: usize, to: usize) {
        let start = self.byte_offset(from);
        let end = self.byte_offset(to).max(start);
        self.text.replace_range(start..end, "");
        self.advances = None;
    }

    /// Splits the line at `col`, keeping the head and returning the tail.
    pub fn split_off(&mut self, col: usize) -> String {
        let at = self.byte_offset(col);
        self.advances = None;
        self.text.split_off(at)
    }

    /// Drops everything from `col` to the end of the line.
    pub fn truncate(&mut self, col: usize) {
        let at = self.byte_offset(col);
        self.text.truncate(at);
        self.advances = None;
    }

    /// Appends text (no line breaks) to the end of the line.
    pub fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
        self.advances = None;
    }

    /// Cached advances, or `None` if the line changed since the last layout.
    pub fn advances(&self) -> Option<&[f32]> {
        self.advances.as_deref()
    }

    pub(crate) fn set_advances(&mut self, advances: Vec<f32>) {
        self.advances = Some(advances);
    }
}

impl From<&str> for Line {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
