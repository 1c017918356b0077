//! Uncommitted input.
//!
//! A `PendingEdit` applies keystrokes to the buffer immediately while
//! keeping the net effect as one pre/post chunk pair, so a burst of
//! typing becomes a single history transformation when it is committed.
//!
//! `pre` is in the coordinates of the buffer before the edit began and
//! `post` in current coordinates. Both always start at the same address:
//! backspacing past the start of the edit moves both starts back together.

use dotedit_buffer::{Address, Buffer, Chunk, Selection};

#[derive(Debug, Clone)]
pub(crate) struct PendingEdit {
    pre: Chunk,
    post: Chunk,
}

impl PendingEdit {
    /// Starts an edit at `dot`, deleting any selected text.
    pub fn begin(buffer: &mut Buffer, dot: Selection) -> Self {
        let dot = buffer.clamp_selection(dot);
        let pre = Chunk::new(buffer.selection_text(dot), dot);
        let post = Chunk::new("", Selection::caret(dot.from));
        buffer.delete_selection(dot);
        Self { pre, post }
    }

    /// Where the next keystroke lands.
    pub fn caret(&self) -> Address {
        self.post.selection.to
    }

    pub fn insert(&mut self, buffer: &mut Buffer, c: char) {
        let mut utf8 = [0u8; 4];
        let end = buffer.insert_text(self.caret(), c.encode_utf8(&mut utf8));
        self.post.text.push(c);
        self.post.selection = Selection::new(self.post.selection.from, end);
    }

    /// Removes the rune before the caret. Returns false at the start of
    /// the buffer.
    pub fn backspace(&mut self, buffer: &mut Buffer) -> bool {
        let caret = self.caret();
        let prev = buffer.prev_address(caret);
        if prev == caret {
            return false;
        }

        if self.post.text.pop().is_some() {
            buffer.delete_selection(Selection::new(prev, caret));
            self.post.selection = Selection::new(self.post.selection.from, prev);
            return true;
        }

        // Nothing typed is left: eat into the text before the edit
        let span = Selection::new(prev, caret);
        let removed = buffer.selection_text(span);
        buffer.delete_selection(span);
        self.pre.text.insert_str(0, &removed);
        self.pre.selection = Selection::new(prev, self.pre.selection.to);
        self.post.selection = Selection::caret(prev);
        true
    }

    /// Removes the rune after the caret. Returns false at the end of the
    /// buffer.
    pub fn delete_forward(&mut self, buffer: &mut Buffer) -> bool {
        let caret = self.caret();
        let next = buffer.next_address(caret);
        if next == caret {
            return false;
        }

        let span = Selection::new(caret, next);
        let removed = buffer.selection_text(span);
        buffer.delete_selection(span);
        self.pre.selection = Selection::new(
            self.pre.selection.from,
            self.pre.selection.to.advance_over(&removed),
        );
        self.pre.text.push_str(&removed);
        true
    }

    pub fn is_noop(&self) -> bool {
        self.pre == self.post
    }

    pub fn into_chunks(self) -> (Chunk, Chunk) {
        (self.pre, self.post)
    }
}
