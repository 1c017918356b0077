//! Transformational undo/redo history.
//!
//! History is a linear list of nodes with a movable `current` cursor.
//! Each node records one logical edit as a pair of chunks: the text that
//! occupied a span before the edit (`pre`) and the text that occupies it
//! after (`post`). The last node is always an empty frontier that new
//! edits are committed into.
//!
//! ```text
//!   [T0] <-> [T1] <-> [T2] <-> [frontier]
//!                      ^ current after one undo
//! ```
//!
//! Nodes live in a `VecDeque` arena, so `prev`/`next` are index moves.
//! Committing from a rewound position overwrites the node at `current`
//! and drops everything after it, which discards the old redo branch.
//! When the list grows past its limit the oldest node is popped from the
//! front.
//!
//! Node identity (`NodeId`) is a counter that never repeats. It names a
//! position in history, which is what a save point remembers.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::Selection;

/// Identity of a history node. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(u64);

/// One side of a transformation: some text and the span it occupies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub selection: Selection,
}

impl Chunk {
    pub fn new(text: impl Into<String>, selection: Selection) -> Self {
        Self {
            text: text.into(),
            selection,
        }
    }
}

/// A committed edit.
///
/// Replacing `post.text` at `post.selection` with `pre.text` undoes it;
/// replacing `pre.text` at `pre.selection` with `post.text` redoes it.
/// Both chunks start at the same address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transformation {
    pub pre: Chunk,
    pub post: Chunk,
}

#[derive(Debug, Clone)]
struct Node {
    id: NodeId,
    /// `None` only for the frontier
    edit: Option<Transformation>,
}

/// Undo/redo history with a movable cursor.
#[derive(Debug, Clone)]
pub struct History {
    nodes: VecDeque<Node>,
    current: usize,
    next_id: u64,
    /// Maximum number of committed transformations kept
    max_size: usize,
}

impl History {
    /// Creates an empty history keeping at most `max_size` transformations.
    pub fn new(max_size: usize) -> Self {
        let mut history = Self {
            nodes: VecDeque::new(),
            current: 0,
            next_id: 0,
            max_size: max_size.max(1),
        };
        history.clear();
        history
    }

    /// Resets to a single empty frontier node.
    pub fn clear(&mut self) {
        let frontier = self.frontier();
        self.nodes.clear();
        self.nodes.push_back(frontier);
        self.current = 0;
    }

    fn frontier(&mut self) -> Node {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        Node { id, edit: None }
    }

    /// Identity of the current node.
    pub fn current_id(&self) -> NodeId {
        self.nodes[self.current].id
    }

    /// Records an edit at the current position.
    ///
    /// Any redo chain is discarded. Returns false, recording nothing, if
    /// the edit is a no-op (`pre == post`).
    ///
    /// # Panics
    ///
    /// If the chunks start at different addresses. An edit never moves
    /// the start of the span it touches, so this is a caller bug.
    pub fn commit(&mut self, pre: Chunk, post: Chunk) -> bool {
        if pre == post {
            return false;
        }
        assert_eq!(
            pre.selection.from, post.selection.from,
            "transformation chunks must share a start address"
        );

        self.nodes.truncate(self.current + 1);
        self.nodes[self.current].edit = Some(Transformation { pre, post });

        let frontier = self.frontier();
        self.nodes.push_back(frontier);
        self.current += 1;

        while self.nodes.len() > self.max_size + 1 {
            self.nodes.pop_front();
            self.current -= 1;
        }
        true
    }

    /// Steps back one edit and returns it for the caller to reverse.
    pub fn undo(&mut self) -> Option<&Transformation> {
        if self.current == 0 {
            return None;
        }
        self.current -= 1;
        self.nodes[self.current].edit.as_ref()
    }

    /// Steps forward one edit and returns it for the caller to re-apply.
    pub fn redo(&mut self) -> Option<&Transformation> {
        if self.current + 1 >= self.nodes.len() {
            return None;
        }
        self.current += 1;
        self.nodes[self.current - 1].edit.as_ref()
    }

    /// Returns true if there are edits to undo.
    pub fn can_undo(&self) -> bool {
        self.current > 0
    }

    /// Returns true if there are edits to redo.
    pub fn can_redo(&self) -> bool {
        self.current + 1 < self.nodes.len()
    }

    /// Number of undo steps available.
    pub fn undo_count(&self) -> usize {
        self.current
    }

    /// Number of redo steps available.
    pub fn redo_count(&self) -> usize {
        self.nodes.len() - 1 - self.current
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Address;

    fn typed(text: &str, col: usize) -> (Chunk, Chunk) {
        let at = Address::new(0, col);
        let end = at.advance_over(text);
        (
            Chunk::new("", Selection::caret(at)),
            Chunk::new(text, Selection::new(at, end)),
        )
    }

    #[test]
    fn test_empty_history() {
        let mut history = History::new(10);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_commit_undo_redo() {
        let mut history = History::new(10);
        let (pre, post) = typed("abc", 0);
        assert!(history.commit(pre.clone(), post.clone()));

        let undone = history.undo().cloned().unwrap();
        assert_eq!(undone.pre, pre);
        assert_eq!(undone.post, post);
        assert!(!history.can_undo());

        let redone = history.redo().cloned().unwrap();
        assert_eq!(redone.post, post);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_noop_commit_is_rejected() {
        let mut history = History::new(10);
        let chunk = Chunk::new("x", Selection::default());
        assert!(!history.commit(chunk.clone(), chunk));
        assert!(!history.can_undo());
    }

    #[test]
    #[should_panic(expected = "share a start address")]
    fn test_mismatched_anchors_panic() {
        let mut history = History::new(10);
        history.commit(
            Chunk::new("", Selection::caret(Address::new(0, 1))),
            Chunk::new("x", Selection::caret(Address::new(0, 2))),
        );
    }

    #[test]
    fn test_commit_after_undo_discards_redo() {
        let mut history = History::new(10);
        let (a_pre, a_post) = typed("a", 0);
        let (b_pre, b_post) = typed("b", 1);
        let (c_pre, c_post) = typed("c", 1);
        history.commit(a_pre, a_post);
        history.commit(b_pre, b_post);

        history.undo();
        assert_eq!(history.redo_count(), 1);

        history.commit(c_pre, c_post.clone());
        assert!(!history.can_redo());
        assert_eq!(history.undo().map(|t| t.post.clone()), Some(c_post));
    }

    #[test]
    fn test_node_ids_track_positions() {
        let mut history = History::new(10);
        let start = history.current_id();
        let (pre, post) = typed("a", 0);
        history.commit(pre, post);
        assert_ne!(history.current_id(), start);

        history.undo();
        assert_eq!(history.current_id(), start);
    }

    #[test]
    fn test_bounded_history_drops_oldest() {
        let mut history = History::new(2);
        for (i, s) in ["a", "b", "c"].iter().enumerate() {
            let (pre, post) = typed(s, i);
            history.commit(pre, post);
        }
        assert_eq!(history.undo_count(), 2);
        assert_eq!(history.undo().map(|t| t.post.text.clone()), Some("c".into()));
        assert_eq!(history.undo().map(|t| t.post.text.clone()), Some("b".into()));
        assert!(history.undo().is_none());
    }
}
