//! Clipboard capability.
//!
//! System clipboard access belongs to the host. The session only sees
//! this trait, and treats every failure (or a missing clipboard) as
//! something to log, never to abort on.

use std::cell::RefCell;
use std::rc::Rc;

/// Clipboard failures.
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard is empty")]
    Empty,

    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
}

/// Get/put access to a clipboard.
pub trait Clipboard {
    fn get(&self) -> Result<String, ClipboardError>;
    fn put(&self, text: &str) -> Result<(), ClipboardError>;
}

/// In-process clipboard.
///
/// Clones share storage, so a host can keep a handle while the session
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Rc<RefCell<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for MemoryClipboard {
    fn get(&self) -> Result<String, ClipboardError> {
        self.contents.borrow().clone().ok_or(ClipboardError::Empty)
    }

    fn put(&self, text: &str) -> Result<(), ClipboardError> {
        *self.contents.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard() {
        let clipboard = MemoryClipboard::new();
        assert!(matches!(clipboard.get(), Err(ClipboardError::Empty)));

        let handle = clipboard.clone();
        clipboard.put("hello").unwrap();
        assert_eq!(handle.get().unwrap(), "hello");
    }
}
