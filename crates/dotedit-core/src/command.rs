//! The input vocabulary of a session.
//!
//! A host translates platform events (keys, clicks) into `Command`s.
//! Plain typing and deletion coalesce into one undo step; every other
//! command commits pending input before it runs.

use dotedit_buffer::{Address, Selection};

/// A primitive editing action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    // Typing (coalesced)
    Insert(char),
    Backspace,
    Delete,
    Newline,

    // Movement
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    LineStart,
    LineEnd,

    // Clipboard and selection
    Cut,
    Copy,
    Paste,
    SelectAll,

    // History
    Undo,
    Redo,

    // Mouse
    Click(Address),
    DoubleClick(Address),
    Select(Selection),

    // Search
    FindNext(String),
    JumpTo(String),
}

impl Command {
    /// Returns true for commands that feed the pending edit instead of
    /// committing it first. `Newline` joins the edit and then commits.
    pub fn coalesces(&self) -> bool {
        matches!(
            self,
            Command::Insert(_) | Command::Backspace | Command::Delete | Command::Newline
        )
    }

    /// Returns the command's display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Command::Insert(_) => "Insert",
            Command::Backspace => "Backspace",
            Command::Delete => "Delete",
            Command::Newline => "Newline",
            Command::MoveLeft => "Move Left",
            Command::MoveRight => "Move Right",
            Command::MoveUp => "Move Up",
            Command::MoveDown => "Move Down",
            Command::LineStart => "Move to Line Start",
            Command::LineEnd => "Move to Line End",
            Command::Cut => "Cut",
            Command::Copy => "Copy",
            Command::Paste => "Paste",
            Command::SelectAll => "Select All",
            Command::Undo => "Undo",
            Command::Redo => "Redo",
            Command::Click(_) => "Click",
            Command::DoubleClick(_) => "Double Click",
            Command::Select(_) => "Select",
            Command::FindNext(_) => "Find Next",
            Command::JumpTo(_) => "Jump To",
        }
    }

    /// Parses a bindable command name such as `"edit.undo"`.
    ///
    /// Only argument-free commands can be bound to keys.
    pub fn from_name(name: &str) -> Option<Command> {
        let cmd = match name {
            "edit.backspace" => Command::Backspace,
            "edit.delete" => Command::Delete,
            "edit.newline" => Command::Newline,
            "edit.undo" => Command::Undo,
            "edit.redo" => Command::Redo,
            "edit.cut" => Command::Cut,
            "edit.copy" => Command::Copy,
            "edit.paste" => Command::Paste,
            "select.all" => Command::SelectAll,
            "cursor.left" => Command::MoveLeft,
            "cursor.right" => Command::MoveRight,
            "cursor.up" => Command::MoveUp,
            "cursor.down" => Command::MoveDown,
            "cursor.line_start" => Command::LineStart,
            "cursor.line_end" => Command::LineEnd,
            _ => return None,
        };
        Some(cmd)
    }
}
