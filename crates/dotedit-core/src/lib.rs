//! # dotedit core
//!
//! The editing session that sits between raw input and the buffer.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        Session                            │
//! │  ┌──────────┐  ┌────────────┐  ┌──────────┐  ┌─────────┐ │
//! │  │  Keymap  │─▶│  Command   │─▶│  Pending │─▶│ History │ │
//! │  └──────────┘  └────────────┘  │   Edit   │  └─────────┘ │
//! │                      │         └──────────┘              │
//! │                      ▼                                   │
//! │  ┌─────────────────────────────────────┐  ┌───────────┐  │
//! │  │        Buffer (dotedit-buffer)       │  │ EventBus  │  │
//! │  └─────────────────────────────────────┘  └───────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! A host decodes platform input into [`KeyPress`]es or mouse
//! [`Command`]s and feeds them to [`Session::execute`]. Typing and
//! deletion accumulate in a pending edit; anything else commits it to
//! history first.

pub mod clipboard;
pub mod command;
pub mod config;
pub mod event;
pub mod keymap;
mod pending;
pub mod session;

pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard};
pub use command::Command;
pub use config::Config;
pub use event::{EditorEvent, EventBus};
pub use keymap::{Key, KeyPress, Keymap, Modifiers};
pub use session::Session;

pub use dotedit_buffer::{Address, DirtyLines, FontMetrics, MonospaceMetrics, Selection};

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}
