//! # dotedit buffer
//!
//! The data structures under the dotedit editing engine:
//!
//! - [`Buffer`]: a line store addressed by `(row, rune column)`
//! - [`Address`] / [`Selection`]: coordinates and spans ("dot")
//! - [`auto_select`]: double-click expansion (brackets, lines, quotes, words)
//! - [`find_substring`] / [`parse_address_expression`]: literal search and
//!   sam-style addresses, both wrapping around the end of the buffer
//! - [`History`]: undo/redo as a list of before/after transformations
//!
//! Nothing here does I/O beyond [`Buffer::from_file`] and nothing logs.
//! Coalescing keystrokes into transformations is the session's job; see
//! the `dotedit-core` crate.
//!
//! Columns are always rune counts. Out-of-range addresses are clamped
//! onto the buffer rather than rejected.

mod address;
mod autoselect;
mod buffer;
mod dirty;
mod history;
mod line;
mod metrics;
mod search;
mod selection;

pub use address::Address;
pub use autoselect::{Direction, auto_select, scan_for_match};
pub use buffer::Buffer;
pub use dirty::DirtyLines;
pub use history::{Chunk, History, NodeId, Transformation};
pub use line::Line;
pub use metrics::{FontMetrics, MonospaceMetrics};
pub use search::{AddressMatcher, ParseError, find_substring, jump_to, parse_address_expression};
pub use selection::Selection;

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur during buffer operations
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("Address expression error: {0}")]
    Parse(#[from] ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
