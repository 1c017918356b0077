//! The editing session.
//!
//! A `Session` owns one buffer and everything that changes with it: the
//! dot, the undo history, uncommitted typing, the save point and the
//! clipboard handle. Every mutation goes through here so that history
//! always matches the buffer.
//!
//! Dot conventions:
//! - after an edit (typing, insert, delete, paste, redo) dot is a caret
//!   at the end of the new text
//! - after an undo dot selects the restored text
//! - a redo puts dot back where it was before the matching undo
//! - failed searches and jumps leave dot alone

use std::path::Path;

use dotedit_buffer::{
    Address, Buffer, Chunk, DirtyLines, FontMetrics, History, MonospaceMetrics, NodeId, Selection,
};

use crate::clipboard::Clipboard;
use crate::command::Command;
use crate::config::Config;
use crate::event::{EditorEvent, EventBus};
use crate::keymap::{KeyPress, Keymap};
use crate::pending::PendingEdit;
use crate::CoreResult;

/// One buffer being edited.
///
/// ## Thread Safety
///
/// A session is single-threaded and not reentrant. Hosts that share one
/// across threads must wrap it in a mutex; observers should use
/// [`Session::subscribe`] instead of borrowing it.
pub struct Session {
    /// The text
    buffer: Buffer,

    /// Committed transformations
    history: History,

    /// Typing not yet folded into history
    pending: Option<PendingEdit>,

    /// Current selection
    dot: Selection,

    /// Dot before each undo, newest last; redo pops it back
    redo_dots: Vec<Selection>,

    /// History position of the last save, if still reachable
    saved: Option<NodeId>,

    /// Host clipboard, if any
    clipboard: Option<Box<dyn Clipboard>>,

    /// Session configuration
    config: Config,

    /// Key bindings
    keymap: Keymap,

    /// Event bus for notifications
    event_bus: EventBus,
}

impl Session {
    /// Creates an empty session with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an empty session with custom configuration.
    pub fn with_config(config: Config) -> Self {
        let history = History::new(config.editor.undo_limit);
        let keymap = Keymap::from_config(&config);
        Self {
            buffer: Buffer::new(),
            saved: Some(history.current_id()),
            history,
            pending: None,
            dot: Selection::default(),
            redo_dots: Vec::new(),
            clipboard: None,
            config,
            keymap,
            event_bus: EventBus::new(),
        }
    }

    /// Attaches a clipboard.
    pub fn with_clipboard(mut self, clipboard: impl Clipboard + 'static) -> Self {
        self.set_clipboard(clipboard);
        self
    }

    /// Replaces the clipboard.
    pub fn set_clipboard(&mut self, clipboard: impl Clipboard + 'static) {
        self.clipboard = Some(Box::new(clipboard));
    }

    // ==================== Loading and Saving ====================

    /// Replaces the content, resetting history, dot and the save point.
    pub fn load(&mut self, bytes: &[u8]) {
        self.pending = None;
        self.buffer.load(bytes);
        self.history.clear();
        self.redo_dots.clear();
        self.dot = Selection::default();
        self.saved = Some(self.history.current_id());
        tracing::debug!("Loaded {} lines", self.buffer.line_count());
        self.emit(EditorEvent::Loaded);
    }

    /// Loads the content of a file.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> CoreResult<()> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        tracing::info!("Opening {}", path.display());
        self.load(&bytes);
        Ok(())
    }

    /// Writes the content to a file and marks it saved.
    pub fn save_to(&mut self, path: impl AsRef<Path>) -> CoreResult<()> {
        self.commit();
        std::fs::write(path.as_ref(), self.buffer.contents())?;
        self.mark_saved();
        Ok(())
    }

    /// Records the current state as saved.
    pub fn mark_saved(&mut self) {
        self.commit();
        self.saved = Some(self.history.current_id());
        self.emit(EditorEvent::Saved);
    }

    /// Returns true if the content differs from the last save.
    ///
    /// Undoing back to the saved state counts as unmodified.
    pub fn is_modified_since_save(&self) -> bool {
        self.has_pending_changes() || self.saved != Some(self.history.current_id())
    }

    // ==================== Queries ====================

    /// Current selection.
    pub fn dot(&self) -> Selection {
        self.dot
    }

    /// Full text.
    pub fn contents(&self) -> String {
        self.buffer.contents()
    }

    /// Text spanned by `sel`.
    pub fn selection_text(&self, sel: Selection) -> String {
        self.buffer.selection_text(sel)
    }

    /// Text spanned by dot.
    pub fn dot_text(&self) -> String {
        self.buffer.selection_text(self.dot)
    }

    pub fn last_address(&self) -> Address {
        self.buffer.last_address()
    }

    pub fn next_address(&self, addr: Address) -> Address {
        self.buffer.next_address(addr)
    }

    pub fn prev_address(&self, addr: Address) -> Address {
        self.buffer.prev_address(addr)
    }

    /// Double-click expansion of `addr`. Does not move dot.
    pub fn auto_select(&self, addr: Address) -> Selection {
        dotedit_buffer::auto_select(&self.buffer, addr)
    }

    /// Read access to the buffer.
    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the keymap.
    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    // ==================== Rendering Support ====================

    /// Returns true if some rows need redrawing.
    pub fn is_dirty(&self) -> bool {
        self.buffer.dirty().is_dirty()
    }

    /// Rows needing redraw.
    pub fn dirty_region(&self) -> DirtyLines {
        self.buffer.dirty()
    }

    /// Returns the rows needing redraw and clears them.
    pub fn take_dirty(&mut self) -> DirtyLines {
        self.buffer.take_dirty()
    }

    /// Advances of each rune on `row`, computed on demand.
    pub fn layout_line(&mut self, row: usize, metrics: &dyn FontMetrics) -> Option<&[f32]> {
        self.buffer.layout_line(row, metrics)
    }

    /// Cell metrics using the configured tab width.
    pub fn default_metrics(&self) -> MonospaceMetrics {
        MonospaceMetrics::new(1.0, self.config.editor.tab_width)
    }

    // ==================== Editing ====================

    /// Inserts `s` at `addr` as one undo step and returns its span.
    pub fn insert_at(&mut self, addr: Address, s: &str) -> Selection {
        self.apply_edit(Selection::caret(addr), s)
    }

    /// Deletes `sel` as one undo step and returns where it started.
    pub fn delete_selection(&mut self, sel: Selection) -> Address {
        self.apply_edit(sel, "").from
    }

    /// Moves dot.
    pub fn set_selection(&mut self, sel: Selection) -> bool {
        self.commit();
        let sel = self.buffer.clamp_selection(sel);
        self.set_dot(sel)
    }

    /// Types one rune at dot, replacing any selected text.
    pub fn type_char(&mut self, c: char) -> bool {
        self.ensure_pending();
        let Some(edit) = self.pending.as_mut() else {
            return false;
        };
        edit.insert(&mut self.buffer, c);
        let caret = edit.caret();
        tracing::trace!("Typed {:?} at {}", c, caret);
        self.after_keystroke(caret);
        true
    }

    /// Types a line break and commits, so each line is its own undo step.
    pub fn newline(&mut self) -> bool {
        self.type_char('\n');
        self.commit();
        true
    }

    /// Deletes the selection, or the rune before dot.
    pub fn backspace(&mut self) -> bool {
        let had_selection = !self.dot.is_empty();
        self.ensure_pending();
        let Some(edit) = self.pending.as_mut() else {
            return false;
        };
        if !had_selection && !edit.backspace(&mut self.buffer) {
            return false;
        }
        let caret = edit.caret();
        tracing::trace!("Backspace to {}", caret);
        self.after_keystroke(caret);
        true
    }

    /// Deletes the selection, or the rune after dot.
    pub fn delete_forward(&mut self) -> bool {
        let had_selection = !self.dot.is_empty();
        self.ensure_pending();
        let Some(edit) = self.pending.as_mut() else {
            return false;
        };
        if !had_selection && !edit.delete_forward(&mut self.buffer) {
            return false;
        }
        let caret = edit.caret();
        tracing::trace!("Delete at {}", caret);
        self.after_keystroke(caret);
        true
    }

    /// Replaces `sel` with `text` and records it as a transformation.
    fn apply_edit(&mut self, sel: Selection, text: &str) -> Selection {
        self.commit();
        let sel = self.buffer.clamp_selection(sel);
        let pre = Chunk::new(self.buffer.selection_text(sel), sel);
        let span = self.buffer.replace(sel, text);
        let post = Chunk::new(text, span);

        if self.history.commit(pre, post) {
            self.redo_dots.clear();
            tracing::debug!("Committed edit at {}", span);
            self.emit(EditorEvent::TextChanged);
            self.emit(EditorEvent::Committed);
        }
        self.set_dot(Selection::caret(span.to));
        span
    }

    /// Makes sure there is a pending edit whose caret is dot.
    fn ensure_pending(&mut self) {
        let continues = match &self.pending {
            Some(edit) => self.dot == Selection::caret(edit.caret()),
            None => false,
        };
        if !continues {
            self.commit();
            self.pending = Some(PendingEdit::begin(&mut self.buffer, self.dot));
        }
    }

    fn after_keystroke(&mut self, caret: Address) {
        self.emit(EditorEvent::TextChanged);
        self.set_dot(Selection::caret(caret));
    }

    fn has_pending_changes(&self) -> bool {
        self.pending.as_ref().is_some_and(|edit| !edit.is_noop())
    }

    // ==================== History ====================

    /// Folds pending typing into history.
    ///
    /// Returns false if there was nothing to commit.
    pub fn commit(&mut self) -> bool {
        let Some(edit) = self.pending.take() else {
            return false;
        };
        if edit.is_noop() {
            return false;
        }

        let (pre, post) = edit.into_chunks();
        tracing::debug!("Committing {:?} -> {:?} at {}", pre.text, post.text, post.selection);
        let committed = self.history.commit(pre, post);
        if committed {
            self.redo_dots.clear();
            self.emit(EditorEvent::Committed);
        }
        committed
    }

    /// Reverses the last transformation. Returns false if there is none.
    pub fn undo(&mut self) -> bool {
        self.commit();
        let dot = match self.history.undo() {
            Some(edit) => {
                self.buffer.replace(edit.post.selection, &edit.pre.text);
                self.redo_dots.push(self.dot);
                edit.pre.selection
            }
            None => {
                tracing::debug!("Nothing to undo");
                return false;
            }
        };

        self.set_dot(dot);
        self.emit(EditorEvent::TextChanged);
        self.emit(EditorEvent::Undone);
        true
    }

    /// Re-applies the last undone transformation. Returns false if there
    /// is none.
    pub fn redo(&mut self) -> bool {
        self.commit();
        let dot = match self.history.redo() {
            Some(edit) => {
                let span = self.buffer.replace(edit.pre.selection, &edit.post.text);
                let dot = self.redo_dots.pop().unwrap_or(Selection::caret(span.to));
                self.buffer.clamp_selection(dot)
            }
            None => {
                tracing::debug!("Nothing to redo");
                return false;
            }
        };

        self.set_dot(dot);
        self.emit(EditorEvent::TextChanged);
        self.emit(EditorEvent::Redone);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.has_pending_changes() || self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        !self.has_pending_changes() && self.history.can_redo()
    }

    // ==================== Search ====================

    /// Selects the next literal occurrence of `pattern` after dot,
    /// wrapping around. Returns false (dot unchanged) on a miss.
    pub fn find_next(&mut self, pattern: &str) -> bool {
        self.commit();
        match dotedit_buffer::find_substring(&self.buffer, self.dot.to, pattern) {
            Some(found) => {
                self.set_dot(found);
                true
            }
            None => {
                tracing::debug!("No match for {:?}", pattern);
                false
            }
        }
    }

    /// Selects the result of an address expression such as `/re/`.
    ///
    /// Malformed expressions are logged and fail like a miss.
    pub fn jump_to(&mut self, expr: &str) -> bool {
        self.commit();
        match dotedit_buffer::jump_to(&self.buffer, self.dot, expr) {
            Ok(Some(found)) => {
                self.set_dot(found);
                true
            }
            Ok(None) => {
                tracing::debug!("No match for {:?}", expr);
                false
            }
            Err(e) => {
                tracing::debug!("Bad address {:?}: {}", expr, e);
                false
            }
        }
    }

    // ==================== Clipboard ====================

    /// Copies dot to the clipboard. Returns false if nothing was copied.
    pub fn copy(&mut self) -> bool {
        self.commit();
        if self.dot.is_empty() {
            return false;
        }
        let text = self.buffer.selection_text(self.dot);
        let Some(clipboard) = self.clipboard.as_ref() else {
            tracing::warn!("Copy ignored: no clipboard");
            return false;
        };
        match clipboard.put(&text) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Copy failed: {}", e);
                false
            }
        }
    }

    /// Copies dot to the clipboard, then deletes it.
    pub fn cut(&mut self) -> bool {
        if !self.copy() {
            return false;
        }
        self.delete_selection(self.dot);
        true
    }

    /// Replaces dot with the clipboard contents.
    pub fn paste(&mut self) -> bool {
        self.commit();
        let Some(clipboard) = self.clipboard.as_ref() else {
            tracing::warn!("Paste ignored: no clipboard");
            return false;
        };
        let text = match clipboard.get() {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Paste failed: {}", e);
                return false;
            }
        };
        self.apply_edit(self.dot, &text);
        true
    }

    // ==================== Movement ====================

    fn move_dot(&mut self, to: Address) -> bool {
        self.commit();
        let to = self.buffer.clamp(to);
        self.set_dot(Selection::caret(to))
    }

    pub fn move_left(&mut self) -> bool {
        let to = if self.dot.is_empty() {
            self.buffer.prev_address(self.dot.from)
        } else {
            self.dot.from
        };
        self.move_dot(to)
    }

    pub fn move_right(&mut self) -> bool {
        let to = if self.dot.is_empty() {
            self.buffer.next_address(self.dot.to)
        } else {
            self.dot.to
        };
        self.move_dot(to)
    }

    pub fn move_up(&mut self) -> bool {
        let at = self.dot.from;
        if at.row == 0 {
            return self.move_dot(Address::ZERO);
        }
        self.move_dot(Address::new(at.row - 1, at.col))
    }

    pub fn move_down(&mut self) -> bool {
        let at = self.dot.to;
        if at.row + 1 >= self.buffer.line_count() {
            return self.move_dot(self.buffer.last_address());
        }
        self.move_dot(Address::new(at.row + 1, at.col))
    }

    pub fn move_to_line_start(&mut self) -> bool {
        self.move_dot(Address::new(self.dot.from.row, 0))
    }

    pub fn move_to_line_end(&mut self) -> bool {
        let row = self.dot.to.row;
        self.move_dot(Address::new(row, self.buffer.rune_count(row)))
    }

    /// Selects the whole buffer.
    pub fn select_all(&mut self) -> bool {
        self.set_selection(self.buffer.full_selection())
    }

    /// Moves dot, marking the rows it leaves and enters for redraw.
    fn set_dot(&mut self, sel: Selection) -> bool {
        if sel == self.dot {
            return false;
        }
        let old = self.dot;
        self.buffer
            .mark_dirty(DirtyLines::range(old.from.row, old.to.row + 1));
        self.buffer
            .mark_dirty(DirtyLines::range(sel.from.row, sel.to.row + 1));
        self.dot = sel;
        self.emit(EditorEvent::SelectionChanged(sel));
        true
    }

    // ==================== Input ====================

    /// Runs one command. Returns true if it changed the text or dot.
    ///
    /// Commands that do not coalesce commit pending input before they
    /// run; `Newline` joins the pending edit first and then commits.
    pub fn execute(&mut self, command: Command) -> bool {
        if !command.coalesces() {
            self.commit();
        }
        match command {
            Command::Insert(c) => self.type_char(c),
            Command::Backspace => self.backspace(),
            Command::Delete => self.delete_forward(),
            Command::Newline => self.newline(),
            Command::MoveLeft => self.move_left(),
            Command::MoveRight => self.move_right(),
            Command::MoveUp => self.move_up(),
            Command::MoveDown => self.move_down(),
            Command::LineStart => self.move_to_line_start(),
            Command::LineEnd => self.move_to_line_end(),
            Command::Cut => self.cut(),
            Command::Copy => self.copy(),
            Command::Paste => self.paste(),
            Command::SelectAll => self.select_all(),
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
            Command::Click(addr) => self.move_dot(addr),
            Command::DoubleClick(addr) => {
                let sel = self.auto_select(addr);
                self.set_selection(sel)
            }
            Command::Select(sel) => self.set_selection(sel),
            Command::FindNext(pattern) => self.find_next(&pattern),
            Command::JumpTo(expr) => self.jump_to(&expr),
        }
    }

    /// Resolves a key press through the keymap and runs it.
    pub fn handle_key(&mut self, key: KeyPress) -> bool {
        match self.keymap.resolve(key) {
            Some(command) => self.execute(command),
            None => {
                tracing::trace!("Unbound key {}", key);
                false
            }
        }
    }

    // ==================== Events ====================

    /// Subscribes to session events.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<EditorEvent> {
        self.event_bus.subscribe()
    }

    fn emit(&self, event: EditorEvent) {
        self.event_bus.emit(event);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
