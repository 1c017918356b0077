//! Session notifications.
//!
//! Renderers and other observers subscribe to a broadcast channel instead
//! of holding references into the session. Events are values; a slow
//! subscriber lags and drops events rather than blocking the editor.

use dotedit_buffer::Selection;
use tokio::sync::broadcast;

/// Something observable happened in a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// New content replaced the buffer and reset history
    Loaded,
    /// Buffer text changed
    TextChanged,
    /// Dot moved
    SelectionChanged(Selection),
    /// Pending input was folded into a history transformation
    Committed,
    /// A transformation was reversed
    Undone,
    /// A transformation was re-applied
    Redone,
    /// The save point moved to the current state
    Saved,
}

/// Event bus for broadcasting session events.
pub struct EventBus {
    sender: broadcast::Sender<EditorEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(256);
        Self { sender }
    }

    /// Emits an event to all subscribers.
    pub fn emit(&self, event: EditorEvent) {
        // No receivers is fine
        let _ = self.sender.send(event);
    }

    /// Subscribes to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<EditorEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("receivers", &self.sender.receiver_count())
            .finish()
    }
}
