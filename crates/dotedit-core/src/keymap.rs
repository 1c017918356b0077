//! Keyboard mapping.
//!
//! Turns decoded key presses into [`Command`]s. Bindings are single
//! chords (`ctrl+z`); an unbound printable key types itself.

use crate::command::Command;
use crate::config::Config;
use std::collections::HashMap;

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool, // Cmd on macOS, Win on Windows
}

impl Modifiers {
    /// No modifiers pressed.
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    /// Ctrl modifier.
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        alt: false,
        shift: false,
        meta: false,
    };

    /// Ctrl+Shift.
    pub const CTRL_SHIFT: Modifiers = Modifiers {
        ctrl: true,
        alt: false,
        shift: true,
        meta: false,
    };

    /// Returns true if no modifiers are pressed.
    pub fn is_empty(&self) -> bool {
        !self.ctrl && !self.alt && !self.shift && !self.meta
    }

    /// Parses modifiers from a string like "ctrl+shift".
    pub fn parse(s: &str) -> Self {
        let mut mods = Modifiers::NONE;
        for part in s.split('+').map(str::trim) {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => mods.ctrl = true,
                "alt" | "option" => mods.alt = true,
                "shift" => mods.shift = true,
                "meta" | "cmd" | "win" | "super" => mods.meta = true,
                _ => {}
            }
        }
        mods
    }
}

impl std::fmt::Display for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.alt {
            parts.push("Alt");
        }
        if self.shift {
            parts.push("Shift");
        }
        if self.meta {
            parts.push("Meta");
        }
        write!(f, "{}", parts.join("+"))
    }
}

/// A key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

impl Key {
    /// Parses a key from a string.
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        let key = match lower.as_str() {
            "enter" | "return" => Key::Enter,
            "tab" => Key::Tab,
            "backspace" | "bs" => Key::Backspace,
            "delete" | "del" => Key::Delete,
            "up" => Key::Up,
            "down" => Key::Down,
            "left" => Key::Left,
            "right" => Key::Right,
            "home" => Key::Home,
            "end" => Key::End,
            "space" => Key::Char(' '),
            _ => {
                let mut chars = lower.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => return None,
                }
            }
        };
        Some(key)
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Char(' ') => write!(f, "Space"),
            Key::Char(c) => write!(f, "{}", c.to_uppercase()),
            Key::Enter => write!(f, "Enter"),
            Key::Tab => write!(f, "Tab"),
            Key::Backspace => write!(f, "Backspace"),
            Key::Delete => write!(f, "Delete"),
            Key::Up => write!(f, "Up"),
            Key::Down => write!(f, "Down"),
            Key::Left => write!(f, "Left"),
            Key::Right => write!(f, "Right"),
            Key::Home => write!(f, "Home"),
            Key::End => write!(f, "End"),
        }
    }
}

/// A key press event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    /// Creates a new key press.
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// A key with no modifiers.
    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    /// Parses a chord string like "ctrl+s" or "ctrl+shift+z".
    pub fn parse(s: &str) -> Option<Self> {
        let (mods, key) = match s.rsplit_once('+') {
            // "ctrl++" binds the plus key
            Some((mods, "")) => (mods.strip_suffix('+')?, "+"),
            Some((mods, key)) => (mods, key),
            None => ("", s),
        };
        Some(Self {
            key: Key::parse(key.trim())?,
            modifiers: Modifiers::parse(mods),
        })
    }
}

impl std::fmt::Display for KeyPress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.modifiers.is_empty() {
            write!(f, "{}", self.key)
        } else {
            write!(f, "{}+{}", self.modifiers, self.key)
        }
    }
}

/// Keyboard mapping configuration.
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: HashMap<KeyPress, Command>,
}

impl Keymap {
    /// Creates a keymap with the default bindings.
    pub fn new() -> Self {
        let mut keymap = Self {
            bindings: HashMap::new(),
        };
        keymap.add_default_bindings();
        keymap
    }

    /// Creates a keymap from configuration.
    ///
    /// User bindings override defaults; unparseable entries are skipped
    /// with a warning.
    pub fn from_config(config: &Config) -> Self {
        let mut keymap = Self::new();

        for (key_str, cmd_str) in &config.keyboard.bindings {
            match (KeyPress::parse(key_str), Command::from_name(cmd_str)) {
                (Some(key), Some(cmd)) => keymap.bind(key, cmd),
                _ => tracing::warn!("Ignoring key binding {:?} = {:?}", key_str, cmd_str),
            }
        }

        keymap
    }

    fn add_default_bindings(&mut self) {
        use crate::command::Command::*;

        let ctrl = |c| KeyPress::new(Key::Char(c), Modifiers::CTRL);
        let bindings = [
            (ctrl('z'), Undo),
            (ctrl('y'), Redo),
            (KeyPress::new(Key::Char('z'), Modifiers::CTRL_SHIFT), Redo),
            (ctrl('x'), Cut),
            (ctrl('c'), Copy),
            (ctrl('v'), Paste),
            (ctrl('a'), SelectAll),
            (KeyPress::plain(Key::Enter), Newline),
            (KeyPress::plain(Key::Tab), Insert('\t')),
            (KeyPress::plain(Key::Backspace), Backspace),
            (KeyPress::plain(Key::Delete), Delete),
            (KeyPress::plain(Key::Left), MoveLeft),
            (KeyPress::plain(Key::Right), MoveRight),
            (KeyPress::plain(Key::Up), MoveUp),
            (KeyPress::plain(Key::Down), MoveDown),
            (KeyPress::plain(Key::Home), LineStart),
            (KeyPress::plain(Key::End), LineEnd),
        ];

        for (key, cmd) in bindings {
            self.bind(key, cmd);
        }
    }

    /// Adds or replaces a binding.
    pub fn bind(&mut self, key: KeyPress, command: Command) {
        self.bindings.insert(key, command);
    }

    /// Resolves a key press to a command.
    ///
    /// Unbound characters typed without ctrl/alt/meta insert themselves.
    pub fn resolve(&self, key: KeyPress) -> Option<Command> {
        if let Some(cmd) = self.bindings.get(&key) {
            return Some(cmd.clone());
        }
        match key.key {
            Key::Char(c) if !(key.modifiers.ctrl || key.modifiers.alt || key.modifiers.meta) => {
                Some(Command::Insert(c))
            }
            _ => None,
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}
