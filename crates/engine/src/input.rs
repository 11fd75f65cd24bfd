//! Input events delivered by the presentation layer.

use gridkit_core::SelectMode;

use crate::clipboard::PendingPaste;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    Backspace,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

impl Key {
    /// Parse a key name (`Enter`, `Esc`, `Tab`, `Backspace`, `Up`, `ArrowLeft`, or a single character).
    pub fn parse(name: &str) -> Option<Key> {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(Key::Char(c));
        }

        match name.to_ascii_lowercase().as_str() {
            "enter" | "return" => Some(Key::Enter),
            "escape" | "esc" => Some(Key::Escape),
            "tab" => Some(Key::Tab),
            "backspace" => Some(Key::Backspace),
            "space" => Some(Key::Char(' ')),
            "up" | "arrowup" => Some(Key::ArrowUp),
            "down" | "arrowdown" => Some(Key::ArrowDown),
            "left" | "arrowleft" => Some(Key::ArrowLeft),
            "right" | "arrowright" => Some(Key::ArrowRight),
            _ => None,
        }
    }

    /// Row/column delta for arrow keys.
    pub fn arrow_delta(&self) -> Option<(isize, isize)> {
        match self {
            Key::ArrowUp => Some((-1, 0)),
            Key::ArrowDown => Some((1, 0)),
            Key::ArrowLeft => Some((0, -1)),
            Key::ArrowRight => Some((0, 1)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Cmd on macOS
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { shift: false, ctrl: false, alt: false, meta: false };

    pub fn shift() -> Self {
        Self { shift: true, ..Self::NONE }
    }

    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::NONE }
    }

    pub fn meta() -> Self {
        Self { meta: true, ..Self::NONE }
    }

    /// Ctrl or Cmd.
    pub fn is_command(&self) -> bool {
        self.ctrl || self.meta
    }

    /// Row-header click semantics: shift extends, ctrl/cmd toggles.
    pub fn select_mode(&self) -> SelectMode {
        if self.shift {
            SelectMode::Extend
        } else if self.is_command() {
            SelectMode::Toggle
        } else {
            SelectMode::Replace
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    pub fn shifted(key: Key) -> Self {
        Self::new(key, Modifiers::shift())
    }

    pub fn command(key: Key) -> Self {
        Self::new(key, Modifiers::ctrl())
    }
}

/// Work the host must perform on the grid's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum GridCommand {
    /// Write plain text to the system clipboard (fire-and-forget).
    WriteClipboard(String),
    /// Read the system clipboard, then hand the result to `Grid::complete_paste`.
    ReadClipboard(PendingPaste),
}

#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    /// Not consumed; the host may apply its default behavior.
    Ignored,
    Handled,
    Command(GridCommand),
}

impl KeyOutcome {
    pub fn is_handled(&self) -> bool {
        !matches!(self, KeyOutcome::Ignored)
    }
}
