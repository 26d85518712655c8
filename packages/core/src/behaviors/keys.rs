//! Key events understood by the behavior engine

use crate::models::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Structural keys; everything else is plain text input for the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Enter,
    Backspace,
    Tab,
}

/// A keydown with its Shift modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    #[serde(default)]
    pub shift: bool,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self { key, shift: false }
    }

    pub fn shifted(key: Key) -> Self {
        Self { key, shift: true }
    }

    pub fn enter() -> Self {
        Self::new(Key::Enter)
    }

    pub fn backspace() -> Self {
        Self::new(Key::Backspace)
    }

    pub fn tab() -> Self {
        Self::new(Key::Tab)
    }

    pub fn shift_tab() -> Self {
        Self::shifted(Key::Tab)
    }

    /// Plain Enter (Shift+Enter is a soft break left to the host)
    pub fn is_enter(&self) -> bool {
        self.key == Key::Enter && !self.shift
    }

    /// Backspace, with or without Shift
    pub fn is_backspace(&self) -> bool {
        self.key == Key::Backspace
    }

    pub fn is_tab(&self) -> bool {
        self.key == Key::Tab && !self.shift
    }

    pub fn is_shift_tab(&self) -> bool {
        self.key == Key::Tab && self.shift
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.shift {
            write!(f, "Shift+")?;
        }
        let name = match self.key {
            Key::Enter => "Enter",
            Key::Backspace => "Backspace",
            Key::Tab => "Tab",
        };
        f.write_str(name)
    }
}

impl FromStr for KeyEvent {
    type Err = ValidationError;

    /// Parse `Enter`, `Tab`, `Shift+Tab`, `backspace`, ... (case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let (shift, name) = match lowered.strip_prefix("shift+") {
            Some(rest) => (true, rest),
            None => (false, lowered.as_str()),
        };
        let key = match name {
            "enter" | "return" => Key::Enter,
            "backspace" => Key::Backspace,
            "tab" => Key::Tab,
            _ => return Err(ValidationError::InvalidKey(s.to_string())),
        };
        Ok(Self { key, shift })
    }
}
