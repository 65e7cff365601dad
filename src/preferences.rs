//! The persisted preference record.
//!
//! A [`PreferenceRecord`] is the single unit of persistence: the ordered list
//! of workspace layouts to cycle through plus the [`HotkeyBinding`] that
//! triggers the cycle.  It is always read and written in full.
//!
//! # Wire format
//!
//! ```json
//! {
//!   "workspaces": ["Animation", "Modeling", "Rigging"],
//!   "hotkey": { "key": "w", "ctl": true, "alt": false, "shift": false }
//! }
//! ```
//!
//! Decoding is backward tolerant: a missing `workspaces` key yields an empty
//! list and a missing `hotkey` key yields a disabled binding.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A key combination descriptor.
///
/// An empty `key` means the binding is disabled; that is also what
/// [`HotkeyBinding::default`] produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyBinding {
    /// The (lowercase) key character, or `""` when disabled.
    pub key: String,
    pub ctl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl HotkeyBinding {
    /// Binding for `key` with only the control modifier held.
    pub fn ctrl(key: char) -> Self {
        Self {
            key: key.to_lowercase().collect(),
            ctl: true,
            alt: false,
            shift: false,
        }
    }

    /// `true` unless the key is blank.
    pub fn is_enabled(&self) -> bool {
        !self.key.trim().is_empty()
    }

    /// `true` when the key is exactly one character.
    pub fn is_single_key(&self) -> bool {
        self.key.chars().count() == 1
    }

    /// `true` when both bindings name the same key and modifiers.
    ///
    /// Keys compare case-insensitively.
    pub fn same_combination(&self, other: &HotkeyBinding) -> bool {
        self.key.to_lowercase() == other.key.to_lowercase()
            && self.ctl == other.ctl
            && self.alt == other.alt
            && self.shift == other.shift
    }
}

impl fmt::Display for HotkeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_enabled() {
            return write!(f, "(disabled)");
        }
        if self.ctl {
            write!(f, "Ctrl+")?;
        }
        if self.alt {
            write!(f, "Alt+")?;
        }
        if self.shift {
            write!(f, "Shift+")?;
        }
        write!(f, "{}", self.key)
    }
}

/// Error from parsing a textual hotkey such as `"ctrl+shift+w"`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HotkeyParseError {
    #[error("empty hotkey")]
    Empty,
    #[error("hotkey {0:?} names more than one key")]
    MultipleKeys(String),
    #[error("hotkey {0:?} has no key, only modifiers")]
    MissingKey(String),
    #[error("hotkey key {0:?} must be a single character")]
    NotSingleChar(String),
}

/// Parse `"ctrl+alt+w"`-style text (case-insensitive, `+` separated).
impl FromStr for HotkeyBinding {
    type Err = HotkeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(HotkeyParseError::Empty);
        }

        let mut binding = HotkeyBinding::default();

        // A trailing `++` (or a lone `+`) names the plus key itself.
        let (modifiers, mut key) = if text == "+" {
            ("", Some("+".to_string()))
        } else if let Some(prefix) = text.strip_suffix("++") {
            (prefix, Some("+".to_string()))
        } else {
            (text, None)
        };

        for part in modifiers.split('+').map(str::trim).filter(|p| !p.is_empty()) {
            match part.to_lowercase().as_str() {
                "ctl" | "ctrl" | "control" => binding.ctl = true,
                "alt" => binding.alt = true,
                "shift" => binding.shift = true,
                other => {
                    if key.is_some() {
                        return Err(HotkeyParseError::MultipleKeys(text.to_string()));
                    }
                    if other.chars().count() != 1 {
                        return Err(HotkeyParseError::NotSingleChar(part.to_string()));
                    }
                    key = Some(other.to_string());
                }
            }
        }

        binding.key = key.ok_or_else(|| HotkeyParseError::MissingKey(text.to_string()))?;
        Ok(binding)
    }
}

/// The curated workspace list and its hotkey.
///
/// `workspaces` order is the cycle order.  Duplicates are not expected (the
/// settings form refuses them) but are tolerated everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    #[serde(default)]
    pub workspaces: Vec<String>,

    /// Missing in older documents; decodes to the disabled binding.
    #[serde(default)]
    pub hotkey: HotkeyBinding,
}

impl Default for PreferenceRecord {
    /// The record used when nothing has been stored yet: no workspaces,
    /// bound to `Ctrl+w`.
    fn default() -> Self {
        Self {
            workspaces: Vec::new(),
            hotkey: HotkeyBinding::ctrl('w'),
        }
    }
}
