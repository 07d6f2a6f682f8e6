//! Key chord parsing and canonicalization.
//!
//! Shortcut bindings are keyed by chord, so `"ctrl+shift+k"`, `"Shift+Control+K"`
//! and `" CTRL + shift + k "` must compare equal. [`KeyCombo::parse`] accepts the
//! loose human form and [`KeyCombo`]'s `Display` produces the canonical one:
//! modifiers in the order `Ctrl`, `Alt`, `Shift`, `Meta`, then the key.

use crate::domain::error::{PaneflowError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named (non-character) keys, in canonical spelling.
const NAMED_KEYS: &[&str] = &[
    "Enter", "Escape", "Tab", "Space", "Backspace", "Delete", "Insert", "Home", "End", "PageUp",
    "PageDown", "Up", "Down", "Left", "Right", "Plus",
];

/// Modifier flags of a chord.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

/// A canonical key chord: modifiers plus exactly one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyCombo {
    modifiers: Modifiers,
    key: String,
}

impl KeyCombo {
    /// Parses a chord such as `"ctrl+shift+k"` or `"Cmd+Esc"`.
    ///
    /// # Errors
    ///
    /// Returns [`PaneflowError::InvalidCombo`] for empty input, empty segments,
    /// repeated or missing keys, or unknown key names.
    ///
    /// ```
    /// use paneflow::input::KeyCombo;
    ///
    /// let combo = KeyCombo::parse("shift+control+k")?;
    /// assert_eq!(combo.to_string(), "Ctrl+Shift+K");
    /// # Ok::<(), paneflow::PaneflowError>(())
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = |reason: &str| PaneflowError::InvalidCombo {
            combo: input.to_string(),
            reason: reason.to_string(),
        };

        if input.trim().is_empty() {
            return Err(invalid("empty combo"));
        }

        let mut modifiers = Modifiers::default();
        let mut key: Option<String> = None;

        for part in input.split('+').map(str::trim) {
            if part.is_empty() {
                return Err(invalid("empty segment"));
            }
            let lower = part.to_ascii_lowercase();
            let flag = match lower.as_str() {
                "ctrl" | "control" => Some(&mut modifiers.ctrl),
                "alt" | "option" | "opt" => Some(&mut modifiers.alt),
                "shift" => Some(&mut modifiers.shift),
                "meta" | "cmd" | "command" | "super" | "win" => Some(&mut modifiers.meta),
                _ => None,
            };
            if let Some(flag) = flag {
                *flag = true;
                continue;
            }
            if key.is_some() {
                return Err(invalid("more than one non-modifier key"));
            }
            key = Some(canonical_key(&lower).ok_or_else(|| invalid("unknown key name"))?);
        }

        let key = key.ok_or_else(|| invalid("missing key"))?;
        Ok(Self { modifiers, key })
    }

    #[must_use]
    pub const fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Canonical spelling of a lowercase key name, or `None` if unknown.
fn canonical_key(lower: &str) -> Option<String> {
    let mut chars = lower.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(c.to_uppercase().collect());
    }

    let alias = match lower {
        "esc" => "escape",
        "return" => "enter",
        "del" => "delete",
        "ins" => "insert",
        "arrowup" => "up",
        "arrowdown" => "down",
        "arrowleft" => "left",
        "arrowright" => "right",
        "pgup" => "pageup",
        "pgdn" | "pgdown" => "pagedown",
        "spacebar" => "space",
        other => other,
    };

    if let Some(named) = NAMED_KEYS.iter().find(|k| k.eq_ignore_ascii_case(alias)) {
        return Some((*named).to_string());
    }

    alias
        .strip_prefix('f')
        .and_then(|n| n.parse::<u8>().ok())
        .filter(|n| (1..=24).contains(n))
        .map(|n| format!("F{n}"))
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.modifiers;
        for (on, name) in [(m.ctrl, "Ctrl"), (m.alt, "Alt"), (m.shift, "Shift"), (m.meta, "Meta")] {
            if on {
                write!(f, "{name}+")?;
            }
        }
        f.write_str(&self.key)
    }
}

impl FromStr for KeyCombo {
    type Err = PaneflowError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for KeyCombo {
    type Error = PaneflowError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<KeyCombo> for String {
    fn from(value: KeyCombo) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_order_and_case_are_canonicalized() {
        let a = KeyCombo::parse("shift+ctrl+k").unwrap();
        let b = KeyCombo::parse(" Control + SHIFT + K ").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "Ctrl+Shift+K");
    }

    #[test]
    fn aliases_map_to_named_keys() {
        assert_eq!(KeyCombo::parse("cmd+esc").unwrap().to_string(), "Meta+Escape");
        assert_eq!(KeyCombo::parse("alt+arrowleft").unwrap().to_string(), "Alt+Left");
        assert_eq!(KeyCombo::parse("f12").unwrap().to_string(), "F12");
        assert_eq!(KeyCombo::parse("ctrl+pgdn").unwrap().to_string(), "Ctrl+PageDown");
    }

    #[test]
    fn invalid_combos_are_rejected() {
        for bad in ["", "ctrl+", "ctrl+shift", "a+b", "ctrl+f99", "ctrl+banana"] {
            assert!(
                matches!(KeyCombo::parse(bad), Err(PaneflowError::InvalidCombo { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn serializes_as_canonical_string() {
        let combo: KeyCombo = serde_json::from_str("\"alt+shift+tab\"").unwrap();
        assert_eq!(serde_json::to_string(&combo).unwrap(), "\"Alt+Shift+Tab\"");
    }
}
