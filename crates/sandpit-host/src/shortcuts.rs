//! Keyboard shortcuts
//!
//! | Chord | Action |
//! |---|---|
//! | Ctrl/Cmd + S | run |
//! | Ctrl/Cmd + Shift + R | reset |
//! | Ctrl/Cmd + Shift + C | clear console |
//! | Ctrl/Cmd + Shift + T | cycle theme |

use std::str::FromStr;

/// A key press with modifiers
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyChord {
    /// Key value as reported by the page (`"s"`, `"R"`, ...)
    pub key: String,
    /// Control held
    pub ctrl: bool,
    /// Command / meta held
    pub meta: bool,
    /// Shift held
    pub shift: bool,
}

impl KeyChord {
    /// Unmodified key
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// With Control
    #[must_use]
    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    /// With Command / meta
    #[must_use]
    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// With Shift
    #[must_use]
    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

impl FromStr for KeyChord {
    type Err = String;

    /// Parses `"ctrl+shift+r"` style chords
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chord = KeyChord::default();
        for part in s.split('+').map(str::trim) {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => chord.ctrl = true,
                "cmd" | "meta" | "super" => chord.meta = true,
                "shift" => chord.shift = true,
                "" => return Err(format!("empty key in chord `{s}`")),
                _ if chord.key.is_empty() => chord.key = part.to_string(),
                _ => return Err(format!("more than one key in chord `{s}`")),
            }
        }
        if chord.key.is_empty() {
            return Err(format!("no key in chord `{s}`"));
        }
        Ok(chord)
    }
}

/// Controller action bound to a chord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shortcut {
    /// Compose and run
    Run,
    /// Restore template defaults
    Reset,
    /// Empty the console
    ClearConsole,
    /// Next editor theme
    CycleTheme,
}

impl Shortcut {
    /// Action for `chord`, if it is bound
    #[must_use]
    pub fn from_chord(chord: &KeyChord) -> Option<Self> {
        if !(chord.ctrl || chord.meta) {
            return None;
        }
        let key = chord.key.to_ascii_lowercase();
        match (chord.shift, key.as_str()) {
            (false, "s") => Some(Shortcut::Run),
            (true, "r") => Some(Shortcut::Reset),
            (true, "c") => Some(Shortcut::ClearConsole),
            (true, "t") => Some(Shortcut::CycleTheme),
            _ => None,
        }
    }
}
