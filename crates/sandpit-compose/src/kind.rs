//! The three kinds of playground source

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three editable sources. Doubles as the active-tab value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Body-fragment HTML
    #[default]
    #[serde(alias = "html")]
    Markup,
    /// CSS
    #[serde(alias = "css")]
    Style,
    /// JavaScript
    #[serde(alias = "js")]
    Script,
}

impl SourceKind {
    /// All kinds in tab order
    pub const ALL: [SourceKind; 3] = [SourceKind::Markup, SourceKind::Style, SourceKind::Script];

    /// Short tab identifier (`html`, `css`, `js`)
    #[inline]
    #[must_use]
    pub fn tab_id(self) -> &'static str {
        match self {
            SourceKind::Markup => "html",
            SourceKind::Style => "css",
            SourceKind::Script => "js",
        }
    }

    /// Human label used in tab captions and the clipboard serialization
    #[inline]
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Markup => "HTML",
            SourceKind::Style => "CSS",
            SourceKind::Script => "JavaScript",
        }
    }

    /// Editor language id
    #[inline]
    #[must_use]
    pub fn language(self) -> &'static str {
        match self {
            SourceKind::Markup => "html",
            SourceKind::Style => "css",
            SourceKind::Script => "javascript",
        }
    }

    /// Position in [`SourceKind::ALL`]
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            SourceKind::Markup => 0,
            SourceKind::Style => 1,
            SourceKind::Script => 2,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tab_id())
    }
}

/// Unknown source kind name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown source kind: {0}")]
pub struct ParseKindError(pub String);

impl FromStr for SourceKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" | "markup" => Ok(SourceKind::Markup),
            "css" | "style" => Ok(SourceKind::Style),
            "js" | "javascript" | "script" => Ok(SourceKind::Script),
            other => Err(ParseKindError(other.to_string())),
        }
    }
}
