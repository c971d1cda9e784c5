//! Transient notifications (toasts)

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Toast styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Neutral information
    Info,
    /// An action completed
    Success,
    /// An action failed; state is unchanged
    Error,
}

/// A dismissable message shown for `ttl`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Bold first line
    pub title: String,
    /// Detail line
    pub description: String,
    /// Styling
    pub kind: NotificationKind,
    /// How long it stays up
    pub ttl: Duration,
}

impl Notification {
    /// Build a notification
    #[must_use]
    pub fn new(
        kind: NotificationKind,
        title: impl Into<String>,
        description: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            kind,
            ttl,
        }
    }
}
