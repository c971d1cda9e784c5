//! Bounded diagnostics console
//!
//! Append-only FIFO ring: once `capacity` entries are held, each append
//! evicts the oldest. An empty console shows one placeholder line whose
//! text says why it is empty.

use crate::message::Severity;
use chrono::{DateTime, Local, Utc};
use std::collections::VecDeque;
use std::fmt;

/// Entries kept before the oldest is evicted
pub const DEFAULT_CAPACITY: usize = 50;

/// One console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticEntry {
    /// When the host received it
    pub timestamp: DateTime<Utc>,
    /// Console primitive that produced it
    pub severity: Severity,
    /// Rendered text
    pub text: String,
}

impl DiagnosticEntry {
    /// Entry stamped with the current time
    #[must_use]
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self::at(Utc::now(), severity, text)
    }

    /// Entry with an explicit timestamp
    #[must_use]
    pub fn at(timestamp: DateTime<Utc>, severity: Severity, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            severity,
            text: text.into(),
        }
    }

    /// Local wall-clock time, `HH:MM:SS`
    #[must_use]
    pub fn time_label(&self) -> String {
        self.timestamp
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string()
    }
}

impl fmt::Display for DiagnosticEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {:<5} {}", self.time_label(), self.severity, self.text)
    }
}

/// Why the console was emptied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClearReason {
    /// Freshly created
    Initial,
    /// The user pressed clear
    User,
    /// Automatically, ahead of a run
    BeforeRun,
}

impl ClearReason {
    /// Placeholder shown while the console is empty
    #[must_use]
    pub fn placeholder(self) -> &'static str {
        match self {
            ClearReason::Initial => "Console output will appear here...",
            ClearReason::User => "Console cleared...",
            ClearReason::BeforeRun => "Preparing run...",
        }
    }
}

/// Rendering side of the console (the visible log panel)
pub trait ConsoleView {
    /// A line was added; `evicted` is the line that fell off the top, if any
    fn entry_appended(&mut self, entry: &DiagnosticEntry, evicted: Option<&DiagnosticEntry>);

    /// The log was emptied and now shows `placeholder`
    fn cleared(&mut self, placeholder: &str);

    /// Scroll so the newest line is visible
    fn scroll_to_latest(&mut self);
}

/// The bounded diagnostic log
pub struct DiagnosticsConsole {
    entries: VecDeque<DiagnosticEntry>,
    capacity: usize,
    placeholder: &'static str,
    view: Option<Box<dyn ConsoleView>>,
}

impl DiagnosticsConsole {
    /// Empty console holding at most `capacity` entries (at least one)
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            placeholder: ClearReason::Initial.placeholder(),
            view: None,
        }
    }

    /// Attach a view
    #[must_use]
    pub fn with_view(mut self, view: Box<dyn ConsoleView>) -> Self {
        self.set_view(view);
        self
    }

    /// Attach or replace the view; it is brought up to date immediately
    pub fn set_view(&mut self, mut view: Box<dyn ConsoleView>) {
        view.cleared(self.placeholder);
        for entry in &self.entries {
            view.entry_appended(entry, None);
        }
        view.scroll_to_latest();
        self.view = Some(view);
    }

    /// Append at the tail, evicting the head when full
    pub fn append(&mut self, entry: DiagnosticEntry) -> Option<DiagnosticEntry> {
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        if let Some(view) = self.view.as_mut() {
            view.entry_appended(&entry, evicted.as_ref());
            view.scroll_to_latest();
        }
        self.entries.push_back(entry);
        evicted
    }

    /// Append a line stamped with the current time
    pub fn log(&mut self, severity: Severity, text: impl Into<String>) {
        self.append(DiagnosticEntry::new(severity, text));
    }

    /// Empty the log and show the placeholder for `reason`
    pub fn clear(&mut self, reason: ClearReason) {
        self.entries.clear();
        self.placeholder = reason.placeholder();
        if let Some(view) = self.view.as_mut() {
            view.cleared(self.placeholder);
        }
    }

    /// Entries oldest first
    pub fn entries(&self) -> impl ExactSizeIterator<Item = &DiagnosticEntry> + '_ {
        self.entries.iter()
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are held
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum entries held
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Placeholder line, shown only while empty
    #[must_use]
    pub fn placeholder(&self) -> Option<&'static str> {
        self.entries.is_empty().then_some(self.placeholder)
    }

    /// Visible lines: the placeholder when empty, otherwise one per entry
    #[must_use]
    pub fn render_lines(&self) -> Vec<String> {
        match self.placeholder() {
            Some(placeholder) => vec![placeholder.to_string()],
            None => self.entries.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Default for DiagnosticsConsole {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl fmt::Debug for DiagnosticsConsole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticsConsole")
            .field("entries", &self.entries)
            .field("capacity", &self.capacity)
            .field("placeholder", &self.placeholder)
            .field("has_view", &self.view.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(console: &DiagnosticsConsole) -> Vec<String> {
        console.entries().map(|e| e.text.clone()).collect()
    }

    #[test]
    fn fifty_first_append_evicts_the_first() {
        let mut console = DiagnosticsConsole::default();
        for i in 1..=51 {
            console.log(Severity::Log, format!("line {i}"));
        }
        assert_eq!(console.len(), 50);
        let expected: Vec<String> = (2..=51).map(|i| format!("line {i}")).collect();
        assert_eq!(texts(&console), expected);
    }

    #[test]
    fn append_reports_evicted_entry() {
        let mut console = DiagnosticsConsole::new(1);
        assert!(console.append(DiagnosticEntry::new(Severity::Info, "a")).is_none());
        let evicted = console.append(DiagnosticEntry::new(Severity::Info, "b")).unwrap();
        assert_eq!(evicted.text, "a");
    }

    #[test]
    fn placeholder_tracks_clear_reason() {
        let mut console = DiagnosticsConsole::default();
        assert_eq!(console.placeholder(), Some("Console output will appear here..."));
        console.log(Severity::Log, "x");
        assert_eq!(console.placeholder(), None);
        console.clear(ClearReason::User);
        assert_eq!(console.render_lines(), vec!["Console cleared...".to_string()]);
        console.clear(ClearReason::BeforeRun);
        assert_eq!(console.placeholder(), Some("Preparing run..."));
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let console = DiagnosticsConsole::new(0);
        assert_eq!(console.capacity(), 1);
    }

    #[test]
    fn display_includes_severity_and_text() {
        let entry = DiagnosticEntry::new(Severity::Warn, "careful");
        let line = entry.to_string();
        assert!(line.contains("warn"));
        assert!(line.ends_with("careful"));
    }
}
