//! The three source buffers and the active tab

use sandpit_compose::{SourceKind, Sources, TemplateStore};

/// One editable text per [`SourceKind`], plus which one is focused.
///
/// Text is overwritten unconditionally; malformed markup or script is the
/// sandbox's problem, not this layer's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBuffers {
    texts: [String; 3],
    dirty: [bool; 3],
    active: SourceKind,
}

impl SourceBuffers {
    /// Buffers seeded from `templates`, clean, markup active
    #[must_use]
    pub fn from_templates(templates: &TemplateStore) -> Self {
        Self {
            texts: SourceKind::ALL.map(|kind| templates.get_default(kind).to_string()),
            dirty: [false; 3],
            active: SourceKind::default(),
        }
    }

    /// Overwrite one buffer and mark it dirty
    pub fn set_text(&mut self, kind: SourceKind, text: impl Into<String>) {
        self.texts[kind.index()] = text.into();
        self.dirty[kind.index()] = true;
    }

    /// Current text of one buffer
    #[inline]
    #[must_use]
    pub fn text(&self, kind: SourceKind) -> &str {
        &self.texts[kind.index()]
    }

    /// Overwrite all three with the template defaults
    pub fn reset(&mut self, templates: &TemplateStore) {
        for kind in SourceKind::ALL {
            self.set_text(kind, templates.get_default(kind));
        }
    }

    /// Edited since the last run
    #[inline]
    #[must_use]
    pub fn is_dirty(&self, kind: SourceKind) -> bool {
        self.dirty[kind.index()]
    }

    /// Any buffer edited since the last run
    #[must_use]
    pub fn any_dirty(&self) -> bool {
        self.dirty.iter().any(|d| *d)
    }

    /// Forget pending edits (a run consumed them)
    pub fn mark_clean(&mut self) {
        self.dirty = [false; 3];
    }

    /// Focused buffer
    #[inline]
    #[must_use]
    pub fn active(&self) -> SourceKind {
        self.active
    }

    /// Focus another buffer
    pub fn set_active(&mut self, kind: SourceKind) {
        self.active = kind;
    }

    /// Borrow all three for composition
    #[must_use]
    pub fn sources(&self) -> Sources<'_> {
        Sources::new(
            self.text(SourceKind::Markup),
            self.text(SourceKind::Style),
            self.text(SourceKind::Script),
        )
    }

    /// Labeled plain-text serialization used for the clipboard
    #[must_use]
    pub fn clipboard_text(&self) -> String {
        SourceKind::ALL
            .iter()
            .map(|kind| format!("{}:\n{}", kind.label(), self.text(*kind)))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Default for SourceBuffers {
    fn default() -> Self {
        Self::from_templates(&TemplateStore::default())
    }
}
