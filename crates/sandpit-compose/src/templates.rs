//! Baseline snippets used for the initial load and for reset

use crate::kind::SourceKind;
use std::borrow::Cow;

const DEFAULT_MARKUP: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Code Preview</title>
</head>
<body>
    <h1>Hello World!</h1>
    <p>Edit the code and click Run to see changes.</p>
</body>
</html>"#;

const DEFAULT_STYLE: &str = r"body {
    font-family: Arial, sans-serif;
    margin: 20px;
    background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
    color: white;
    min-height: 100vh;
}

h1 {
    color: #fff;
    text-align: center;
    margin-bottom: 20px;
}

p {
    font-size: 18px;
    line-height: 1.6;
    text-align: center;
}";

const DEFAULT_SCRIPT: &str = r"// Try some JavaScript!
console.log('Hello from the IDE!');

// Add interactivity
document.addEventListener('DOMContentLoaded', function() {
    const h1 = document.querySelector('h1');
    if (h1) {
        h1.addEventListener('click', function() {
            this.style.transform = this.style.transform === 'scale(1.1)' ? 'scale(1)' : 'scale(1.1)';
            this.style.transition = 'transform 0.3s ease';
        });
    }
});";

/// Fixed baseline snippets, one per [`SourceKind`].
///
/// Immutable once built. `TemplateStore::default()` carries the stock
/// "Hello World!" example; [`TemplateStore::new`] lets an embedder supply
/// its own baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateStore {
    snippets: [Cow<'static, str>; 3],
}

impl TemplateStore {
    /// Build a store from custom snippets
    #[must_use]
    pub fn new(
        markup: impl Into<Cow<'static, str>>,
        style: impl Into<Cow<'static, str>>,
        script: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            snippets: [markup.into(), style.into(), script.into()],
        }
    }

    /// Baseline snippet for `kind`
    #[inline]
    #[must_use]
    pub fn get_default(&self, kind: SourceKind) -> &str {
        &self.snippets[kind.index()]
    }
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::new(DEFAULT_MARKUP, DEFAULT_STYLE, DEFAULT_SCRIPT)
    }
}
