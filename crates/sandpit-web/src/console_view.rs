use sandpit_sandbox::{ConsoleView, DiagnosticEntry};

const PLACEHOLDER_CLASS: &str = "console-placeholder";

/// Renders the console into a panel element, one `<div>` per entry
#[derive(Debug, Clone)]
pub struct DomConsoleView {
    panel: web_sys::Element,
    document: web_sys::Document,
}

impl DomConsoleView {
    /// Render into `panel`. `None` if it is not attached to a document.
    #[must_use]
    pub fn new(panel: web_sys::Element) -> Option<Self> {
        let document = panel.owner_document()?;
        Some(Self { panel, document })
    }

    fn line(&self, class: &str, text: &str) -> Option<web_sys::Element> {
        let div = self.document.create_element("div").ok()?;
        div.set_class_name(class);
        div.set_text_content(Some(text));
        Some(div)
    }
}

impl ConsoleView for DomConsoleView {
    fn entry_appended(&mut self, entry: &DiagnosticEntry, evicted: Option<&DiagnosticEntry>) {
        if let Ok(Some(placeholder)) = self
            .panel
            .query_selector(&format!(".{PLACEHOLDER_CLASS}"))
        {
            placeholder.remove();
        }
        if evicted.is_some() {
            if let Some(first) = self.panel.first_element_child() {
                first.remove();
            }
        }
        let class = format!("console-entry console-{}", entry.severity);
        if let Some(line) = self.line(&class, &entry.to_string()) {
            let _ = self.panel.append_child(&line);
        }
    }

    fn cleared(&mut self, placeholder: &str) {
        self.panel.set_text_content(None);
        if let Some(line) = self.line(PLACEHOLDER_CLASS, placeholder) {
            let _ = self.panel.append_child(&line);
        }
    }

    fn scroll_to_latest(&mut self) {
        self.panel.set_scroll_top(self.panel.scroll_height());
    }
}
