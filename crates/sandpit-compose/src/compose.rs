//! Document composition
//!
//! Both modes share the same skeleton: style verbatim inside `<style>`,
//! wrapper-stripped markup verbatim in the body. They differ only in the
//! script block:
//!
//! ```text
//! Preview:  <script> console bridge + try { user script } catch → banner </script>
//! Download: <script> user script </script>
//! ```
//!
//! The console bridge saves `console.log/error/warn/info`, calls the saved
//! original first, then posts `{type: 'console', level, message}` to
//! `window.parent` addressed to any origin.

use crate::strip::strip_wrappers;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Content type every composed document is materialized with
pub const HTML_CONTENT_TYPE: &str = "text/html";

const PREVIEW_TITLE: &str = "Code Preview";
const DOWNLOAD_TITLE: &str = "My Code";

const CONSOLE_BRIDGE: &str = r"(function () {
    var originalConsole = {
        log: console.log,
        error: console.error,
        warn: console.warn,
        info: console.info
    };

    function sendToParent(level, args) {
        if (window.parent && window.parent.postMessage) {
            window.parent.postMessage({
                type: 'console',
                level: level,
                message: args.map(function (arg) { return String(arg); }).join(' ')
            }, '*');
        }
    }

    ['log', 'error', 'warn', 'info'].forEach(function (level) {
        console[level] = function () {
            var args = Array.prototype.slice.call(arguments);
            originalConsole[level].apply(console, args);
            sendToParent(level, args);
        };
    });
})();
";

const GUARD_OPEN: &str = "try {\n";

const GUARD_CLOSE: &str = r"
} catch (error) {
    console.error('JavaScript Error:', error);
    var sandpitBanner = document.createElement('div');
    sandpitBanner.setAttribute('style', 'background: #ff4444; color: white; padding: 10px; margin: 10px; border-radius: 4px;');
    sandpitBanner.textContent = 'JavaScript Error: ' + (error && error.message !== undefined ? error.message : String(error));
    document.body.appendChild(sandpitBanner);
}";

/// Which script block to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositionMode {
    /// Instrumented document loaded into the sandbox
    Preview,
    /// Plain standalone document offered for download
    Download,
}

impl CompositionMode {
    fn title(self) -> &'static str {
        match self {
            CompositionMode::Preview => PREVIEW_TITLE,
            CompositionMode::Download => DOWNLOAD_TITLE,
        }
    }
}

/// Borrowed view of the three buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sources<'a> {
    /// Markup buffer (wrappers are stripped during composition)
    pub markup: &'a str,
    /// Style buffer
    pub style: &'a str,
    /// Script buffer
    pub script: &'a str,
}

impl<'a> Sources<'a> {
    /// Bundle three buffer texts
    #[inline]
    #[must_use]
    pub fn new(markup: &'a str, style: &'a str, script: &'a str) -> Self {
        Self {
            markup,
            style,
            script,
        }
    }
}

/// A freshly composed, self-contained HTML document.
///
/// Never cached: every run or download composes a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedDocument {
    text: String,
    mode: CompositionMode,
}

impl ComposedDocument {
    /// Document text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Mode the document was composed in
    #[inline]
    #[must_use]
    pub fn mode(&self) -> CompositionMode {
        self.mode
    }

    /// Content type to materialize the document with
    #[inline]
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        HTML_CONTENT_TYPE
    }

    /// UTF-8 bytes of the document
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// Consume into the document text
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for ComposedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Compose the three sources into one document.
#[must_use]
pub fn compose(sources: &Sources<'_>, mode: CompositionMode) -> ComposedDocument {
    let markup = strip_wrappers(sources.markup);

    let mut text = String::with_capacity(
        sources.style.len()
            + markup.len()
            + sources.script.len()
            + CONSOLE_BRIDGE.len()
            + GUARD_CLOSE.len()
            + 512,
    );

    text.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    text.push_str("    <meta charset=\"UTF-8\">\n");
    text.push_str(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    text.push_str("    <title>");
    text.push_str(mode.title());
    text.push_str("</title>\n    <style>\n");
    text.push_str(sources.style);
    text.push_str("\n    </style>\n</head>\n<body>\n");
    text.push_str(&markup);
    text.push_str("\n    <script>\n");
    match mode {
        CompositionMode::Preview => {
            text.push_str(CONSOLE_BRIDGE);
            text.push_str(GUARD_OPEN);
            text.push_str(sources.script);
            text.push_str(GUARD_CLOSE);
        }
        CompositionMode::Download => text.push_str(sources.script),
    }
    text.push_str("\n    </script>\n</body>\n</html>");

    tracing::trace!(mode = ?mode, bytes = text.len(), "composed document");

    ComposedDocument { text, mode }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Sources<'static> {
        Sources::new("<h1>Hi</h1>", "h1{color:red}", "console.log('x')")
    }

    #[test]
    fn download_document_is_plain() {
        let doc = compose(&sample(), CompositionMode::Download);
        assert_eq!(
            doc.as_str(),
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n    <meta charset=\"UTF-8\">\n    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n    <title>My Code</title>\n    <style>\nh1{color:red}\n    </style>\n</head>\n<body>\n<h1>Hi</h1>\n    <script>\nconsole.log('x')\n    </script>\n</body>\n</html>"
        );
    }

    #[test]
    fn preview_document_bridges_console_and_guards_script() {
        let doc = compose(&sample(), CompositionMode::Preview);
        let text = doc.as_str();
        assert!(text.contains("<title>Code Preview</title>"));
        assert!(text.contains("window.parent.postMessage"));
        assert!(text.contains("type: 'console'"));
        assert!(text.contains("}, '*');"));
        assert!(text.contains("try {\nconsole.log('x')\n} catch (error) {"));
        assert!(text.contains("'JavaScript Error: '"));
    }

    #[test]
    fn bridge_precedes_user_script() {
        let doc = compose(&sample(), CompositionMode::Preview);
        let bridge = doc.as_str().find("originalConsole").unwrap();
        let user = doc.as_str().find("console.log('x')").unwrap();
        assert!(bridge < user);
    }

    #[test]
    fn modes_share_style_and_markup() {
        let preview = compose(&sample(), CompositionMode::Preview);
        let download = compose(&sample(), CompositionMode::Download);
        let head = |d: &ComposedDocument| {
            let s = d.as_str();
            let start = s.find("<style>").unwrap();
            let end = s.find("<script>").unwrap();
            s[start..end].to_string()
        };
        assert_eq!(head(&preview), head(&download));
    }

    #[test]
    fn wrapped_markup_is_stripped_before_embedding() {
        let sources = Sources::new("<html><body><p>x</p></body></html>", "", "");
        let doc = compose(&sources, CompositionMode::Download);
        assert_eq!(doc.as_str().matches("<body>").count(), 1);
        assert!(doc.as_str().contains("<body>\n<p>x</p>\n"));
    }

    #[test]
    fn content_type_is_html() {
        let doc = compose(&sample(), CompositionMode::Preview);
        assert_eq!(doc.content_type(), "text/html");
        assert_eq!(doc.mode(), CompositionMode::Preview);
    }
}
