//! Best-effort removal of document wrapper tags from markup
//!
//! The markup buffer is expected to hold body-fragment content, but users
//! often paste whole documents. This strips `<!DOCTYPE…>`, `<html…>`,
//! `</html>`, `<head…>…</head>` (with everything inside it), `<body…>` and
//! `</body>` case-insensitively. It is a lossy textual heuristic, not a
//! parser: nested or malformed wrappers get whatever the pattern does.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static WRAPPER_TAGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)<html[^>]*>|</html>|<head[^>]*>[\s\S]*?</head>|<body[^>]*>|</body>|<!DOCTYPE[^>]*>",
    )
    .expect("wrapper pattern is valid")
});

/// Remove document wrapper tags from `markup`.
///
/// Borrows the input when nothing matched.
#[must_use]
pub fn strip_wrappers(markup: &str) -> Cow<'_, str> {
    WRAPPER_TAGS.replace_all(markup, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_full_document_shell() {
        let doc = "<!DOCTYPE html>\n<html lang=\"en\">\n<head><title>x</title></head>\n<body class=\"a\">\n<h1>Hi</h1>\n</body>\n</html>";
        let stripped = strip_wrappers(doc);
        assert_eq!(stripped.trim(), "<h1>Hi</h1>");
    }

    #[test]
    fn is_case_insensitive() {
        let stripped = strip_wrappers("<HTML><BODY><p>x</p></BODY></HTML>");
        assert_eq!(stripped, "<p>x</p>");
    }

    #[test]
    fn fragment_is_borrowed_unchanged() {
        let fragment = "<h1>Hi</h1><p>there</p>";
        let stripped = strip_wrappers(fragment);
        assert!(matches!(stripped, Cow::Borrowed(_)));
        assert_eq!(stripped, fragment);
    }

    #[test]
    fn unterminated_head_is_left_in_place() {
        // no closing tag, so the lazy head pattern cannot match
        let stripped = strip_wrappers("<head><title>t</title><p>x</p>");
        assert_eq!(stripped, "<head><title>t</title><p>x</p>");
    }

    #[test]
    fn head_content_is_dropped_with_the_tag() {
        let stripped = strip_wrappers("<head><style>p{}</style></head><p>x</p>");
        assert_eq!(stripped, "<p>x</p>");
    }
}
