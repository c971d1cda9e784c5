//! Composition properties
//!
//! Determinism, fragment stability and the download/preview split.

use proptest::prelude::*;
use sandpit_compose::{compose, strip_wrappers, CompositionMode, SourceKind, Sources, TemplateStore};

fn fragment_token() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("<h1>".to_string()),
        Just("</h1>".to_string()),
        Just("<p class=\"x\">".to_string()),
        Just("</p>".to_string()),
        Just("<div>".to_string()),
        Just("</div>".to_string()),
        Just("<span>".to_string()),
        "[a-zA-Z0-9 .,!?]{0,12}",
    ]
}

fn fragment() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment_token(), 0..24).prop_map(|tokens| tokens.concat())
}

proptest! {
    #[test]
    fn prop_compose_is_deterministic(
        markup in ".{0,200}",
        style in ".{0,200}",
        script in ".{0,200}",
        download in any::<bool>(),
    ) {
        let mode = if download { CompositionMode::Download } else { CompositionMode::Preview };
        let sources = Sources::new(&markup, &style, &script);
        let a = compose(&sources, mode);
        let b = compose(&sources, mode);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_fragment_markup_survives_stripping(markup in fragment()) {
        let stripped = strip_wrappers(&markup);
        prop_assert_eq!(&*stripped, markup.as_str());
    }

    #[test]
    fn prop_download_never_carries_the_bridge(markup in fragment(), script in "[a-z();' ]{0,40}") {
        let sources = Sources::new(&markup, "", &script);
        let doc = compose(&sources, CompositionMode::Download);
        prop_assert!(!doc.as_str().contains("postMessage"));
        prop_assert!(!doc.as_str().contains("originalConsole"));
    }
}

#[test]
fn download_of_defaults_contains_greeting_without_bridge() {
    let store = TemplateStore::default();
    let sources = Sources::new(
        store.get_default(SourceKind::Markup),
        store.get_default(SourceKind::Style),
        store.get_default(SourceKind::Script),
    );
    let doc = compose(&sources, CompositionMode::Download);
    assert!(doc.as_str().contains("<h1>Hello World!</h1>"));
    assert!(!doc.as_str().contains("postMessage"));
    assert!(doc.as_str().contains("console.log('Hello from the IDE!');"));
    // the default markup's own shell is gone, leaving exactly one of each wrapper
    assert_eq!(doc.as_str().matches("<!DOCTYPE html>").count(), 1);
    assert_eq!(doc.as_str().matches("<title>").count(), 1);
}
