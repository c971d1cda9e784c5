//! sandpit Compose - source kinds, baseline templates and document composition
//!
//! Turns the three playground buffers (markup, style, script) into one
//! self-contained HTML document:
//! - **Preview** documents wrap the script so `console.*` calls are forwarded
//!   to the hosting context and uncaught failures render an error banner
//! - **Download** documents embed the raw script with no wrapper
//!
//! Composition is pure and total: identical inputs always produce identical
//! text, and every input (including malformed markup) produces a document.
//!
//! # Example
//!
//! ```rust
//! use sandpit_compose::{compose, CompositionMode, Sources};
//!
//! let sources = Sources::new("<h1>Hi</h1>", "h1{color:red}", "console.log('x')");
//! let doc = compose(&sources, CompositionMode::Download);
//! assert!(doc.as_str().contains("<h1>Hi</h1>"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod compose;
pub mod kind;
pub mod strip;
pub mod templates;

pub use compose::{compose, ComposedDocument, CompositionMode, Sources, HTML_CONTENT_TYPE};
pub use kind::{ParseKindError, SourceKind};
pub use strip::strip_wrappers;
pub use templates::TemplateStore;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
