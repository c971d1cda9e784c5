//! sandpit Sandbox - isolated runs and the diagnostics relay
//!
//! Loads composed documents into an isolated rendering surface and routes
//! the `console.*` messages they post back into a bounded console.
//!
//! # Architecture
//!
//! ```text
//! ComposedDocument → ResourceStore (lease) → SandboxSurface ──load──▶ isolated context
//!                                                                        │ ContextPort (generation-tagged)
//! DiagnosticsConsole ◀── route (drop stale generations) ◀── channel ◀────┘
//! ```
//!
//! Every run issues a new [`Generation`]; messages stamped with an older one
//! are discarded, and the previous run's resource lease is revoked as soon as
//! the new one is installed.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod console;
pub mod error;
pub mod message;
pub mod phase;
pub mod resource;
pub mod runner;
pub mod surface;

pub use console::{ClearReason, ConsoleView, DiagnosticEntry, DiagnosticsConsole, DEFAULT_CAPACITY};
pub use error::SandboxError;
pub use message::{decode, ConsoleMessage, ContextPort, Decoded, Envelope, Generation, Severity};
pub use phase::{allowed_transitions, validate_transition, RunPhase};
pub use resource::{InMemoryResourceStore, ResourceLease, ResourceStore, ResourceUrl, StoredResource};
pub use runner::{PumpReport, Routed, SandboxRunner, RUNNING_MESSAGE};
pub use surface::{SandboxPolicy, SandboxSurface};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving a sandbox
    pub use crate::console::{ClearReason, DiagnosticEntry, DiagnosticsConsole};
    pub use crate::message::{ContextPort, Generation, Severity};
    pub use crate::resource::{InMemoryResourceStore, ResourceStore};
    pub use crate::runner::SandboxRunner;
    pub use crate::surface::{SandboxPolicy, SandboxSurface};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
