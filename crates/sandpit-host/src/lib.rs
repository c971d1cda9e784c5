//! sandpit Host - the playground controller
//!
//! Owns the three source buffers and wires every user action to the
//! composer, the sandbox runner, the diagnostics console and the page:
//! - mount, run, reset, tab switching and theme cycling
//! - copy-all to the clipboard and download-all as a file
//! - keyboard shortcuts and transient notifications
//!
//! # Example
//!
//! ```rust,ignore
//! use sandpit_host::prelude::*;
//!
//! let config = PlaygroundConfig::new();
//! let deps = PlaygroundDeps::new(&config, surface, store, clipboard, files, Box::new(HeadlessUi));
//! let mut playground = Playground::new("#ide", deps, config)?;
//! playground.mount()?;
//! playground.set_text(SourceKind::Script, "console.log('x')");
//! playground.run()?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod buffer;
pub mod config;
pub mod controller;
pub mod error;
pub mod io;
pub mod notify;
pub mod shortcuts;
pub mod theme;
pub mod ui;

pub use buffer::SourceBuffers;
pub use config::{PlaygroundConfig, DEFAULT_DOWNLOAD_FILENAME};
pub use controller::{PendingCopy, PendingDownload, Playground, PlaygroundDeps};
pub use error::{ConfigError, HostError, IoError};
pub use io::{Clipboard, DownloadArtifact, FileSink};
#[cfg(not(target_arch = "wasm32"))]
pub use io::{FsFileSink, StdoutClipboard};
pub use notify::{Notification, NotificationKind};
pub use shortcuts::{KeyChord, Shortcut};
pub use theme::{ThemeState, DEFAULT_THEMES};
pub use ui::{HeadlessUi, HostUi, UiHooks};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for embedding a playground
    pub use crate::{
        Clipboard, FileSink, HeadlessUi, HostUi, Playground, PlaygroundConfig, PlaygroundDeps,
        UiHooks,
    };
    pub use sandpit_compose::SourceKind;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
