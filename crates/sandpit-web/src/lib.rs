//! sandpit Web - browser bindings
//!
//! Implements the playground seams on top of the DOM:
//! - [`BlobResourceStore`]: documents become `blob:` object URLs
//! - [`IframeSurface`]: a fresh sandboxed `<iframe>` per load, one window
//!   `message` listener for the lifetime of the surface
//! - [`NavigatorClipboard`] and [`AnchorDownloadSink`]
//! - [`DomConsoleView`]: the visible log panel
//! - [`DomUi`]: expiring toasts, tab panels, editor callbacks
//!
//! [`WebPlayground::mount`] wires all of them to a [`sandpit_host::Playground`].
//!
//! Everything here is compiled for `wasm32` only; native builds see an empty
//! crate.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

#[cfg(target_arch = "wasm32")]
mod clipboard;
#[cfg(target_arch = "wasm32")]
mod console_view;
#[cfg(target_arch = "wasm32")]
mod download;
#[cfg(target_arch = "wasm32")]
mod playground;
#[cfg(target_arch = "wasm32")]
mod resource;
#[cfg(target_arch = "wasm32")]
mod surface;
#[cfg(target_arch = "wasm32")]
mod ui;

#[cfg(target_arch = "wasm32")]
pub use clipboard::NavigatorClipboard;
#[cfg(target_arch = "wasm32")]
pub use console_view::DomConsoleView;
#[cfg(target_arch = "wasm32")]
pub use download::AnchorDownloadSink;
#[cfg(target_arch = "wasm32")]
pub use playground::WebPlayground;
#[cfg(target_arch = "wasm32")]
pub use resource::BlobResourceStore;
#[cfg(target_arch = "wasm32")]
pub use surface::{IframeSurface, WakeHandle};
#[cfg(target_arch = "wasm32")]
pub use ui::DomUi;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
