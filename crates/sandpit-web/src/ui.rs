//! Page-side rendering
//!
//! Editors belong to the embedding page and are reached through
//! [`UiHooks`]. Toasts and tab visibility are handled here: toasts go into a
//! `.sandpit-toasts` stack and are removed after their `ttl`; tab panels are
//! the container's `[data-tab]` elements and get the `active` class.

use sandpit_compose::SourceKind;
use sandpit_host::{HostUi, Notification, NotificationKind, UiHooks};
use std::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

const TOAST_STACK_CLASS: &str = "sandpit-toasts";

/// [`HostUi`] for a playground mounted into a page element
#[derive(Debug, Clone)]
pub struct DomUi {
    container: web_sys::Element,
    document: web_sys::Document,
    hooks: UiHooks,
    toasts: Option<web_sys::Element>,
}

impl DomUi {
    /// Render into `container`, forwarding editor calls to `hooks`.
    /// `None` if the container is not attached to a document.
    #[must_use]
    pub fn new(container: web_sys::Element, hooks: UiHooks) -> Option<Self> {
        let document = container.owner_document()?;
        Some(Self {
            container,
            document,
            hooks,
            toasts: None,
        })
    }

    fn toast(&self, notification: &Notification) -> Option<web_sys::Element> {
        let toast = self.document.create_element("div").ok()?;
        toast.set_class_name(&format!("sandpit-toast toast-{}", kind_class(notification.kind)));

        let title = self.document.create_element("strong").ok()?;
        title.set_text_content(Some(&notification.title));
        let description = self.document.create_element("div").ok()?;
        description.set_text_content(Some(&notification.description));

        toast.append_child(&title).ok()?;
        toast.append_child(&description).ok()?;
        Some(toast)
    }
}

fn kind_class(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Info => "info",
        NotificationKind::Success => "success",
        NotificationKind::Error => "error",
    }
}

fn millis(delay: Duration) -> i32 {
    i32::try_from(delay.as_millis()).unwrap_or(i32::MAX)
}

/// Run `callback` once after `delay`; `false` if no timer could be set
fn after(delay: Duration, callback: impl FnOnce() + 'static) -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    let callback = Closure::once_into_js(callback);
    window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            millis(delay),
        )
        .is_ok()
}

impl HostUi for DomUi {
    fn mount(&mut self, container: &str) {
        if self.toasts.is_some() {
            return;
        }
        let Ok(stack) = self.document.create_element("div") else {
            tracing::warn!(container, "could not create the toast stack");
            return;
        };
        stack.set_class_name(TOAST_STACK_CLASS);
        if self.container.append_child(&stack).is_ok() {
            self.toasts = Some(stack);
        }
        self.hooks.mount(container);
    }

    fn set_editor_text(&mut self, kind: SourceKind, text: &str) {
        self.hooks.set_editor_text(kind, text);
    }

    fn set_editor_theme(&mut self, kind: SourceKind, theme: &str) {
        self.hooks.set_editor_theme(kind, theme);
    }

    fn show_tab(&mut self, kind: SourceKind) {
        if let Ok(panels) = self.container.query_selector_all("[data-tab]") {
            for i in 0..panels.length() {
                let Some(panel) = panels
                    .get(i)
                    .and_then(|node| node.dyn_into::<web_sys::Element>().ok())
                else {
                    continue;
                };
                let active = panel.get_attribute("data-tab").as_deref() == Some(kind.tab_id());
                let _ = panel.class_list().toggle_with_force("active", active);
            }
        }
        self.hooks.show_tab(kind);
    }

    fn request_layout(&mut self, kind: SourceKind, delay: Duration) {
        let hooks = self.hooks.clone();
        if !after(delay, move || hooks.relayout(kind)) {
            self.hooks.relayout(kind);
        }
    }

    fn notify(&mut self, notification: Notification) {
        let shown = match (&self.toasts, self.toast(&notification)) {
            (Some(stack), Some(toast)) if stack.append_child(&toast).is_ok() => {
                after(notification.ttl, move || toast.remove());
                true
            }
            _ => false,
        };
        if self.hooks.handles_notifications() || !shown {
            self.hooks.notify(notification);
        }
    }
}
