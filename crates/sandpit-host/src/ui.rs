//! Host UI seam
//!
//! The controller never touches widgets directly; it tells a [`HostUi`] what
//! changed. Editors embedded in hidden tab panels may have a stale or
//! zero-sized layout, so every tab switch asks for a layout refresh.

use crate::notify::Notification;
use sandpit_compose::SourceKind;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Everything the controller needs from the page
pub trait HostUi {
    /// Render the playground skeleton into `container`
    fn mount(&mut self, container: &str);

    /// Replace an editor's contents
    fn set_editor_text(&mut self, kind: SourceKind, text: &str);

    /// Apply a theme to one editor
    fn set_editor_theme(&mut self, kind: SourceKind, theme: &str);

    /// Show one tab panel and hide the others
    fn show_tab(&mut self, kind: SourceKind);

    /// Re-measure an editor after `delay`
    fn request_layout(&mut self, kind: SourceKind, delay: Duration);

    /// Show a transient notification
    fn notify(&mut self, notification: Notification);
}

/// A UI that renders nothing, for headless hosts
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessUi;

impl HostUi for HeadlessUi {
    fn mount(&mut self, _container: &str) {}

    fn set_editor_text(&mut self, _kind: SourceKind, _text: &str) {}

    fn set_editor_theme(&mut self, _kind: SourceKind, _theme: &str) {}

    fn show_tab(&mut self, _kind: SourceKind) {}

    fn request_layout(&mut self, _kind: SourceKind, _delay: Duration) {}

    fn notify(&mut self, notification: Notification) {
        tracing::info!(
            kind = ?notification.kind,
            title = %notification.title,
            "{}",
            notification.description
        );
    }
}

type EditorHook = Rc<dyn Fn(SourceKind, &str)>;
type KindHook = Rc<dyn Fn(SourceKind)>;
type NotifyHook = Rc<dyn Fn(&Notification)>;

/// A [`HostUi`] that forwards to callbacks registered by the page.
///
/// Unregistered callbacks are skipped; notifications without a callback
/// are logged like [`HeadlessUi`] does. Layout requests are forwarded at
/// once, so a host that wants the delay schedules [`UiHooks::relayout`]
/// itself.
#[derive(Clone, Default)]
pub struct UiHooks {
    editor_text: Option<EditorHook>,
    editor_theme: Option<EditorHook>,
    show_tab: Option<KindHook>,
    relayout: Option<KindHook>,
    notify: Option<NotifyHook>,
}

impl UiHooks {
    /// No callbacks
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Called when an editor's contents are replaced (mount, reset)
    #[must_use]
    pub fn on_editor_text(mut self, hook: impl Fn(SourceKind, &str) + 'static) -> Self {
        self.editor_text = Some(Rc::new(hook));
        self
    }

    /// Called when an editor gets a theme
    #[must_use]
    pub fn on_editor_theme(mut self, hook: impl Fn(SourceKind, &str) + 'static) -> Self {
        self.editor_theme = Some(Rc::new(hook));
        self
    }

    /// Called when a tab becomes visible
    #[must_use]
    pub fn on_show_tab(mut self, hook: impl Fn(SourceKind) + 'static) -> Self {
        self.show_tab = Some(Rc::new(hook));
        self
    }

    /// Called when an editor should be re-measured
    #[must_use]
    pub fn on_relayout(mut self, hook: impl Fn(SourceKind) + 'static) -> Self {
        self.relayout = Some(Rc::new(hook));
        self
    }

    /// Called for every notification
    #[must_use]
    pub fn on_notify(mut self, hook: impl Fn(&Notification) + 'static) -> Self {
        self.notify = Some(Rc::new(hook));
        self
    }

    /// Run the re-measure callback now
    pub fn relayout(&self, kind: SourceKind) {
        if let Some(hook) = &self.relayout {
            hook(kind);
        }
    }

    /// Whether a notification callback is registered
    #[must_use]
    pub fn handles_notifications(&self) -> bool {
        self.notify.is_some()
    }
}

impl HostUi for UiHooks {
    fn mount(&mut self, _container: &str) {}

    fn set_editor_text(&mut self, kind: SourceKind, text: &str) {
        if let Some(hook) = &self.editor_text {
            hook(kind, text);
        }
    }

    fn set_editor_theme(&mut self, kind: SourceKind, theme: &str) {
        if let Some(hook) = &self.editor_theme {
            hook(kind, theme);
        }
    }

    fn show_tab(&mut self, kind: SourceKind) {
        if let Some(hook) = &self.show_tab {
            hook(kind);
        }
    }

    fn request_layout(&mut self, kind: SourceKind, _delay: Duration) {
        self.relayout(kind);
    }

    fn notify(&mut self, notification: Notification) {
        match &self.notify {
            Some(hook) => hook(&notification),
            None => HeadlessUi.notify(notification),
        }
    }
}

impl fmt::Debug for UiHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiHooks")
            .field("editor_text", &self.editor_text.is_some())
            .field("editor_theme", &self.editor_theme.is_some())
            .field("show_tab", &self.show_tab.is_some())
            .field("relayout", &self.relayout.is_some())
            .field("notify", &self.notify.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationKind;
    use std::cell::RefCell;

    #[test]
    fn hooks_receive_forwarded_calls() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = |tag: &'static str| {
            let seen = Rc::clone(&seen);
            move |kind: SourceKind, value: &str| {
                seen.borrow_mut().push(format!("{tag} {} {value}", kind.tab_id()));
            }
        };
        let mut ui = UiHooks::new()
            .on_editor_text(log("text"))
            .on_editor_theme(log("theme"));

        ui.set_editor_text(SourceKind::Style, "p{}");
        ui.set_editor_theme(SourceKind::Script, "vs");
        // no callbacks registered for these
        ui.show_tab(SourceKind::Markup);
        ui.request_layout(SourceKind::Markup, Duration::from_millis(100));

        assert_eq!(*seen.borrow(), vec!["text css p{}", "theme js vs"]);
    }

    #[test]
    fn notifications_reach_the_page() {
        let titles = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&titles);
        let mut ui = UiHooks::new().on_notify(move |n| sink.borrow_mut().push(n.title.clone()));
        assert!(ui.handles_notifications());

        ui.notify(Notification::new(
            NotificationKind::Success,
            "Code Reset",
            "All code has been reset to default values.",
            Duration::from_secs(5),
        ));
        assert_eq!(*titles.borrow(), vec!["Code Reset".to_string()]);
    }

    #[test]
    fn relayout_runs_immediately() {
        let count = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&count);
        let mut ui = UiHooks::new().on_relayout(move |_| *counter.borrow_mut() += 1);
        ui.request_layout(SourceKind::Script, Duration::from_millis(100));
        ui.relayout(SourceKind::Script);
        assert_eq!(*count.borrow(), 2);
    }
}
