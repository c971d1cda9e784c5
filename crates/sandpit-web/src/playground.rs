//! Browser wiring for one playground instance

use crate::clipboard::NavigatorClipboard;
use crate::console_view::DomConsoleView;
use crate::download::AnchorDownloadSink;
use crate::resource::BlobResourceStore;
use crate::surface::IframeSurface;
use crate::ui::DomUi;
use sandpit_compose::SourceKind;
use sandpit_host::{
    HostError, HostUi, KeyChord, Playground, PlaygroundConfig, PlaygroundDeps, UiHooks,
};
use std::cell::RefCell;
use std::rc::Rc;

/// A [`Playground`] mounted into a page element.
///
/// The element receives two children: `.sandpit-preview` hosting the
/// sandboxed frame and `.sandpit-console` holding the log. Editors belong to
/// the embedding page, which forwards edits through [`WebPlayground::set_text`]
/// and receives resets and theme changes through [`UiHooks`].
#[derive(Debug, Clone)]
pub struct WebPlayground {
    inner: Rc<RefCell<Playground>>,
}

impl WebPlayground {
    /// Mount into the element with id `container_id` and (per `config`) run once.
    ///
    /// Notifications become toasts in the container; editor updates go to
    /// `hooks`.
    pub fn mount(
        container_id: &str,
        config: PlaygroundConfig,
        hooks: UiHooks,
    ) -> Result<Self, String> {
        let container = container_element(container_id)?;
        let ui = DomUi::new(container, hooks).ok_or("container is detached".to_string())?;
        Self::mount_with_ui(container_id, config, Box::new(ui))
    }

    /// Like [`WebPlayground::mount`], with the page rendering through `ui`
    pub fn mount_with_ui(
        container_id: &str,
        config: PlaygroundConfig,
        ui: Box<dyn HostUi>,
    ) -> Result<Self, String> {
        let container = container_element(container_id)?;
        let document = container
            .owner_document()
            .ok_or("container is detached".to_string())?;

        let preview = child(&document, &container, "sandpit-preview")?;
        let panel = child(&document, &container, "sandpit-console")?;

        let surface = IframeSurface::new(preview);
        let wake = surface.wake_handle();
        let view = DomConsoleView::new(panel).ok_or("console panel is detached".to_string())?;

        let deps = PlaygroundDeps::new(
            &config,
            Box::new(surface),
            Rc::new(BlobResourceStore::new()),
            Rc::new(NavigatorClipboard),
            Rc::new(AnchorDownloadSink),
            ui,
        )
        .with_console_view(Box::new(view));
        let playground = Playground::new(format!("#{container_id}"), deps, config)
            .map_err(|e| e.to_string())?;
        let inner = Rc::new(RefCell::new(playground));

        let weak = Rc::downgrade(&inner);
        wake.set(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            // busy means an action is in flight; its messages stay queued
            if let Ok(mut playground) = inner.try_borrow_mut() {
                playground.pump_diagnostics();
            }
        });

        inner.borrow_mut().mount().map_err(|e| e.to_string())?;
        Ok(Self { inner })
    }

    /// Forward an editor change
    pub fn set_text(&self, kind: SourceKind, text: &str) {
        self.inner.borrow_mut().set_text(kind, text);
    }

    /// Compose and run
    pub fn run(&self) -> Result<(), HostError> {
        self.inner.borrow_mut().run().map(|_| ())
    }

    /// Restore the template defaults
    pub fn reset(&self) {
        self.inner.borrow_mut().reset();
    }

    /// Focus another tab
    pub fn switch_tab(&self, kind: SourceKind) {
        self.inner.borrow_mut().switch_tab(kind);
    }

    /// Next editor theme
    pub fn cycle_theme(&self) -> String {
        self.inner.borrow_mut().cycle_theme()
    }

    /// Empty the console
    pub fn clear_console(&self) {
        self.inner.borrow_mut().clear_console();
    }

    /// Copy all buffers to the clipboard. The playground stays usable while
    /// the browser resolves the write.
    pub async fn copy_all(&self) -> Result<(), HostError> {
        Playground::copy_all_shared(&self.inner).await
    }

    /// Download the plain document
    pub async fn download_all(&self) -> Result<(), HostError> {
        Playground::download_all_shared(&self.inner).await.map(|_| ())
    }

    /// Dispatch a key press; returns `true` and cancels the browser default
    /// if the chord is bound
    pub fn handle_key(&self, event: &web_sys::KeyboardEvent) -> bool {
        let chord = KeyChord {
            key: event.key(),
            ctrl: event.ctrl_key(),
            meta: event.meta_key(),
            shift: event.shift_key(),
        };
        let handled = self.inner.borrow_mut().handle_key(&chord).is_some();
        if handled {
            event.prevent_default();
        }
        handled
    }

    /// The underlying controller
    #[must_use]
    pub fn playground(&self) -> Rc<RefCell<Playground>> {
        Rc::clone(&self.inner)
    }
}

fn container_element(container_id: &str) -> Result<web_sys::Element, String> {
    let window = web_sys::window().ok_or("no window".to_string())?;
    let document = window.document().ok_or("no document".to_string())?;
    document
        .get_element_by_id(container_id)
        .ok_or_else(|| format!("no element with id `{container_id}`"))
}

fn child(
    document: &web_sys::Document,
    parent: &web_sys::Element,
    class: &str,
) -> Result<web_sys::Element, String> {
    let div = document
        .create_element("div")
        .map_err(|_| "document: create_element failed".to_string())?;
    div.set_class_name(class);
    parent
        .append_child(&div)
        .map_err(|_| "container: append_child failed".to_string())?;
    Ok(div)
}
