//! Sandboxed iframe surface
//!
//! Each load replaces the previous `<iframe>` with a fresh one, so the old
//! context is gone along with its timers and listeners. A single window
//! `message` listener is registered on first load and removed when the
//! surface is dropped; it only forwards messages whose `source` is the
//! current frame's window.

use sandpit_sandbox::{ContextPort, ResourceUrl, SandboxError, SandboxPolicy, SandboxSurface};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

type Wake = Rc<dyn Fn()>;

/// Callback run after every forwarded message, typically a console pump
#[derive(Clone, Default)]
pub struct WakeHandle(Rc<RefCell<Option<Wake>>>);

impl WakeHandle {
    /// Install `wake`, replacing any previous callback
    pub fn set(&self, wake: impl Fn() + 'static) {
        *self.0.borrow_mut() = Some(Rc::new(wake));
    }

    fn fire(&self) {
        // clone out so the callback may replace itself
        let wake = self.0.borrow().clone();
        if let Some(wake) = wake {
            wake();
        }
    }
}

impl fmt::Debug for WakeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WakeHandle")
            .field(&self.0.borrow().is_some())
            .finish()
    }
}

struct ActiveContext {
    window: JsValue,
    port: ContextPort,
}

/// Loads documents into sandboxed iframes inside `host`
pub struct IframeSurface {
    host: web_sys::Element,
    frame: Option<web_sys::HtmlIFrameElement>,
    active: Rc<RefCell<Option<ActiveContext>>>,
    wake: WakeHandle,
    listener: Option<Closure<dyn FnMut(web_sys::MessageEvent)>>,
}

impl IframeSurface {
    /// Frames are appended to `host`
    #[must_use]
    pub fn new(host: web_sys::Element) -> Self {
        Self {
            host,
            frame: None,
            active: Rc::new(RefCell::new(None)),
            wake: WakeHandle::default(),
            listener: None,
        }
    }

    /// Handle for installing the post-message callback
    #[must_use]
    pub fn wake_handle(&self) -> WakeHandle {
        self.wake.clone()
    }

    fn ensure_listener(&mut self) -> Result<(), SandboxError> {
        if self.listener.is_some() {
            return Ok(());
        }
        let window = web_sys::window().ok_or_else(|| SandboxError::Load("no window".to_string()))?;

        let active = Rc::clone(&self.active);
        let wake = self.wake.clone();
        let listener = Closure::wrap(Box::new(move |event: web_sys::MessageEvent| {
            let port = {
                let active = active.borrow();
                let Some(context) = active.as_ref() else {
                    return;
                };
                let from_current = event
                    .source()
                    .is_some_and(|source| JsValue::from(source) == context.window);
                if !from_current {
                    return;
                }
                context.port.clone()
            };
            match to_json(&event.data()) {
                Some(payload) => {
                    port.post(payload);
                    wake.fire();
                }
                None => tracing::debug!("dropping message that is not JSON"),
            }
        }) as Box<dyn FnMut(_)>);

        window
            .add_event_listener_with_callback("message", listener.as_ref().unchecked_ref())
            .map_err(|_| SandboxError::Load("window: add_event_listener failed".to_string()))?;
        tracing::debug!("registered window message listener");
        self.listener = Some(listener);
        Ok(())
    }

    fn remove_frame(&mut self) {
        if let Some(frame) = self.frame.take() {
            frame.remove();
        }
        *self.active.borrow_mut() = None;
    }
}

fn to_json(data: &JsValue) -> Option<serde_json::Value> {
    let text = String::from(js_sys::JSON::stringify(data).ok()?);
    serde_json::from_str(&text).ok()
}

impl SandboxSurface for IframeSurface {
    fn load(
        &mut self,
        url: &ResourceUrl,
        policy: &SandboxPolicy,
        port: ContextPort,
    ) -> Result<(), SandboxError> {
        self.ensure_listener()?;
        self.remove_frame();

        let document = self
            .host
            .owner_document()
            .ok_or_else(|| SandboxError::Load("host is detached".to_string()))?;
        let frame = document
            .create_element("iframe")
            .map_err(|_| SandboxError::Load("document: create_element failed".to_string()))?
            .dyn_into::<web_sys::HtmlIFrameElement>()
            .map_err(|_| SandboxError::Load("document: iframe cast failed".to_string()))?;

        frame
            .set_attribute("sandbox", &policy.sandbox_attribute())
            .map_err(|_| SandboxError::Load("iframe: set sandbox failed".to_string()))?;
        let _ = frame.set_attribute("style", "width: 100%; height: 100%; border: none;");
        frame.set_src(url.as_str());

        self.host
            .append_child(&frame)
            .map_err(|_| SandboxError::Load("host: append_child failed".to_string()))?;
        let window = frame
            .content_window()
            .ok_or_else(|| SandboxError::Load("iframe has no content window".to_string()))?;

        *self.active.borrow_mut() = Some(ActiveContext {
            window: window.into(),
            port,
        });
        self.frame = Some(frame);
        Ok(())
    }

    fn unload(&mut self) {
        self.remove_frame();
    }
}

impl Drop for IframeSurface {
    fn drop(&mut self) {
        self.remove_frame();
        if let (Some(listener), Some(window)) = (self.listener.take(), web_sys::window()) {
            let _ = window
                .remove_event_listener_with_callback("message", listener.as_ref().unchecked_ref());
        }
    }
}

impl fmt::Debug for IframeSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IframeSurface")
            .field("loaded", &self.frame.is_some())
            .field("listening", &self.listener.is_some())
            .finish_non_exhaustive()
    }
}
