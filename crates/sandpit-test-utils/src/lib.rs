//! Testing utilities for the sandpit workspace
//!
//! Fakes for every seam the controller and runner talk to. Each fake keeps
//! its observations behind an `Rc<RefCell<..>>` so a test can hand one clone
//! to the code under test and inspect another.

#![allow(missing_docs)]

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use sandpit_compose::SourceKind;
use sandpit_host::{
    Clipboard, DownloadArtifact, FileSink, IoError, Notification, Playground, PlaygroundConfig,
    PlaygroundDeps,
};
use sandpit_sandbox::{
    ConsoleView, ContextPort, DiagnosticEntry, InMemoryResourceStore, ResourceUrl, SandboxError,
    SandboxPolicy, SandboxSurface, Severity,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

static CONSOLE_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"console\.(log|info|warn|error)\(\s*'([^']*)'\s*\)|throw\s+new\s+Error\(\s*'([^']*)'\s*\)",
    )
    .unwrap()
});

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

/// Everything a [`ScriptedSurface`] has seen
#[derive(Debug, Default)]
pub struct SurfaceRecord {
    pub loads: Vec<ResourceUrl>,
    pub ports: Vec<ContextPort>,
    pub sandbox_attributes: Vec<String>,
    pub unloads: usize,
    pub fail_next: Option<String>,
}

/// Emulates an isolated context without a script engine.
///
/// On load it reads the document back from the store, finds the user script
/// inside the preview guard and posts each literal `console.<level>('...')`
/// call through the port, in source order. A literal `throw new Error('...')`
/// posts what the guard would report and stops.
#[derive(Debug, Clone)]
pub struct ScriptedSurface {
    store: Rc<InMemoryResourceStore>,
    record: Rc<RefCell<SurfaceRecord>>,
}

impl ScriptedSurface {
    pub fn new(store: Rc<InMemoryResourceStore>) -> Self {
        Self {
            store,
            record: Rc::new(RefCell::new(SurfaceRecord::default())),
        }
    }

    pub fn record(&self) -> Rc<RefCell<SurfaceRecord>> {
        Rc::clone(&self.record)
    }

    /// Make the next load fail with `reason`
    pub fn fail_next_load(&self, reason: &str) {
        self.record.borrow_mut().fail_next = Some(reason.to_string());
    }

    /// Port handed to the `index`th load
    pub fn port(&self, index: usize) -> ContextPort {
        self.record.borrow().ports[index].clone()
    }

    pub fn load_count(&self) -> usize {
        self.record.borrow().loads.len()
    }
}

fn user_script(document: &str) -> &str {
    let Some(start) = document.find("try {\n") else {
        return document;
    };
    let body = &document[start + "try {\n".len()..];
    match body.rfind("\n} catch (error)") {
        Some(end) => &body[..end],
        None => body,
    }
}

impl SandboxSurface for ScriptedSurface {
    fn load(
        &mut self,
        url: &ResourceUrl,
        policy: &SandboxPolicy,
        port: ContextPort,
    ) -> Result<(), SandboxError> {
        if let Some(reason) = self.record.borrow_mut().fail_next.take() {
            return Err(SandboxError::Load(reason));
        }
        let resource = self
            .store
            .fetch(url)
            .ok_or_else(|| SandboxError::Load(format!("no resource at {url}")))?;
        {
            let mut record = self.record.borrow_mut();
            record.loads.push(url.clone());
            record.ports.push(port.clone());
            record.sandbox_attributes.push(policy.sandbox_attribute());
        }

        let document = resource.text().unwrap_or_default();
        for caps in CONSOLE_CALL.captures_iter(user_script(document)) {
            if let Some(thrown) = caps.get(3) {
                port.post_console(
                    Severity::Error,
                    format!("JavaScript Error: Error: {}", thrown.as_str()),
                );
                break;
            }
            let level: Severity = caps[1].parse().unwrap();
            port.post_console(level, &caps[2]);
        }
        Ok(())
    }

    fn unload(&mut self) {
        self.record.borrow_mut().unloads += 1;
    }
}

// ---------------------------------------------------------------------------
// UI
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Mounted(String),
    EditorText(SourceKind, String),
    EditorTheme(SourceKind, String),
    TabShown(SourceKind),
    LayoutRequested(SourceKind, Duration),
}

/// Records every UI call
#[derive(Debug, Clone, Default)]
pub struct RecordingUi {
    pub events: Rc<RefCell<Vec<UiEvent>>>,
    pub notifications: Rc<RefCell<Vec<Notification>>>,
}

impl RecordingUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<UiEvent> {
        self.events.borrow().clone()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.borrow().clone()
    }

    pub fn last_notification(&self) -> Option<Notification> {
        self.notifications.borrow().last().cloned()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
        self.notifications.borrow_mut().clear();
    }
}

impl sandpit_host::HostUi for RecordingUi {
    fn mount(&mut self, container: &str) {
        self.events
            .borrow_mut()
            .push(UiEvent::Mounted(container.to_string()));
    }

    fn set_editor_text(&mut self, kind: SourceKind, text: &str) {
        self.events
            .borrow_mut()
            .push(UiEvent::EditorText(kind, text.to_string()));
    }

    fn set_editor_theme(&mut self, kind: SourceKind, theme: &str) {
        self.events
            .borrow_mut()
            .push(UiEvent::EditorTheme(kind, theme.to_string()));
    }

    fn show_tab(&mut self, kind: SourceKind) {
        self.events.borrow_mut().push(UiEvent::TabShown(kind));
    }

    fn request_layout(&mut self, kind: SourceKind, delay: Duration) {
        self.events
            .borrow_mut()
            .push(UiEvent::LayoutRequested(kind, delay));
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.borrow_mut().push(notification);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Appended {
        text: String,
        evicted: Option<String>,
    },
    Cleared(String),
    Scrolled,
}

/// Records console rendering calls
#[derive(Debug, Clone, Default)]
pub struct RecordingConsoleView {
    pub events: Rc<RefCell<Vec<ViewEvent>>>,
}

impl RecordingConsoleView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.borrow().clone()
    }
}

impl ConsoleView for RecordingConsoleView {
    fn entry_appended(&mut self, entry: &DiagnosticEntry, evicted: Option<&DiagnosticEntry>) {
        self.events.borrow_mut().push(ViewEvent::Appended {
            text: entry.text.clone(),
            evicted: evicted.map(|e| e.text.clone()),
        });
    }

    fn cleared(&mut self, placeholder: &str) {
        self.events
            .borrow_mut()
            .push(ViewEvent::Cleared(placeholder.to_string()));
    }

    fn scroll_to_latest(&mut self) {
        self.events.borrow_mut().push(ViewEvent::Scrolled);
    }
}

// ---------------------------------------------------------------------------
// Clipboard and downloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    pub contents: Rc<RefCell<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), IoError> {
        *self.contents.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}

/// Clipboard that always refuses, like a page without permission
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingClipboard;

#[async_trait(?Send)]
impl Clipboard for FailingClipboard {
    async fn write_text(&self, _text: &str) -> Result<(), IoError> {
        Err(IoError::Clipboard("permission denied".to_string()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryFileSink {
    pub saved: Rc<RefCell<Vec<DownloadArtifact>>>,
}

impl MemoryFileSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved(&self) -> Vec<DownloadArtifact> {
        self.saved.borrow().clone()
    }
}

#[async_trait(?Send)]
impl FileSink for MemoryFileSink {
    async fn save(&self, artifact: &DownloadArtifact) -> Result<(), IoError> {
        self.saved.borrow_mut().push(artifact.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FailingFileSink;

#[async_trait(?Send)]
impl FileSink for FailingFileSink {
    async fn save(&self, _artifact: &DownloadArtifact) -> Result<(), IoError> {
        Err(IoError::FileSave("disk full".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A playground wired to fakes, plus handles to inspect them
pub struct Harness {
    pub playground: Playground,
    pub store: Rc<InMemoryResourceStore>,
    pub surface: ScriptedSurface,
    pub ui: RecordingUi,
    pub clipboard: MemoryClipboard,
    pub files: MemoryFileSink,
}

/// Build a playground over fakes. Not mounted.
pub fn setup_playground(config: PlaygroundConfig) -> Harness {
    let clipboard = MemoryClipboard::new();
    let files = MemoryFileSink::new();
    build(
        config,
        Rc::new(clipboard.clone()),
        Rc::new(files.clone()),
        clipboard,
        files,
    )
}

/// Like [`setup_playground`], but the clipboard and file sink always fail.
/// The harness's memory fakes stay empty.
pub fn setup_playground_failing_io(config: PlaygroundConfig) -> Harness {
    build(
        config,
        Rc::new(FailingClipboard),
        Rc::new(FailingFileSink),
        MemoryClipboard::new(),
        MemoryFileSink::new(),
    )
}

fn build(
    config: PlaygroundConfig,
    clipboard: Rc<dyn Clipboard>,
    files: Rc<dyn FileSink>,
    memory_clipboard: MemoryClipboard,
    memory_files: MemoryFileSink,
) -> Harness {
    let store = Rc::new(InMemoryResourceStore::new());
    let surface = ScriptedSurface::new(Rc::clone(&store));
    let ui = RecordingUi::new();
    let deps = PlaygroundDeps::new(
        &config,
        Box::new(surface.clone()),
        store.clone(),
        clipboard,
        files,
        Box::new(ui.clone()),
    );
    let playground = Playground::new("#ide", deps, config).unwrap();
    Harness {
        playground,
        store,
        surface,
        ui,
        clipboard: memory_clipboard,
        files: memory_files,
    }
}
