//! Host controller
//!
//! A [`Playground`] is one self-contained playground instance bound to a
//! container. All of its collaborators are passed in, so several instances
//! can live on one page and each can be driven headlessly in tests.
//!
//! # Workflow
//! 1. `mount()` renders the widget, fills the editors and (by default) runs once
//! 2. edits arrive through `set_text()` and mark buffers dirty
//! 3. `run()` composes a preview document and hands it to the sandbox runner
//! 4. diagnostics are drained with `pump_diagnostics()` / `next_diagnostic()`

use crate::buffer::SourceBuffers;
use crate::config::PlaygroundConfig;
use crate::error::{HostError, IoError};
use crate::io::{Clipboard, DownloadArtifact, FileSink};
use crate::notify::{Notification, NotificationKind};
use crate::shortcuts::{KeyChord, Shortcut};
use crate::theme::ThemeState;
use crate::ui::HostUi;
use sandpit_compose::{compose, ComposedDocument, CompositionMode, SourceKind, TemplateStore};
use sandpit_sandbox::{
    ClearReason, ConsoleView, DiagnosticsConsole, Generation, PumpReport, ResourceStore, Routed,
    RunPhase, SandboxRunner, SandboxSurface,
};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Collaborators a [`Playground`] is built from
pub struct PlaygroundDeps {
    /// Baseline snippets for initial load and reset
    pub templates: TemplateStore,
    /// Diagnostic log
    pub console: DiagnosticsConsole,
    /// Sandbox runner
    pub runner: SandboxRunner,
    /// Clipboard for `copy_all`
    pub clipboard: Rc<dyn Clipboard>,
    /// Download target for `download_all`
    pub files: Rc<dyn FileSink>,
    /// Page-side rendering
    pub ui: Box<dyn HostUi>,
}

impl PlaygroundDeps {
    /// Assemble dependencies with stock templates, a console sized by
    /// `config` and a runner using `config`'s sandbox policy
    #[must_use]
    pub fn new(
        config: &PlaygroundConfig,
        surface: Box<dyn SandboxSurface>,
        store: Rc<dyn ResourceStore>,
        clipboard: Rc<dyn Clipboard>,
        files: Rc<dyn FileSink>,
        ui: Box<dyn HostUi>,
    ) -> Self {
        Self {
            templates: TemplateStore::default(),
            console: DiagnosticsConsole::new(config.console_capacity),
            runner: SandboxRunner::new(surface, store, config.sandbox),
            clipboard,
            files,
            ui,
        }
    }

    /// Replace the baseline snippets
    #[must_use]
    pub fn with_templates(mut self, templates: TemplateStore) -> Self {
        self.templates = templates;
        self
    }

    /// Attach a view to the console
    #[must_use]
    pub fn with_console_view(mut self, view: Box<dyn ConsoleView>) -> Self {
        self.console.set_view(view);
        self
    }
}

/// A clipboard write taken from a [`Playground`], detached from it
pub struct PendingCopy {
    clipboard: Rc<dyn Clipboard>,
    text: String,
}

impl PendingCopy {
    /// Text that will be written
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Perform the write
    ///
    /// # Errors
    /// - `IoError::Clipboard` if the clipboard refused
    pub async fn write(&self) -> Result<(), IoError> {
        self.clipboard.write_text(&self.text).await
    }
}

impl fmt::Debug for PendingCopy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingCopy")
            .field("len", &self.text.len())
            .finish_non_exhaustive()
    }
}

/// A download taken from a [`Playground`], detached from it
pub struct PendingDownload {
    files: Rc<dyn FileSink>,
    artifact: DownloadArtifact,
}

impl PendingDownload {
    /// Artifact that will be saved
    #[must_use]
    pub fn artifact(&self) -> &DownloadArtifact {
        &self.artifact
    }

    /// Hand the artifact to the sink
    ///
    /// # Errors
    /// - `IoError::FileSave` if the sink failed
    pub async fn save(&self) -> Result<(), IoError> {
        self.files.save(&self.artifact).await
    }
}

impl fmt::Debug for PendingDownload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingDownload")
            .field("filename", &self.artifact.filename)
            .finish_non_exhaustive()
    }
}

/// One playground instance
pub struct Playground {
    container: String,
    config: PlaygroundConfig,
    templates: TemplateStore,
    buffers: SourceBuffers,
    theme: ThemeState,
    console: DiagnosticsConsole,
    runner: SandboxRunner,
    clipboard: Rc<dyn Clipboard>,
    files: Rc<dyn FileSink>,
    ui: Box<dyn HostUi>,
    mounted: bool,
}

impl Playground {
    /// Build a playground for `container`
    ///
    /// # Errors
    /// - `HostError::Config` if `config` fails validation
    pub fn new(
        container: impl Into<String>,
        deps: PlaygroundDeps,
        config: PlaygroundConfig,
    ) -> Result<Self, HostError> {
        config.validate()?;
        let buffers = SourceBuffers::from_templates(&deps.templates);
        Ok(Self {
            container: container.into(),
            theme: ThemeState::new(config.themes.clone()),
            config,
            templates: deps.templates,
            buffers,
            console: deps.console,
            runner: deps.runner,
            clipboard: deps.clipboard,
            files: deps.files,
            ui: deps.ui,
            mounted: false,
        })
    }

    /// Render into the container, fill the editors and optionally run once.
    ///
    /// Mounting twice is a no-op. Returns the generation of the initial run.
    pub fn mount(&mut self) -> Result<Option<Generation>, HostError> {
        if self.mounted {
            return Ok(None);
        }
        self.mounted = true;
        tracing::info!(container = %self.container, "mounting playground");

        self.ui.mount(&self.container);
        let delay = self.config.layout_refresh_delay();
        for kind in SourceKind::ALL {
            self.ui.set_editor_text(kind, self.buffers.text(kind));
            self.ui.set_editor_theme(kind, self.theme.current());
            self.ui.request_layout(kind, delay);
        }
        self.ui.show_tab(self.buffers.active());

        if self.config.auto_run_on_mount {
            self.run().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Overwrite one buffer; no validation
    pub fn set_text(&mut self, kind: SourceKind, text: impl Into<String>) {
        self.buffers.set_text(kind, text);
    }

    /// Current text of one buffer
    #[must_use]
    pub fn text(&self, kind: SourceKind) -> &str {
        self.buffers.text(kind)
    }

    /// Restore all three buffers to the template defaults. Does not run.
    pub fn reset(&mut self) {
        self.buffers.reset(&self.templates);
        for kind in SourceKind::ALL {
            self.ui.set_editor_text(kind, self.buffers.text(kind));
        }
        self.notify(
            NotificationKind::Success,
            "Code Reset",
            "All code has been reset to default values.",
        );
        tracing::info!("buffers reset to defaults");
    }

    /// Focus another buffer and have its editor re-measured
    pub fn switch_tab(&mut self, kind: SourceKind) {
        self.buffers.set_active(kind);
        self.ui.show_tab(kind);
        self.ui
            .request_layout(kind, self.config.layout_refresh_delay());
    }

    /// Compose the buffers and run them in the sandbox
    ///
    /// # Errors
    /// - `HostError::Sandbox` if the document could not be loaded; the
    ///   failure is also in the console
    pub fn run(&mut self) -> Result<Generation, HostError> {
        let document = compose(&self.buffers.sources(), CompositionMode::Preview);
        let generation = self.runner.run(&document, &mut self.console)?;
        self.buffers.mark_clean();
        Ok(generation)
    }

    /// Tear down the running context
    pub fn stop(&mut self) -> Result<(), HostError> {
        self.runner.stop()?;
        Ok(())
    }

    /// Copy all three buffers, labeled, to the clipboard
    ///
    /// # Errors
    /// - `HostError::Io` if the clipboard rejected the write
    pub async fn copy_all(&mut self) -> Result<(), HostError> {
        let pending = self.prepare_copy();
        let outcome = pending.write().await;
        self.finish_copy(outcome)
    }

    /// [`Playground::copy_all`] on a shared playground. The cell is only
    /// borrowed before and after the clipboard write, so other actions may
    /// run while the write is pending.
    ///
    /// # Errors
    /// - `HostError::Io` if the clipboard rejected the write
    pub async fn copy_all_shared(cell: &RefCell<Self>) -> Result<(), HostError> {
        let pending = cell.borrow().prepare_copy();
        let outcome = pending.write().await;
        cell.borrow_mut().finish_copy(outcome)
    }

    /// Snapshot the clipboard text; nothing is written yet
    #[must_use]
    pub fn prepare_copy(&self) -> PendingCopy {
        PendingCopy {
            clipboard: Rc::clone(&self.clipboard),
            text: self.buffers.clipboard_text(),
        }
    }

    /// Notify about a finished clipboard write
    ///
    /// # Errors
    /// - `HostError::Io` carrying `outcome`'s failure
    pub fn finish_copy(&mut self, outcome: Result<(), IoError>) -> Result<(), HostError> {
        match outcome {
            Ok(()) => {
                self.notify(
                    NotificationKind::Success,
                    "Code Copied",
                    "All code has been copied to clipboard.",
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "clipboard write failed");
                self.notify(
                    NotificationKind::Error,
                    "Copy Failed",
                    "Failed to copy code to clipboard.",
                );
                Err(e.into())
            }
        }
    }

    /// Plain (uninstrumented) document for download
    #[must_use]
    pub fn download_document(&self) -> ComposedDocument {
        compose(&self.buffers.sources(), CompositionMode::Download)
    }

    /// Offer the plain document as a file download
    ///
    /// # Errors
    /// - `HostError::Io` if the file sink failed
    pub async fn download_all(&mut self) -> Result<DownloadArtifact, HostError> {
        let pending = self.prepare_download();
        let outcome = pending.save().await;
        self.finish_download(pending, outcome)
    }

    /// [`Playground::download_all`] on a shared playground, borrowing the
    /// cell only around the save
    ///
    /// # Errors
    /// - `HostError::Io` if the file sink failed
    pub async fn download_all_shared(cell: &RefCell<Self>) -> Result<DownloadArtifact, HostError> {
        let pending = cell.borrow().prepare_download();
        let outcome = pending.save().await;
        cell.borrow_mut().finish_download(pending, outcome)
    }

    /// Compose the download artifact; nothing is saved yet
    #[must_use]
    pub fn prepare_download(&self) -> PendingDownload {
        PendingDownload {
            files: Rc::clone(&self.files),
            artifact: DownloadArtifact::from_document(
                &self.config.download_filename,
                self.download_document(),
            ),
        }
    }

    /// Notify about a finished save
    ///
    /// # Errors
    /// - `HostError::Io` carrying `outcome`'s failure
    pub fn finish_download(
        &mut self,
        pending: PendingDownload,
        outcome: Result<(), IoError>,
    ) -> Result<DownloadArtifact, HostError> {
        match outcome {
            Ok(()) => {
                tracing::info!(filename = %pending.artifact.filename, "download offered");
                Ok(pending.artifact)
            }
            Err(e) => {
                tracing::warn!(error = %e, "download failed");
                self.notify(
                    NotificationKind::Error,
                    "Download Failed",
                    "Failed to save the code as a file.",
                );
                Err(e.into())
            }
        }
    }

    /// Switch every editor to the next theme
    pub fn cycle_theme(&mut self) -> String {
        let theme = self.theme.advance().to_string();
        for kind in SourceKind::ALL {
            self.ui.set_editor_theme(kind, &theme);
        }
        self.notify(
            NotificationKind::Info,
            "Theme Changed",
            format!("Switched to {theme} theme"),
        );
        theme
    }

    /// User-initiated console clear
    pub fn clear_console(&mut self) {
        self.console.clear(ClearReason::User);
    }

    /// Perform the action bound to `chord`, if any
    pub fn handle_key(&mut self, chord: &KeyChord) -> Option<Shortcut> {
        let shortcut = Shortcut::from_chord(chord)?;
        tracing::debug!(?shortcut, "keyboard shortcut");
        match shortcut {
            Shortcut::Run => {
                if let Err(e) = self.run() {
                    tracing::warn!(error = %e, "shortcut run failed");
                }
            }
            Shortcut::Reset => self.reset(),
            Shortcut::ClearConsole => self.clear_console(),
            Shortcut::CycleTheme => {
                self.cycle_theme();
            }
        }
        Some(shortcut)
    }

    /// Route every diagnostic already posted by the sandbox
    pub fn pump_diagnostics(&mut self) -> PumpReport {
        self.runner.pump(&mut self.console)
    }

    /// Wait for the next diagnostic from the sandbox and route it
    pub async fn next_diagnostic(&mut self) -> Option<Routed> {
        self.runner.next(&mut self.console).await
    }

    /// Container this instance renders into
    #[must_use]
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Focused buffer
    #[must_use]
    pub fn active_tab(&self) -> SourceKind {
        self.buffers.active()
    }

    /// Buffer state
    #[must_use]
    pub fn buffers(&self) -> &SourceBuffers {
        &self.buffers
    }

    /// Diagnostic log
    #[must_use]
    pub fn console(&self) -> &DiagnosticsConsole {
        &self.console
    }

    /// Theme in effect
    #[must_use]
    pub fn theme(&self) -> &str {
        self.theme.current()
    }

    /// Generation of the latest run
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.runner.generation()
    }

    /// Run-cycle phase
    #[must_use]
    pub fn phase(&self) -> RunPhase {
        self.runner.phase()
    }

    /// Configuration in effect
    #[must_use]
    pub fn config(&self) -> &PlaygroundConfig {
        &self.config
    }

    fn notify(&mut self, kind: NotificationKind, title: &str, description: impl Into<String>) {
        let notification =
            Notification::new(kind, title, description, self.config.notification_ttl());
        self.ui.notify(notification);
    }
}

impl fmt::Debug for Playground {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Playground")
            .field("container", &self.container)
            .field("buffers", &self.buffers)
            .field("theme", &self.theme)
            .field("console", &self.console)
            .field("runner", &self.runner)
            .field("mounted", &self.mounted)
            .finish_non_exhaustive()
    }
}
