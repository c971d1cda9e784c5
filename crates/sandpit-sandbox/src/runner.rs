//! Sandbox runner
//!
//! Drives one run cycle per [`SandboxRunner::run`]:
//!
//! ```text
//! Idle/Streaming → Clearing → Loading → Streaming
//! ```
//!
//! and routes posted diagnostics into the console afterwards. Routing only
//! accepts envelopes from the current generation, so a slow superseded
//! context can never write into the log of a newer run.

use crate::console::{ClearReason, DiagnosticsConsole};
use crate::error::SandboxError;
use crate::message::{decode, ContextPort, Decoded, Envelope, Generation, Severity};
use crate::phase::{validate_transition, RunPhase};
use crate::resource::{ResourceLease, ResourceStore, ResourceUrl};
use crate::surface::{SandboxPolicy, SandboxSurface};
use sandpit_compose::ComposedDocument;
use std::fmt;
use std::rc::Rc;
use tokio::sync::mpsc;

/// Informational line logged at the start of every run
pub const RUNNING_MESSAGE: &str = "Running code...";

/// What happened to one routed envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    /// Appended to the console
    Appended(Severity),
    /// Posted by a superseded context and dropped
    Stale(Generation),
    /// Not a console diagnostic
    Ignored,
    /// Console-typed but malformed; dropped
    Rejected(String),
}

/// Tally of one [`SandboxRunner::pump`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpReport {
    /// Entries appended
    pub delivered: usize,
    /// Envelopes from superseded contexts
    pub stale: usize,
    /// Foreign or malformed payloads
    pub ignored: usize,
}

/// The host-side receiving end, registered once per runner
struct MessageListener {
    tx: mpsc::UnboundedSender<Envelope>,
    rx: mpsc::UnboundedReceiver<Envelope>,
}

impl MessageListener {
    fn register() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tracing::debug!("registered console message listener");
        Self { tx, rx }
    }

    fn port(&self, generation: Generation) -> ContextPort {
        ContextPort::new(generation, self.tx.clone())
    }
}

/// Loads composed documents into a [`SandboxSurface`] and relays diagnostics.
///
/// Holds at most one live [`ResourceLease`]: the lease of the current run.
pub struct SandboxRunner {
    surface: Box<dyn SandboxSurface>,
    store: Rc<dyn ResourceStore>,
    policy: SandboxPolicy,
    generation: Generation,
    lease: Option<ResourceLease>,
    listener: Option<MessageListener>,
    phase: RunPhase,
}

impl SandboxRunner {
    /// Create a runner over `surface`, materializing documents in `store`
    #[must_use]
    pub fn new(
        surface: Box<dyn SandboxSurface>,
        store: Rc<dyn ResourceStore>,
        policy: SandboxPolicy,
    ) -> Self {
        Self {
            surface,
            store,
            policy,
            generation: Generation::NONE,
            lease: None,
            listener: None,
            phase: RunPhase::Idle,
        }
    }

    /// Run `document`, superseding any previous context.
    ///
    /// Clears `console`, logs [`RUNNING_MESSAGE`], loads the document under a
    /// new generation and releases the previous run's resource. On failure
    /// the error is also logged to the console and the runner returns to
    /// [`RunPhase::Idle`].
    ///
    /// # Errors
    /// - `SandboxError::ResourceCreation` if the document cannot be materialized
    /// - `SandboxError::Load` if the surface rejects it
    pub fn run(
        &mut self,
        document: &ComposedDocument,
        console: &mut DiagnosticsConsole,
    ) -> Result<Generation, SandboxError> {
        self.transition(RunPhase::Clearing)?;
        console.clear(ClearReason::BeforeRun);
        console.log(Severity::Info, RUNNING_MESSAGE);

        self.transition(RunPhase::Loading)?;
        // bumped before loading so nothing from the old context is accepted
        // even if this load fails
        self.generation = self.generation.next();
        let generation = self.generation;

        let lease = match ResourceLease::acquire(
            self.store.clone(),
            document.as_bytes(),
            document.content_type(),
        ) {
            Ok(lease) => lease,
            Err(e) => return Err(self.abort(e, console)),
        };

        let port = self.ensure_listener().port(generation);
        if let Err(e) = self.surface.load(lease.url(), &self.policy, port) {
            lease.release();
            return Err(self.abort(e, console));
        }

        if let Some(previous) = self.lease.replace(lease) {
            previous.release();
        }

        self.transition(RunPhase::Streaming)?;
        tracing::info!(%generation, bytes = document.as_bytes().len(), "sandbox loaded");
        Ok(generation)
    }

    /// Tear down the current context and release its resource
    pub fn stop(&mut self) -> Result<(), SandboxError> {
        if self.phase == RunPhase::Idle {
            return Ok(());
        }
        self.transition(RunPhase::Idle)?;
        self.surface.unload();
        // advance so anything the torn-down context still posts is stale
        self.generation = self.generation.next();
        if let Some(lease) = self.lease.take() {
            lease.release();
        }
        tracing::info!("sandbox stopped");
        Ok(())
    }

    /// Route every envelope already queued, without waiting
    pub fn pump(&mut self, console: &mut DiagnosticsConsole) -> PumpReport {
        let mut report = PumpReport::default();
        loop {
            let envelope = match self.listener.as_mut() {
                Some(listener) => match listener.rx.try_recv() {
                    Ok(envelope) => envelope,
                    Err(_) => break,
                },
                None => break,
            };
            match self.route(envelope, console) {
                Routed::Appended(_) => report.delivered += 1,
                Routed::Stale(_) => report.stale += 1,
                Routed::Ignored | Routed::Rejected(_) => report.ignored += 1,
            }
        }
        report
    }

    /// Wait for the next envelope and route it.
    ///
    /// Returns `None` immediately if nothing has ever been run.
    pub async fn next(&mut self, console: &mut DiagnosticsConsole) -> Option<Routed> {
        let envelope = self.listener.as_mut()?.rx.recv().await?;
        Some(self.route(envelope, console))
    }

    /// Route one envelope into `console`
    pub fn route(&self, envelope: Envelope, console: &mut DiagnosticsConsole) -> Routed {
        if envelope.generation != self.generation || self.phase != RunPhase::Streaming {
            tracing::debug!(
                stale = %envelope.generation,
                current = %self.generation,
                "discarding message from superseded context"
            );
            return Routed::Stale(envelope.generation);
        }

        match decode(&envelope.payload) {
            Decoded::Console(message) => {
                console.log(message.level, message.message);
                Routed::Appended(message.level)
            }
            Decoded::Foreign => Routed::Ignored,
            Decoded::Malformed(reason) => {
                tracing::warn!(%reason, "dropping malformed console message");
                Routed::Rejected(reason)
            }
        }
    }

    /// Generation of the most recent load
    #[inline]
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Current phase
    #[inline]
    #[must_use]
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// URL of the live resource, if a context is loaded
    #[must_use]
    pub fn current_resource(&self) -> Option<&ResourceUrl> {
        self.lease.as_ref().map(ResourceLease::url)
    }

    /// Whether the message listener has been registered
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.listener.is_some()
    }

    /// Sandbox privileges applied to every load
    #[must_use]
    pub fn policy(&self) -> &SandboxPolicy {
        &self.policy
    }

    fn ensure_listener(&mut self) -> &MessageListener {
        self.listener.get_or_insert_with(MessageListener::register)
    }

    fn transition(&mut self, to: RunPhase) -> Result<(), SandboxError> {
        validate_transition(self.phase, to)?;
        tracing::trace!(from = ?self.phase, to = ?to, "run phase");
        self.phase = to;
        Ok(())
    }

    fn abort(&mut self, error: SandboxError, console: &mut DiagnosticsConsole) -> SandboxError {
        tracing::error!(%error, "sandbox run failed");
        console.log(Severity::Error, error.to_string());
        // Loading → Idle is always legal
        self.phase = RunPhase::Idle;
        if let Some(previous) = self.lease.take() {
            self.surface.unload();
            previous.release();
        }
        error
    }
}

impl fmt::Debug for SandboxRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SandboxRunner")
            .field("policy", &self.policy)
            .field("generation", &self.generation)
            .field("lease", &self.lease)
            .field("listening", &self.listener.is_some())
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}
