//! Error types for sandbox runs

use crate::phase::RunPhase;

/// Sandbox failures. None of these are fatal to the host.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SandboxError {
    /// The document could not be materialized as an ephemeral resource
    #[error("resource creation failed: {0}")]
    ResourceCreation(String),

    /// The isolated surface refused or failed to load the resource
    #[error("sandbox load failed: {0}")]
    Load(String),

    /// Run cycle driven out of order
    #[error("illegal run transition: {from:?} -> {to:?}")]
    IllegalTransition {
        /// Phase the runner was in
        from: RunPhase,
        /// Phase that was requested
        to: RunPhase,
    },
}
