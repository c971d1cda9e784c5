//! Run-cycle phases
//!
//! `Idle → Clearing → Loading → Streaming`, back to `Idle` on stop or load
//! failure, and `Streaming → Clearing` when a new run supersedes.

use crate::error::SandboxError;
use serde::{Deserialize, Serialize};

/// Per-run lifecycle of the runner/console pair.
///
/// `Streaming` has no terminal signal: the isolated context never reports
/// completion, so the runner stays there until superseded or stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RunPhase {
    /// Nothing loaded
    #[default]
    Idle,
    /// Console being reset for a new run
    Clearing,
    /// Document being materialized and loaded
    Loading,
    /// Context live; diagnostics may arrive at any time
    Streaming,
}

/// Validates a run-phase transition.
pub fn validate_transition(from: RunPhase, to: RunPhase) -> Result<(), SandboxError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(SandboxError::IllegalTransition { from, to })
    }
}

/// Phases reachable from `from` in one step
#[must_use]
pub fn allowed_transitions(from: RunPhase) -> &'static [RunPhase] {
    use RunPhase::{Clearing, Idle, Loading, Streaming};
    match from {
        Idle => &[Clearing],
        Clearing => &[Loading, Idle],
        Loading => &[Streaming, Idle],
        Streaming => &[Clearing, Idle],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_cycle_is_legal() {
        assert!(validate_transition(RunPhase::Idle, RunPhase::Clearing).is_ok());
        assert!(validate_transition(RunPhase::Clearing, RunPhase::Loading).is_ok());
        assert!(validate_transition(RunPhase::Loading, RunPhase::Streaming).is_ok());
        assert!(validate_transition(RunPhase::Streaming, RunPhase::Idle).is_ok());
    }

    #[test]
    fn superseding_run_restarts_from_streaming() {
        assert!(validate_transition(RunPhase::Streaming, RunPhase::Clearing).is_ok());
    }

    #[test]
    fn cannot_skip_loading() {
        assert_eq!(
            validate_transition(RunPhase::Clearing, RunPhase::Streaming),
            Err(SandboxError::IllegalTransition {
                from: RunPhase::Clearing,
                to: RunPhase::Streaming,
            })
        );
        assert!(validate_transition(RunPhase::Idle, RunPhase::Streaming).is_err());
    }
}
