//! The isolated rendering surface seam

use crate::error::SandboxError;
use crate::message::ContextPort;
use crate::resource::ResourceUrl;
use serde::{Deserialize, Serialize};

/// Privileges granted to the isolated context.
///
/// Only script execution and same-origin access to its own ephemeral
/// resource can be granted; navigation, popups, forms and modals are never
/// allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxPolicy {
    /// Let the document run scripts
    pub allow_scripts: bool,
    /// Let the document read its own ephemeral resource
    pub allow_same_origin: bool,
}

impl SandboxPolicy {
    /// Space-separated sandbox tokens, as an iframe `sandbox` attribute value
    #[must_use]
    pub fn sandbox_attribute(&self) -> String {
        let mut tokens = Vec::with_capacity(2);
        if self.allow_scripts {
            tokens.push("allow-scripts");
        }
        if self.allow_same_origin {
            tokens.push("allow-same-origin");
        }
        tokens.join(" ")
    }
}

impl Default for SandboxPolicy {
    fn default() -> Self {
        Self {
            allow_scripts: true,
            allow_same_origin: true,
        }
    }
}

/// Something that can load a resource into an isolated context.
///
/// Loading replaces whatever context was there before, which is the only
/// way to stop a runaway script. The loaded context posts its diagnostics
/// through `port`.
pub trait SandboxSurface {
    /// Load `source` under `policy`, discarding the previous context
    fn load(
        &mut self,
        source: &ResourceUrl,
        policy: &SandboxPolicy,
        port: ContextPort,
    ) -> Result<(), SandboxError>;

    /// Tear down the current context, if any
    fn unload(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_allows_scripts_and_same_origin() {
        assert_eq!(
            SandboxPolicy::default().sandbox_attribute(),
            "allow-scripts allow-same-origin"
        );
    }

    #[test]
    fn locked_down_policy_is_empty() {
        let policy = SandboxPolicy {
            allow_scripts: false,
            allow_same_origin: false,
        };
        assert_eq!(policy.sandbox_attribute(), "");
    }
}
