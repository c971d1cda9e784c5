//! Playground configuration
//!
//! Every field has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! console_capacity = 50
//! themes = ["vs-dark", "vs-light", "hc-black"]
//! download_filename = "my-code.html"
//! notification_ttl_ms = 5000
//! layout_refresh_delay_ms = 100
//! auto_run_on_mount = true
//!
//! [sandbox]
//! allow_scripts = true
//! allow_same_origin = true
//! ```

use crate::error::ConfigError;
use crate::theme::DEFAULT_THEMES;
use sandpit_sandbox::{SandboxPolicy, DEFAULT_CAPACITY};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// File name offered for downloads
pub const DEFAULT_DOWNLOAD_FILENAME: &str = "my-code.html";

/// Playground configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaygroundConfig {
    /// Console entries kept before eviction
    pub console_capacity: usize,
    /// Editor themes in cycle order
    pub themes: Vec<String>,
    /// Download file name
    pub download_filename: String,
    /// How long toasts stay up
    pub notification_ttl_ms: u64,
    /// Delay before re-measuring an editor after a tab switch
    pub layout_refresh_delay_ms: u64,
    /// Run once as soon as the playground is mounted
    pub auto_run_on_mount: bool,
    /// Privileges of the isolated context
    pub sandbox: SandboxPolicy,
}

impl PlaygroundConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With console capacity
    #[inline]
    #[must_use]
    pub fn with_console_capacity(mut self, capacity: usize) -> Self {
        self.console_capacity = capacity;
        self
    }

    /// With theme list
    #[must_use]
    pub fn with_themes<I, S>(mut self, themes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.themes = themes.into_iter().map(Into::into).collect();
        self
    }

    /// With download file name
    #[inline]
    #[must_use]
    pub fn with_download_filename(mut self, filename: impl Into<String>) -> Self {
        self.download_filename = filename.into();
        self
    }

    /// With or without the run on mount
    #[inline]
    #[must_use]
    pub fn with_auto_run(mut self, auto_run: bool) -> Self {
        self.auto_run_on_mount = auto_run;
        self
    }

    /// With sandbox privileges
    #[inline]
    #[must_use]
    pub fn with_sandbox_policy(mut self, policy: SandboxPolicy) -> Self {
        self.sandbox = policy;
        self
    }

    /// Toast lifetime
    #[inline]
    #[must_use]
    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }

    /// Layout refresh delay
    #[inline]
    #[must_use]
    pub fn layout_refresh_delay(&self) -> Duration {
        Duration::from_millis(self.layout_refresh_delay_ms)
    }

    /// Parse and validate TOML
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded playground config");
        Ok(config)
    }

    /// Reject values the playground cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.console_capacity == 0 {
            return Err(ConfigError::Invalid(
                "console_capacity must be at least 1".to_string(),
            ));
        }
        if self.themes.is_empty() {
            return Err(ConfigError::Invalid("themes must not be empty".to_string()));
        }
        if self.download_filename.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "download_filename must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            console_capacity: DEFAULT_CAPACITY,
            themes: DEFAULT_THEMES.iter().map(ToString::to_string).collect(),
            download_filename: DEFAULT_DOWNLOAD_FILENAME.to_string(),
            notification_ttl_ms: 5000,
            layout_refresh_delay_ms: 100,
            auto_run_on_mount: true,
            sandbox: SandboxPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let config = PlaygroundConfig::from_toml_str("").unwrap();
        assert_eq!(config, PlaygroundConfig::default());
        assert_eq!(config.console_capacity, 50);
        assert_eq!(config.download_filename, "my-code.html");
    }

    #[test]
    fn partial_toml_overrides() {
        let config = PlaygroundConfig::from_toml_str(
            "console_capacity = 10\nthemes = [\"light\"]\n[sandbox]\nallow_same_origin = false\n",
        )
        .unwrap();
        assert_eq!(config.console_capacity, 10);
        assert_eq!(config.themes, vec!["light".to_string()]);
        assert!(config.sandbox.allow_scripts);
        assert!(!config.sandbox.allow_same_origin);
    }

    #[test]
    fn zero_capacity_is_invalid() {
        let err = PlaygroundConfig::from_toml_str("console_capacity = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn empty_theme_list_is_invalid() {
        assert!(PlaygroundConfig::new().with_themes(Vec::<String>::new()).validate().is_err());
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let err = PlaygroundConfig::from_toml_str("console_capacity = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
