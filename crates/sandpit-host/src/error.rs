//! Error types for the host controller
//!
//! Nothing here is fatal: sandbox failures stay in the console, IO failures
//! become error notifications, config failures are reported before a
//! playground is built.

use sandpit_sandbox::SandboxError;
use std::path::PathBuf;

/// Main host error type
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// A run failed to load
    #[error("sandbox error: {0}")]
    Sandbox(#[from] SandboxError),

    /// Clipboard or file sink failure
    #[error("io error: {0}")]
    Io(#[from] IoError),

    /// Bad configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Clipboard and file-materialization failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IoError {
    /// The clipboard rejected the write
    #[error("clipboard write failed: {0}")]
    Clipboard(String),

    /// The download could not be saved
    #[error("file save failed: {0}")]
    FileSave(String),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file unreadable
    #[error("failed to read {path}: {source}")]
    Read {
        /// File that was read
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid TOML for [`crate::PlaygroundConfig`]
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Parsed but out of range
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
