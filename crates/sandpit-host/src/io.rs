//! Clipboard and download seams
//!
//! Both are asynchronous and may fail; the controller turns failures into
//! error notifications and never changes buffer state because of them.

use crate::error::IoError;
use async_trait::async_trait;
use sandpit_compose::ComposedDocument;
#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};

/// Writes plain text to the system clipboard
#[async_trait(?Send)]
pub trait Clipboard {
    /// Replace the clipboard contents with `text`
    async fn write_text(&self, text: &str) -> Result<(), IoError>;
}

/// A standalone file offered to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    /// Suggested file name
    pub filename: String,
    /// MIME type
    pub content_type: String,
    /// UTF-8 contents
    pub bytes: Vec<u8>,
}

impl DownloadArtifact {
    /// Wrap a composed document under `filename`
    #[must_use]
    pub fn from_document(filename: impl Into<String>, document: ComposedDocument) -> Self {
        Self {
            filename: filename.into(),
            content_type: document.content_type().to_string(),
            bytes: document.into_string().into_bytes(),
        }
    }

    /// Contents as text
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }
}

/// Materializes a download
#[async_trait(?Send)]
pub trait FileSink {
    /// Hand `artifact` to the user
    async fn save(&self, artifact: &DownloadArtifact) -> Result<(), IoError>;
}

/// Saves downloads into a directory on the local file system
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FsFileSink {
    dir: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FsFileSink {
    /// Save into `dir`
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[async_trait(?Send)]
impl FileSink for FsFileSink {
    async fn save(&self, artifact: &DownloadArtifact) -> Result<(), IoError> {
        let name = Path::new(&artifact.filename)
            .file_name()
            .ok_or_else(|| IoError::FileSave(format!("invalid file name `{}`", artifact.filename)))?;
        let path = self.dir.join(name);
        tokio::fs::write(&path, &artifact.bytes)
            .await
            .map_err(|e| IoError::FileSave(format!("{}: {e}", path.display())))?;
        tracing::info!(path = %path.display(), bytes = artifact.bytes.len(), "download saved");
        Ok(())
    }
}

/// Clipboard that prints to standard output, for terminals without one
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutClipboard;

#[cfg(not(target_arch = "wasm32"))]
#[async_trait(?Send)]
impl Clipboard for StdoutClipboard {
    async fn write_text(&self, text: &str) -> Result<(), IoError> {
        use tokio::io::AsyncWriteExt;

        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(text.as_bytes())
            .await
            .map_err(|e| IoError::Clipboard(e.to_string()))?;
        stdout
            .write_all(b"\n")
            .await
            .map_err(|e| IoError::Clipboard(e.to_string()))?;
        stdout
            .flush()
            .await
            .map_err(|e| IoError::Clipboard(e.to_string()))
    }
}
