use async_trait::async_trait;
use sandpit_host::{DownloadArtifact, FileSink, IoError};
use sandpit_sandbox::{ResourceStore, ResourceUrl};
use wasm_bindgen::JsCast;

use crate::resource::BlobResourceStore;

/// Offers downloads through a temporary `<a download>` click
#[derive(Debug, Clone, Copy, Default)]
pub struct AnchorDownloadSink;

#[async_trait(?Send)]
impl FileSink for AnchorDownloadSink {
    async fn save(&self, artifact: &DownloadArtifact) -> Result<(), IoError> {
        let window = web_sys::window().ok_or_else(|| IoError::FileSave("no window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| IoError::FileSave("no document".to_string()))?;

        let store = BlobResourceStore;
        let url = store
            .create(&artifact.bytes, &artifact.content_type)
            .map_err(|e| IoError::FileSave(e.to_string()))?;

        let clicked = click_anchor(&document, &url, &artifact.filename);
        store.revoke(&url);
        clicked
    }
}

fn click_anchor(
    document: &web_sys::Document,
    url: &ResourceUrl,
    filename: &str,
) -> Result<(), IoError> {
    let anchor = document
        .create_element("a")
        .map_err(|_| IoError::FileSave("document: create_element failed".to_string()))?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|_| IoError::FileSave("document: anchor cast failed".to_string()))?;

    anchor.set_href(url.as_str());
    anchor.set_download(filename);
    anchor.click();
    Ok(())
}
