//! Object-URL resource store

use sandpit_sandbox::{ResourceStore, ResourceUrl, SandboxError};

/// Materializes documents as `Blob`s behind `blob:` URLs
#[derive(Debug, Clone, Copy, Default)]
pub struct BlobResourceStore;

impl BlobResourceStore {
    /// Create a store
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ResourceStore for BlobResourceStore {
    fn create(&self, bytes: &[u8], content_type: &str) -> Result<ResourceUrl, SandboxError> {
        let array = js_sys::Uint8Array::from(bytes);
        let parts = js_sys::Array::new();
        parts.push(&array.buffer());

        let options = web_sys::BlobPropertyBag::new();
        options.set_type(content_type);
        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|_| SandboxError::ResourceCreation("blob: failed to create".to_string()))?;

        let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(|_| {
            SandboxError::ResourceCreation("url: create_object_url failed".to_string())
        })?;
        Ok(ResourceUrl::new(url))
    }

    fn revoke(&self, url: &ResourceUrl) {
        if web_sys::Url::revoke_object_url(url.as_str()).is_err() {
            tracing::warn!(%url, "revoke_object_url failed");
        }
    }
}
