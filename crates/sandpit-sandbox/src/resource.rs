//! Ephemeral resources and scoped leases
//!
//! A composed document is materialized as an in-memory resource with a
//! short-lived URL (an object URL in a browser). Each run holds exactly one
//! [`ResourceLease`]; installing the next lease releases the previous one,
//! so repeated runs never accumulate stale resources.

use crate::error::SandboxError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Locator of an ephemeral resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceUrl(String);

impl ResourceUrl {
    /// Wrap a URL string
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// URL text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Creates and revokes ephemeral resources
pub trait ResourceStore {
    /// Materialize `bytes` with `content_type`, returning its URL
    fn create(&self, bytes: &[u8], content_type: &str) -> Result<ResourceUrl, SandboxError>;

    /// Revoke a URL. Revoking an unknown or already-revoked URL is a no-op.
    fn revoke(&self, url: &ResourceUrl);
}

/// Scoped ownership of one ephemeral resource; revoked on release or drop.
pub struct ResourceLease {
    url: ResourceUrl,
    store: Rc<dyn ResourceStore>,
    released: bool,
}

impl ResourceLease {
    /// Materialize a resource and take the lease on it
    pub fn acquire(
        store: Rc<dyn ResourceStore>,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<Self, SandboxError> {
        let url = store.create(bytes, content_type)?;
        tracing::debug!(url = %url, bytes = bytes.len(), "acquired resource lease");
        Ok(Self {
            url,
            store,
            released: false,
        })
    }

    /// URL of the leased resource
    #[inline]
    #[must_use]
    pub fn url(&self) -> &ResourceUrl {
        &self.url
    }

    /// Revoke the resource now
    pub fn release(mut self) {
        self.revoke();
    }

    fn revoke(&mut self) {
        if !self.released {
            self.released = true;
            self.store.revoke(&self.url);
            tracing::debug!(url = %self.url, "revoked resource lease");
        }
    }
}

impl Drop for ResourceLease {
    fn drop(&mut self) {
        self.revoke();
    }
}

impl fmt::Debug for ResourceLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceLease")
            .field("url", &self.url)
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}

/// A resource held by [`InMemoryResourceStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredResource {
    /// MIME type it was created with
    pub content_type: String,
    /// Contents
    pub bytes: Arc<[u8]>,
}

impl StoredResource {
    /// Contents as UTF-8 text, if valid
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }
}

#[derive(Debug, Default)]
struct StoreState {
    live: HashMap<ResourceUrl, StoredResource>,
    created: u64,
    revoked: u64,
}

/// Process-local resource store with `blob:sandpit/<uuid>` URLs
#[derive(Debug, Default)]
pub struct InMemoryResourceStore {
    inner: Mutex<StoreState>,
}

impl InMemoryResourceStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a live resource
    #[must_use]
    pub fn fetch(&self, url: &ResourceUrl) -> Option<StoredResource> {
        self.inner.lock().live.get(url).cloned()
    }

    /// Number of resources not yet revoked
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.inner.lock().live.len()
    }

    /// Total resources ever created
    #[must_use]
    pub fn created_count(&self) -> u64 {
        self.inner.lock().created
    }

    /// Total resources revoked
    #[must_use]
    pub fn revoked_count(&self) -> u64 {
        self.inner.lock().revoked
    }
}

impl ResourceStore for InMemoryResourceStore {
    fn create(&self, bytes: &[u8], content_type: &str) -> Result<ResourceUrl, SandboxError> {
        let url = ResourceUrl::new(format!("blob:sandpit/{}", uuid::Uuid::new_v4()));
        let mut state = self.inner.lock();
        state.live.insert(
            url.clone(),
            StoredResource {
                content_type: content_type.to_string(),
                bytes: Arc::from(bytes),
            },
        );
        state.created += 1;
        Ok(url)
    }

    fn revoke(&self, url: &ResourceUrl) {
        let mut state = self.inner.lock();
        if state.live.remove(url).is_some() {
            state.revoked += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_revokes() {
        let store = Rc::new(InMemoryResourceStore::new());
        {
            let lease = ResourceLease::acquire(store.clone(), b"<p>x</p>", "text/html").unwrap();
            assert!(lease.url().as_str().starts_with("blob:sandpit/"));
            assert_eq!(store.live_count(), 1);
        }
        assert_eq!(store.live_count(), 0);
        assert_eq!(store.revoked_count(), 1);
    }

    #[test]
    fn explicit_release_revokes_once() {
        let store = Rc::new(InMemoryResourceStore::new());
        let lease = ResourceLease::acquire(store.clone(), b"a", "text/html").unwrap();
        let url = lease.url().clone();
        lease.release();
        assert!(store.fetch(&url).is_none());
        assert_eq!(store.revoked_count(), 1);
    }

    #[test]
    fn fetch_returns_contents_and_type() {
        let store = Rc::new(InMemoryResourceStore::new());
        let lease = ResourceLease::acquire(store.clone(), "héllo".as_bytes(), "text/html").unwrap();
        let stored = store.fetch(lease.url()).unwrap();
        assert_eq!(stored.content_type, "text/html");
        assert_eq!(stored.text(), Some("héllo"));
    }

    #[test]
    fn revoking_unknown_url_is_noop() {
        let store = InMemoryResourceStore::new();
        store.revoke(&ResourceUrl::new("blob:sandpit/missing"));
        assert_eq!(store.revoked_count(), 0);
    }
}
