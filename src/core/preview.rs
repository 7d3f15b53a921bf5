//! Revocable preview handles for uploaded originals.
//!
//! A [`PreviewHandle`] is created with its record and revoked when the handle
//! is dropped, so releasing a record releases its preview exactly once.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use parking_lot::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;
use crate::core::UploadedFile;

const PREVIEW_SCHEME: &str = "blob:product-studio/";

#[derive(Debug, Default)]
struct RegistryInner {
    live: Mutex<HashMap<String, (String, Arc<[u8]>)>>,
    created: AtomicUsize,
    released: AtomicUsize,
}

/// Tracks live preview handles and resolves them to image bytes.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    inner: Arc<RegistryInner>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a handle for `file`. The bytes stay resolvable until it is dropped.
    pub fn create(&self, file: &UploadedFile) -> PreviewHandle {
        let url = format!("{}{}", PREVIEW_SCHEME, Uuid::new_v4());
        self.inner
            .live
            .lock()
            .insert(url.clone(), (file.mime_type.clone(), Arc::clone(&file.bytes)));
        self.inner.created.fetch_add(1, Ordering::Relaxed);

        PreviewHandle {
            url,
            registry: self.clone(),
        }
    }

    /// MIME type and bytes behind a live handle
    pub fn resolve(&self, url: &str) -> Option<(String, Arc<[u8]>)> {
        self.inner.live.lock().get(url).cloned()
    }

    pub fn is_live(&self, url: &str) -> bool {
        self.inner.live.lock().contains_key(url)
    }

    pub fn live_count(&self) -> usize {
        self.inner.live.lock().len()
    }

    pub fn created_count(&self) -> usize {
        self.inner.created.load(Ordering::Relaxed)
    }

    pub fn released_count(&self) -> usize {
        self.inner.released.load(Ordering::Relaxed)
    }

    fn revoke(&self, url: &str) {
        if self.inner.live.lock().remove(url).is_some() {
            self.inner.released.fetch_add(1, Ordering::Relaxed);
            debug!("Revoked preview {}", url);
        } else {
            warn!("Preview {} was already revoked", url);
        }
    }
}

/// Owned preview reference. Not `Clone`: exactly one owner releases it.
#[derive(Debug)]
pub struct PreviewHandle {
    url: String,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.revoke(&self.url);
    }
}
