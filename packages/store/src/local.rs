//! # localStorage store — browser-side persistence
//!
//! [`LocalStorageStore`] is the [`KeyValueStore`] used on the **web platform**.
//! It writes through to `window.localStorage`, so the credential survives a
//! page reload exactly like the browser-global it replaces.
//!
//! Every call looks the `Storage` object up again instead of caching it: the
//! handle is not `Clone`, and the lookup is a cheap property read.
//!
//! Errors (no window, storage disabled, quota exceeded) are logged and
//! swallowed. A missing value reads as "not logged in".

use crate::kv::KeyValueStore;

/// `window.localStorage`-backed KeyValueStore for the web platform.
#[derive(Clone, Debug, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage(&self) -> Option<web_sys::Storage> {
        let window = web_sys::window()?;
        match window.local_storage() {
            Ok(storage) => storage,
            Err(e) => {
                tracing::warn!("localStorage unavailable: {:?}", e);
                None
            }
        }
    }
}

impl KeyValueStore for LocalStorageStore {
    fn load(&self, key: &str) -> Option<String> {
        let storage = self.storage()?;
        match storage.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, "localStorage read failed: {:?}", e);
                None
            }
        }
    }

    fn save(&self, key: &str, value: &str) {
        let Some(storage) = self.storage() else {
            return;
        };
        if let Err(e) = storage.set_item(key, value) {
            tracing::warn!(key, "localStorage write failed: {:?}", e);
        }
    }

    fn remove(&self, key: &str) {
        let Some(storage) = self.storage() else {
            return;
        };
        if let Err(e) = storage.remove_item(key) {
            tracing::warn!(key, "localStorage remove failed: {:?}", e);
        }
    }
}
