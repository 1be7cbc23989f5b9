//! # Durable key-value persistence
//!
//! The admin client keeps exactly one piece of durable state between page
//! loads: the raw bearer credential. [`KeyValueStore`] is the narrow port the
//! session layer talks to, so the same session logic runs against browser
//! `localStorage` ([`crate::LocalStorageStore`]) or an in-memory map
//! ([`crate::MemoryStore`]) in tests and native builds.
//!
//! ## Error handling
//!
//! The interface is infallible. Implementations log and swallow backend
//! failures (quota exceeded, storage disabled in private browsing, ...): a
//! broken store degrades to "nothing persisted", which the session layer
//! already treats as an unauthenticated start.

/// Synchronous string key-value storage.
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any.
    fn load(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &str);

    /// Remove `key`. Removing a missing key is a no-op.
    fn remove(&self, key: &str);
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn load(&self, key: &str) -> Option<String> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) {
        (**self).save(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}
