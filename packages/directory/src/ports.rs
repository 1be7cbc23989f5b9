//! Capabilities the controller borrows from its host environment.
//!
//! In the browser these map to `window.confirm` and `setTimeout`; tests use
//! scripted fakes. Durable storage is the third port and lives in
//! [`store::KeyValueStore`].

use std::time::Duration;

/// Asks the user a yes/no question before a destructive action.
pub trait Confirm {
    fn confirm(&self, message: &str) -> impl std::future::Future<Output = bool>;
}

/// Suspends the current task for a while.
pub trait Timer {
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()>;
}
