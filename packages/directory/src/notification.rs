//! Single-slot notification channel.
//!
//! At most one [`Notification`] is outstanding. Publishing replaces it,
//! dismissing clears it. Every notification gets a fresh id so an auto-clear
//! timer started for an older one can tell it has been replaced and must not
//! clear the newer message.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::time::Duration;

use api::DirectoryApi;
use store::KeyValueStore;

use crate::ports::{Confirm, Timer};
use crate::Directory;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
}

pub(crate) struct NotificationChannel {
    slot: RefCell<Option<Notification>>,
    next_id: Cell<u64>,
    ttl: Duration,
}

impl NotificationChannel {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            slot: RefCell::new(None),
            next_id: Cell::new(1),
            ttl,
        }
    }

    pub(crate) fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Replace the outstanding notification. Returns the new id.
    pub(crate) fn publish(&self, message: impl Into<String>, severity: Severity) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let message = message.into();
        tracing::debug!(id, %severity, %message, "notification published");
        *self.slot.borrow_mut() = Some(Notification {
            id,
            message,
            severity,
        });
        id
    }

    /// Clear whatever is showing. Returns whether anything was cleared.
    pub(crate) fn dismiss(&self) -> bool {
        self.slot.borrow_mut().take().is_some()
    }

    /// Clear the notification only if it is still `id`.
    pub(crate) fn expire(&self, id: u64) -> bool {
        let mut slot = self.slot.borrow_mut();
        if slot.as_ref().is_some_and(|n| n.id == id) {
            *slot = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn current(&self) -> Option<Notification> {
        self.slot.borrow().clone()
    }
}

impl<A, S, C> Directory<A, S, C>
where
    A: DirectoryApi,
    S: KeyValueStore,
    C: Confirm,
{
    pub fn dismiss_notification(&self) {
        if self.inner.notifications.dismiss() {
            self.notify();
        }
    }

    /// Clear notification `id` if it has not been replaced or dismissed.
    pub fn expire_notification(&self, id: u64) {
        if self.inner.notifications.expire(id) {
            self.notify();
        }
    }

    /// Wait out the configured lifetime, then expire notification `id`.
    ///
    /// The view starts one of these per notification id it sees. A timer
    /// outliving its notification is harmless: [`expire_notification`]
    /// ignores ids that are no longer showing.
    ///
    /// [`expire_notification`]: Directory::expire_notification
    pub async fn run_notification_timer(&self, id: u64, timer: &impl Timer) {
        timer.sleep(self.inner.notifications.ttl()).await;
        self.expire_notification(id);
    }
}
