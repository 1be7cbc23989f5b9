//! # Directory crate — session-aware controller for the admin client
//!
//! [`Directory`] is the single owner of client-side state: who is logged in,
//! which page of users is showing, whether anything is loading, and the one
//! notification currently on screen. Views read a [`DirectoryView`] snapshot
//! and call operations; they never hold authoritative state themselves.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`credential`] | Decodes a bearer token into an [`Identity`] without a network call |
//! | [`session`] | Login, logout and restore; persists the credential through [`KeyValueStore`] |
//! | [`collection`] | Paged, searchable user list with sequence-numbered fetches |
//! | [`mutation`] | Create, update, delete: role-gated, validated, one at a time |
//! | [`notification`] | Single-slot, auto-expiring message channel |
//! | [`validation`] | Field rules for the account and login forms |
//! | [`pagination`] | Page-button window for the pagination bar |
//! | [`ports`] | [`Confirm`] and [`Timer`] capabilities supplied by the host |
//! | [`error`] | [`ClientError`] |
//!
//! ## Threading
//!
//! Everything runs on one cooperative event loop (the browser's, or a
//! current-thread runtime in tests). State lives in `Cell`/`RefCell` behind an
//! `Rc`; no borrow is held across an `.await`.
//!
//! ## Change notification
//!
//! [`Directory::subscribe`] registers a listener that receives a fresh
//! [`DirectoryView`] after every state change, including the start of a fetch
//! so a spinner can be shown.

pub mod collection;
pub mod credential;
pub mod error;
pub mod mutation;
pub mod notification;
pub mod pagination;
pub mod ports;
pub mod session;
pub mod validation;

#[cfg(test)]
mod testing;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use api::DirectoryApi;
use store::{AdminConfig, KeyValueStore};

pub use collection::{CollectionPage, Query};
pub use credential::Identity;
pub use error::ClientError;
pub use mutation::DELETE_PROMPT;
pub use notification::{Notification, Severity};
pub use pagination::{page_window, PageItem};
pub use ports::{Confirm, Timer};
pub use validation::{Field, FieldError, ValidationErrors};

use collection::Synchronizer;
use notification::NotificationChannel;
use session::SessionStore;

/// Everything a view needs to render, captured at one instant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DirectoryView {
    pub identity: Option<Identity>,
    pub page: CollectionPage,
    pub query: Query,
    /// The most recently issued fetch is still outstanding.
    pub loading: bool,
    /// A create, update or delete is in flight.
    pub mutating: bool,
    pub notification: Option<Notification>,
    pub authenticated: bool,
}

impl DirectoryView {
    pub fn is_admin(&self) -> bool {
        self.identity.as_ref().is_some_and(Identity::is_admin)
    }
}

/// Handle returned by [`Directory::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Listener = Rc<dyn Fn(&DirectoryView)>;

pub(crate) struct Inner<A, S, C> {
    pub(crate) api: A,
    pub(crate) confirm: C,
    pub(crate) page_size: u32,
    pub(crate) session: SessionStore<S>,
    pub(crate) collection: RefCell<Synchronizer>,
    pub(crate) notifications: NotificationChannel,
    pub(crate) mutating: Cell<bool>,
    pub(crate) initialized: Cell<bool>,
    listeners: RefCell<Vec<(Subscription, Listener)>>,
    next_subscription: Cell<u64>,
}

/// The admin client's state controller.
///
/// Cloning is cheap and every clone drives the same state.
pub struct Directory<A, S, C> {
    pub(crate) inner: Rc<Inner<A, S, C>>,
}

impl<A, S, C> Clone for Directory<A, S, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<A, S, C> PartialEq for Directory<A, S, C> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<A, S, C> Directory<A, S, C>
where
    A: DirectoryApi,
    S: KeyValueStore,
    C: Confirm,
{
    pub fn new(api: A, storage: S, confirm: C, config: &AdminConfig) -> Self {
        Self {
            inner: Rc::new(Inner {
                api,
                confirm,
                page_size: config.collection.page_size.max(1),
                session: SessionStore::new(storage, config.session.storage_key.clone()),
                collection: RefCell::new(Synchronizer::default()),
                notifications: NotificationChannel::new(config.notification_ttl()),
                mutating: Cell::new(false),
                initialized: Cell::new(false),
                listeners: RefCell::new(Vec::new()),
                next_subscription: Cell::new(0),
            }),
        }
    }

    /// Snapshot of the current state.
    pub fn view(&self) -> DirectoryView {
        let collection = self.inner.collection.borrow();
        DirectoryView {
            identity: self.inner.session.identity(),
            page: collection.page.clone(),
            query: collection.query.clone(),
            loading: collection.loading(),
            mutating: self.inner.mutating.get(),
            notification: self.inner.notifications.current(),
            authenticated: self.inner.session.is_authenticated(),
        }
    }

    pub fn identity(&self) -> Option<Identity> {
        self.inner.session.identity()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.session.is_authenticated()
    }

    pub fn page(&self) -> CollectionPage {
        self.inner.collection.borrow().page.clone()
    }

    pub fn query(&self) -> Query {
        self.inner.collection.borrow().query.clone()
    }

    pub fn notification(&self) -> Option<Notification> {
        self.inner.notifications.current()
    }

    /// Call `listener` with a fresh snapshot after every state change.
    pub fn subscribe(&self, listener: impl Fn(&DirectoryView) + 'static) -> Subscription {
        let id = Subscription(self.inner.next_subscription.get());
        self.inner.next_subscription.set(id.0 + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, subscription: Subscription) {
        self.inner
            .listeners
            .borrow_mut()
            .retain(|(id, _)| *id != subscription);
    }

    pub(crate) fn notify(&self) {
        // Listeners may call back into the directory, so none of our borrows
        // can be live while they run.
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        if listeners.is_empty() {
            return;
        }
        let view = self.view();
        for listener in listeners {
            listener(&view);
        }
    }

    pub(crate) fn publish(&self, message: impl Into<String>, severity: Severity) -> u64 {
        let id = self.inner.notifications.publish(message, severity);
        self.notify();
        id
    }

    /// Report `err` as an error notification and hand it back.
    pub(crate) fn fail(&self, err: ClientError) -> ClientError {
        self.publish(err.user_message(), Severity::Error);
        err
    }
}
