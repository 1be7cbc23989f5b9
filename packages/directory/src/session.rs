//! # Session store
//!
//! Holds the current credential and the [`Identity`] decoded from it, and
//! mirrors the raw credential into a [`KeyValueStore`] so a reload can pick
//! the session back up.
//!
//! ## States
//!
//! | State | Credential | Identity |
//! |-------|------------|----------|
//! | Unauthenticated | none, storage key absent | `None` |
//! | Authenticated | raw token, persisted | decoded claims |
//!
//! The credential and identity are swapped together in a single assignment,
//! so no reader ever sees one without the other.
//!
//! ## Epochs
//!
//! Every transition (establish, restore, clear) bumps a counter. Async work
//! captures the epoch before it suspends and drops its result if the epoch
//! moved in the meantime; that is how responses arriving after a logout, or
//! after a different user logged in, get ignored.

use std::cell::{Cell, RefCell};

use api::{DirectoryApi, SessionUser};
use store::KeyValueStore;

use crate::collection::Query;
use crate::credential::{self, Identity};
use crate::error::ClientError;
use crate::notification::Severity;
use crate::ports::Confirm;
use crate::validation::validate_login;
use crate::Directory;

#[derive(Clone, Debug)]
struct Session {
    credential: String,
    identity: Identity,
}

pub(crate) struct SessionStore<S> {
    storage: S,
    key: String,
    current: RefCell<Option<Session>>,
    epoch: Cell<u64>,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub(crate) fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            current: RefCell::new(None),
            epoch: Cell::new(0),
        }
    }

    fn bump(&self) {
        self.epoch.set(self.epoch.get() + 1);
    }

    /// Decode `credential`, persist it and make it current.
    ///
    /// A credential that fails to decode ends any existing session.
    pub(crate) fn establish(
        &self,
        credential: &str,
        profile: Option<&SessionUser>,
    ) -> Result<Identity, ClientError> {
        let identity = match credential::decode(credential) {
            Ok(identity) => identity,
            Err(e) => {
                self.clear();
                return Err(e);
            }
        };
        let identity = match profile {
            Some(profile) => identity.with_profile(profile),
            None => identity,
        };

        let credential = credential.trim().to_string();
        self.storage.save(&self.key, &credential);
        *self.current.borrow_mut() = Some(Session {
            credential,
            identity: identity.clone(),
        });
        self.bump();
        Ok(identity)
    }

    /// Pick up a credential persisted by an earlier run.
    ///
    /// `Ok(None)` when nothing was stored. A stored credential that no
    /// longer decodes is deleted.
    pub(crate) fn restore(&self) -> Result<Option<Identity>, ClientError> {
        let Some(stored) = self.storage.load(&self.key) else {
            return Ok(None);
        };
        self.establish(&stored, None).map(Some)
    }

    /// End the session. Returns whether one existed.
    pub(crate) fn clear(&self) -> bool {
        self.storage.remove(&self.key);
        let had = self.current.borrow_mut().take().is_some();
        self.bump();
        had
    }

    pub(crate) fn identity(&self) -> Option<Identity> {
        self.current.borrow().as_ref().map(|s| s.identity.clone())
    }

    pub(crate) fn bearer(&self) -> Option<String> {
        self.current.borrow().as_ref().map(|s| s.credential.clone())
    }

    pub(crate) fn is_authenticated(&self) -> bool {
        self.current.borrow().is_some()
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.epoch.get()
    }
}

impl<A, S, C> Directory<A, S, C>
where
    A: DirectoryApi,
    S: KeyValueStore,
    C: Confirm,
{
    /// Restore a persisted session and load the first page.
    ///
    /// Runs once; later calls return immediately. A corrupt stored
    /// credential is removed and reported, leaving the client logged out.
    pub async fn initialize(&self) -> Result<(), ClientError> {
        if self.inner.initialized.replace(true) {
            return Ok(());
        }

        match self.inner.session.restore() {
            Ok(None) => {
                tracing::debug!("no stored session");
                self.notify();
                Ok(())
            }
            Ok(Some(identity)) => {
                tracing::info!(role = %identity.role, "session restored");
                self.clear_collection();
                self.notify();
                self.fetch(Query::default()).await.map(|_| ())
            }
            Err(e) => {
                tracing::warn!(error = %e, "discarding stored credential");
                self.clear_collection();
                Err(self.fail(e))
            }
        }
    }

    /// Log in with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, ClientError> {
        if let Err(errors) = validate_login(email, password) {
            return Err(self.fail(ClientError::Validation(errors)));
        }

        let email = email.trim();
        let response = match self.inner.api.login(email, password).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "login rejected");
                return Err(self.fail(ClientError::LoginFailed(e)));
            }
        };
        self.establish(&response.token, response.user.as_ref()).await
    }

    /// Start a session from an already issued credential.
    pub async fn login_with_token(&self, credential: &str) -> Result<Identity, ClientError> {
        self.establish(credential, None).await
    }

    async fn establish(
        &self,
        credential: &str,
        profile: Option<&SessionUser>,
    ) -> Result<Identity, ClientError> {
        let identity = match self.inner.session.establish(credential, profile) {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!(error = %e, "credential rejected");
                self.clear_collection();
                return Err(self.fail(e));
            }
        };

        tracing::info!(role = %identity.role, "logged in");
        self.clear_collection();
        self.publish(
            format!("Welcome, {}!", identity.display_name()),
            Severity::Success,
        );
        // A failed first load is already reported and does not undo the login.
        let _ = self.fetch(Query::default()).await;
        Ok(identity)
    }

    /// End the session. Safe to call when already logged out.
    pub fn logout(&self) {
        let had_session = self.inner.session.clear();
        self.clear_collection();
        if had_session {
            tracing::info!("logged out");
            self.inner
                .notifications
                .publish("You have been logged out", Severity::Info);
        }
        self.notify();
    }
}
