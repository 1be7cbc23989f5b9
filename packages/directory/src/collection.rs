//! # Collection synchronizer
//!
//! Owns the page of user records the view renders and keeps it in step with
//! the server.
//!
//! ## Ordering
//!
//! Fetches are not queued: a new one is sent while older ones are still in
//! flight. Each gets a sequence number when it is issued, and a response is
//! applied only if its number is higher than the last one applied. A slow
//! response to an earlier request can therefore never overwrite a newer
//! page, whatever order the network delivers them in.
//!
//! `loading` tracks the most recently issued fetch only. It clears when that
//! request resolves, even if older ones are still outstanding.
//!
//! The retained [`Query`] is the one that produced the page on screen. It
//! changes when a response is applied, not when a request is sent, so a
//! failed or superseded request never leaves the query and the page out of
//! step, and `refresh` always repeats what is shown.
//!
//! ## Failure
//!
//! A failed fetch leaves the current page untouched and reports one error
//! notification. A response that arrives after the session changed is
//! dropped without any side effect.

use api::{DirectoryApi, UserQuery, UserRecord, UsersPage};
use store::KeyValueStore;

use crate::error::ClientError;
use crate::ports::Confirm;
use crate::Directory;

/// Page and search term of a list request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    pub page: u32,
    pub search: String,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            page: 1,
            search: String::new(),
        }
    }
}

impl Query {
    /// Page numbers below 1 are raised to 1. The term is trimmed.
    pub fn new(page: u32, search: impl Into<String>) -> Self {
        Self {
            page: page.max(1),
            search: search.into().trim().to_string(),
        }
    }
}

/// The records currently shown and where they sit in the full result set.
#[derive(Clone, Debug, PartialEq)]
pub struct CollectionPage {
    pub records: Vec<UserRecord>,
    pub current_page: u32,
    /// 0 only when there are no records at all.
    pub total_pages: u32,
    pub total_count: u64,
}

impl Default for CollectionPage {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            current_page: 1,
            total_pages: 0,
            total_count: 0,
        }
    }
}

impl CollectionPage {
    /// Build a page from a list response, repairing metadata that breaks
    /// `1 <= current_page <= total_pages` and dropping records beyond
    /// `page_size`.
    pub fn from_response(response: UsersPage, page_size: u32) -> Self {
        let UsersPage {
            mut users,
            pagination,
        } = response;
        users.truncate(page_size.max(1) as usize);

        let mut total_pages = pagination.pages;
        if total_pages == 0 && !users.is_empty() {
            total_pages = pagination.current.max(1);
        }
        let current_page = if total_pages == 0 {
            1
        } else {
            pagination.current.clamp(1, total_pages)
        };
        let total_count = pagination.total.max(users.len() as u64);

        Self {
            records: users,
            current_page,
            total_pages,
            total_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Look up a record on this page.
    pub fn find(&self, id: &str) -> Option<&UserRecord> {
        self.records.iter().find(|r| r.id == id)
    }
}

/// Bookkeeping for in-flight fetches.
#[derive(Debug, Default)]
pub(crate) struct Synchronizer {
    pub(crate) page: CollectionPage,
    pub(crate) query: Query,
    issued: u64,
    applied: u64,
    pending: Option<u64>,
}

impl Synchronizer {
    /// Record a new request and return its sequence number.
    fn begin(&mut self) -> u64 {
        self.issued += 1;
        self.pending = Some(self.issued);
        self.issued
    }

    /// Apply `page`, fetched for `query`, if no newer response has been
    /// applied yet.
    fn apply(&mut self, seq: u64, query: Query, page: CollectionPage) -> bool {
        if seq <= self.applied {
            return false;
        }
        self.applied = seq;
        self.query = query;
        self.page = page;
        true
    }

    fn settle(&mut self, seq: u64) {
        if self.pending == Some(seq) {
            self.pending = None;
        }
    }

    /// Empty the page and disown every request issued so far.
    pub(crate) fn reset(&mut self) {
        self.page = CollectionPage::default();
        self.query = Query::default();
        self.applied = self.issued;
        self.pending = None;
    }

    pub(crate) fn loading(&self) -> bool {
        self.pending.is_some()
    }
}

impl<A, S, C> Directory<A, S, C>
where
    A: DirectoryApi,
    S: KeyValueStore,
    C: Confirm,
{
    /// Load the page described by `query`.
    ///
    /// Without a session this does nothing and returns the current page.
    /// Otherwise the result is the page being shown once this request has
    /// settled, which is a newer one if this response was superseded.
    pub async fn fetch(&self, query: Query) -> Result<CollectionPage, ClientError> {
        let Some(token) = self.inner.session.bearer() else {
            tracing::warn!("fetch without a session ignored");
            return Ok(self.page());
        };
        let epoch = self.inner.session.epoch();
        let request = UserQuery {
            page: query.page,
            limit: self.inner.page_size,
            search: query.search.clone(),
        };
        let seq = self.inner.collection.borrow_mut().begin();
        tracing::debug!(seq, page = request.page, search = %request.search, "fetching users");
        self.notify();

        let result = self.inner.api.list_users(&token, &request).await;

        self.inner.collection.borrow_mut().settle(seq);
        if self.inner.session.epoch() != epoch {
            tracing::debug!(seq, "session changed, dropping list response");
            self.notify();
            return Ok(self.page());
        }

        match result {
            Ok(response) => {
                let page = CollectionPage::from_response(response, self.inner.page_size);
                let applied = self.inner.collection.borrow_mut().apply(seq, query, page);
                if applied {
                    tracing::debug!(seq, page = request.page, "users loaded");
                } else {
                    tracing::debug!(seq, "superseded list response dropped");
                }
                self.notify();
                Ok(self.page())
            }
            Err(e) => {
                tracing::error!(seq, status = ?e.status(), error = %e, "failed to load users");
                Err(self.fail(ClientError::FetchFailed(e)))
            }
        }
    }

    pub async fn fetch_page(
        &self,
        page: u32,
        search: &str,
    ) -> Result<CollectionPage, ClientError> {
        self.fetch(Query::new(page, search)).await
    }

    /// Search from the first page.
    pub async fn search(&self, term: &str) -> Result<CollectionPage, ClientError> {
        self.fetch(Query::new(1, term)).await
    }

    /// Move to `page`, keeping the current search term.
    pub async fn go_to_page(&self, page: u32) -> Result<CollectionPage, ClientError> {
        let search = self.query().search;
        self.fetch(Query::new(page, search)).await
    }

    /// Re-request the query of the page on screen.
    pub async fn refresh(&self) -> Result<CollectionPage, ClientError> {
        self.fetch(self.query()).await
    }

    pub(crate) fn clear_collection(&self) {
        self.inner.collection.borrow_mut().reset();
    }
}
