//! # Mutation coordinator
//!
//! Create, update and delete for user records. Each operation checks, in
//! order and without touching the network:
//!
//! 1. an admin session exists ([`ClientError::Unauthorized`]),
//! 2. the record id is non-empty, for update and delete ([`ClientError::InvalidIdentifier`]),
//! 3. the draft is valid, for create and update ([`ClientError::Validation`]),
//! 4. no other mutation is in flight ([`ClientError::MutationInProgress`]).
//!
//! Delete additionally asks the [`Confirm`] port; a declined prompt ends the
//! operation quietly. If the session ends or changes while the prompt is
//! open, nothing is sent and the delete fails with `Unauthorized`.
//!
//! Then exactly one write request is sent. Success publishes a success
//! notification and re-fetches the current query; the mutation slot is held
//! until that re-fetch settles. Failure publishes one
//! error notification carrying the server's reason and leaves the page as
//! it was.

use std::cell::Cell;

use api::{DirectoryApi, UserDraft, UserRecord};
use store::KeyValueStore;

use crate::error::ClientError;
use crate::notification::Severity;
use crate::ports::Confirm;
use crate::validation::{normalize_draft, validate_draft, DraftKind};
use crate::Directory;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this user?";

/// Holds the single mutation slot until dropped.
struct MutationGuard<'a> {
    busy: &'a Cell<bool>,
}

impl Drop for MutationGuard<'_> {
    fn drop(&mut self) {
        self.busy.set(false);
    }
}

impl<A, S, C> Directory<A, S, C>
where
    A: DirectoryApi,
    S: KeyValueStore,
    C: Confirm,
{
    /// Bearer credential of an admin session, or why there is none.
    fn authorize(&self, action: &str) -> Result<String, ClientError> {
        let Some(identity) = self.inner.session.identity() else {
            return Err(ClientError::Unauthorized(format!(
                "Please log in to {action} users"
            )));
        };
        if !identity.is_admin() {
            return Err(ClientError::Unauthorized(format!(
                "Only administrators can {action} users"
            )));
        }
        self.inner
            .session
            .bearer()
            .ok_or_else(|| ClientError::Unauthorized(format!("Please log in to {action} users")))
    }

    fn begin_mutation(&self) -> Result<MutationGuard<'_>, ClientError> {
        if self.inner.mutating.replace(true) {
            return Err(ClientError::MutationInProgress);
        }
        self.notify();
        Ok(MutationGuard {
            busy: &self.inner.mutating,
        })
    }

    /// Validate and normalize a draft for `kind`.
    fn prepare(&self, draft: &UserDraft, kind: DraftKind) -> Result<UserDraft, ClientError> {
        validate_draft(draft, kind).map_err(ClientError::Validation)?;
        Ok(normalize_draft(draft))
    }

    fn check_id(id: &str) -> Result<&str, ClientError> {
        let id = id.trim();
        if id.is_empty() {
            Err(ClientError::InvalidIdentifier)
        } else {
            Ok(id)
        }
    }

    /// Shared tail of every write: report, then resync on success.
    ///
    /// The mutation slot stays taken until the resync has settled.
    async fn finish<T>(
        &self,
        guard: MutationGuard<'_>,
        epoch: u64,
        result: Result<T, api::ApiError>,
        success: &str,
    ) -> Result<T, ClientError> {
        if self.inner.session.epoch() != epoch {
            tracing::debug!("session changed during mutation, skipping follow-up");
            drop(guard);
            self.notify();
            return result.map_err(ClientError::MutationFailed);
        }

        match result {
            Ok(value) => {
                tracing::info!("{success}");
                self.publish(success, Severity::Success);
                // A failed resync reports itself; the write still succeeded.
                let _ = self.refresh().await;
                drop(guard);
                self.notify();
                Ok(value)
            }
            Err(e) => {
                drop(guard);
                tracing::error!(status = ?e.status(), error = %e, "mutation failed");
                Err(self.fail(ClientError::MutationFailed(e)))
            }
        }
    }

    pub async fn create_record(&self, draft: &UserDraft) -> Result<UserRecord, ClientError> {
        let checked = self
            .authorize("create")
            .and_then(|token| Ok((token, self.prepare(draft, DraftKind::Create)?)));
        let (token, draft) = checked.map_err(|e| self.fail(e))?;
        let guard = self.begin_mutation().map_err(|e| self.fail(e))?;

        let epoch = self.inner.session.epoch();
        tracing::debug!(email = %draft.email, "creating user");
        let result = self.inner.api.create_user(&token, &draft).await;
        self.finish(guard, epoch, result, "User created successfully")
            .await
    }

    pub async fn update_record(
        &self,
        id: &str,
        draft: &UserDraft,
    ) -> Result<UserRecord, ClientError> {
        let checked = self.authorize("update").and_then(|token| {
            let id = Self::check_id(id)?;
            Ok((token, id, self.prepare(draft, DraftKind::Update)?))
        });
        let (token, id, draft) = checked.map_err(|e| self.fail(e))?;
        let guard = self.begin_mutation().map_err(|e| self.fail(e))?;

        let epoch = self.inner.session.epoch();
        tracing::debug!(id, "updating user");
        let result = self.inner.api.update_user(&token, id, &draft).await;
        self.finish(guard, epoch, result, "User updated successfully")
            .await
    }

    /// Delete a record after the user confirms.
    ///
    /// `Ok(false)` means the prompt was declined and nothing was sent.
    pub async fn delete_record(&self, id: &str) -> Result<bool, ClientError> {
        let checked = self
            .authorize("delete")
            .and_then(|token| Ok((token, Self::check_id(id)?)));
        let (token, id) = checked.map_err(|e| self.fail(e))?;
        let guard = self.begin_mutation().map_err(|e| self.fail(e))?;
        let epoch = self.inner.session.epoch();

        if !self.inner.confirm.confirm(DELETE_PROMPT).await {
            tracing::debug!(id, "delete declined");
            drop(guard);
            self.notify();
            return Ok(false);
        }
        // The prompt may have outlived the session that opened it
        if self.inner.session.epoch() != epoch {
            tracing::debug!(id, "session changed while confirming, delete not sent");
            drop(guard);
            self.notify();
            return Err(ClientError::Unauthorized(
                "Session changed before the delete was confirmed".to_string(),
            ));
        }

        tracing::debug!(id, "deleting user");
        let result = self.inner.api.delete_user(&token, id).await;
        self.finish(guard, epoch, result, "User deleted successfully")
            .await
            .map(|()| true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use crate::testing::{
        admin_token, fixture, fixture_declining, sample_users, user_token, Call, TestDirectory,
    };
    use crate::validation::Field;
    use api::{ApiError, UsersPage};

    fn valid_draft() -> UserDraft {
        UserDraft::new("A", "a@x.com", "+12025550123").with_password("Abcdef12")
    }

    fn writes(calls: &[Call]) -> usize {
        calls.iter().filter(|c| !matches!(c, Call::List { .. })).count()
    }

    fn creates(calls: &[Call]) -> usize {
        calls.iter().filter(|c| matches!(c, Call::Create { .. })).count()
    }

    /// Count notifications published from now on.
    fn count_notifications(dir: &TestDirectory) -> Rc<Cell<usize>> {
        let published = Rc::new(Cell::new(0));
        let last_id = Cell::new(dir.view().notification.map(|n| n.id));
        let counter = published.clone();
        dir.subscribe(move |view| {
            let id = view.notification.as_ref().map(|n| n.id);
            if id.is_some() && id != last_id.get() {
                counter.set(counter.get() + 1);
                last_id.set(id);
            }
        });
        published
    }

    #[tokio::test]
    async fn test_create_refetches_current_page() {
        let (dir, api, _) = fixture();
        api.seed(sample_users(12));
        dir.login_with_token(&admin_token()).await.unwrap();
        dir.fetch_page(2, "").await.unwrap();
        let before = api.calls().len();

        let record = dir.create_record(&valid_draft()).await.unwrap();
        assert_eq!(record.name, "A");

        let calls = api.calls();
        assert_eq!(calls.len(), before + 2);
        assert!(matches!(calls[before], Call::Create { .. }));
        match &calls[before + 1] {
            Call::List { query, .. } => assert_eq!(query.page, 2),
            other => panic!("expected re-fetch, got {other:?}"),
        }

        let view = dir.view();
        assert_eq!(view.page.total_count, 13);
        assert!(!view.mutating);
        let notification = view.notification.unwrap();
        assert_eq!(notification.severity, Severity::Success);
        assert_eq!(notification.message, "User created successfully");
    }

    #[tokio::test]
    async fn test_create_validation_names_field_and_skips_network() {
        let (dir, api, _) = fixture();
        dir.login_with_token(&admin_token()).await.unwrap();
        let before = api.calls().len();

        let mut draft = valid_draft();
        draft.email = "not-an-email".to_string();
        match dir.create_record(&draft).await {
            Err(ClientError::Validation(errors)) => assert!(errors.has(Field::Email)),
            other => panic!("expected validation error, got {other:?}"),
        }

        for field in [Field::Name, Field::Email, Field::Phone, Field::Password] {
            let mut draft = valid_draft();
            match field {
                Field::Name => draft.name.clear(),
                Field::Email => draft.email.clear(),
                Field::Phone => draft.phone.clear(),
                Field::Password => draft.password = None,
            }
            match dir.create_record(&draft).await {
                Err(ClientError::Validation(errors)) => assert!(errors.has(field)),
                other => panic!("expected validation error for {field}, got {other:?}"),
            }
        }

        assert_eq!(api.calls().len(), before);
        assert_eq!(dir.view().notification.unwrap().severity, Severity::Error);
    }

    #[tokio::test]
    async fn test_update_omits_blank_password() {
        let (dir, api, _) = fixture();
        api.seed(sample_users(3));
        dir.login_with_token(&admin_token()).await.unwrap();

        let draft = UserDraft::new("Renamed", "user1@example.com", "+12025550101").with_password("");
        let record = dir.update_record("user-1", &draft).await.unwrap();
        assert_eq!(record.name, "Renamed");

        let sent = api
            .calls()
            .into_iter()
            .find_map(|c| match c {
                Call::Update { id, draft, .. } => Some((id, draft)),
                _ => None,
            })
            .unwrap();
        assert_eq!(sent.0, "user-1");
        assert_eq!(sent.1.password, None);
        let body = serde_json::to_value(&sent.1).unwrap();
        assert!(body.get("password").is_none());
    }

    #[tokio::test]
    async fn test_update_requires_id() {
        let (dir, api, _) = fixture();
        dir.login_with_token(&admin_token()).await.unwrap();
        let before = api.calls().len();

        let result = dir.update_record("  ", &valid_draft()).await;
        assert!(matches!(result, Err(ClientError::InvalidIdentifier)));
        assert_eq!(api.calls().len(), before);
    }

    #[tokio::test]
    async fn test_delete_confirmed_sends_one_delete_then_one_refetch() {
        let (dir, api, _) = fixture();
        api.seed(sample_users(3));
        dir.login_with_token(&admin_token()).await.unwrap();
        let before = api.calls().len();

        assert!(dir.delete_record("user-2").await.unwrap());

        let calls = api.calls();
        assert_eq!(calls.len(), before + 2);
        assert!(matches!(&calls[before], Call::Delete { id, .. } if id == "user-2"));
        assert!(matches!(calls[before + 1], Call::List { .. }));
        assert_eq!(dir.view().page.records.len(), 2);
        assert_eq!(api.prompts(), vec![DELETE_PROMPT.to_string()]);
    }

    #[tokio::test]
    async fn test_delete_declined_sends_nothing() {
        let (dir, api, _) = fixture_declining();
        api.seed(sample_users(3));
        dir.login_with_token(&admin_token()).await.unwrap();
        let before = api.calls().len();
        let notification = dir.view().notification;

        assert!(!dir.delete_record("user-2").await.unwrap());
        assert_eq!(api.calls().len(), before);
        assert_eq!(dir.view().notification, notification);
        assert!(!dir.view().mutating);
    }

    #[tokio::test]
    async fn test_delete_requires_id() {
        let (dir, api, _) = fixture();
        dir.login_with_token(&admin_token()).await.unwrap();

        let result = dir.delete_record("").await;
        assert!(matches!(result, Err(ClientError::InvalidIdentifier)));
        assert!(api.prompts().is_empty());
        assert_eq!(writes(&api.calls()), 0);
    }

    #[tokio::test]
    async fn test_non_admin_delete_is_unauthorized() {
        let (dir, api, _) = fixture();
        api.seed(sample_users(3));
        dir.login_with_token(&user_token()).await.unwrap();
        let before = api.calls().len();

        let result = dir.delete_record("user-1").await;
        assert!(matches!(result, Err(ClientError::Unauthorized(_))));
        assert_eq!(api.calls().len(), before);
        assert!(api.prompts().is_empty());
        assert_eq!(
            dir.view().notification.unwrap().message,
            "Only administrators can delete users"
        );
    }

    #[tokio::test]
    async fn test_mutations_without_session_are_unauthorized() {
        let (dir, api, _) = fixture();
        assert!(matches!(
            dir.create_record(&valid_draft()).await,
            Err(ClientError::Unauthorized(_))
        ));
        assert!(matches!(
            dir.update_record("user-1", &valid_draft()).await,
            Err(ClientError::Unauthorized(_))
        ));
        assert!(matches!(
            dir.delete_record("user-1").await,
            Err(ClientError::Unauthorized(_))
        ));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_page_untouched() {
        let (dir, api, _) = fixture();
        api.seed(sample_users(5));
        dir.login_with_token(&admin_token()).await.unwrap();
        let before = dir.view().page;
        let calls_before = api.calls().len();

        api.fail_next(ApiError::Status {
            status: 409,
            message: "Email already in use".to_string(),
        });
        let published = count_notifications(&dir);
        let result = dir.create_record(&valid_draft()).await;

        assert!(matches!(result, Err(ClientError::MutationFailed(_))));
        let view = dir.view();
        assert_eq!(view.page, before);
        assert_eq!(api.calls().len(), calls_before + 1);
        assert_eq!(published.get(), 1);
        let notification = view.notification.unwrap();
        assert_eq!(notification.severity, Severity::Error);
        assert_eq!(notification.message, "Email already in use");
    }

    #[tokio::test]
    async fn test_concurrent_mutation_is_rejected() {
        let (dir, api, _) = fixture();
        dir.login_with_token(&admin_token()).await.unwrap();

        let draft = valid_draft();
        let gate = api.gate_write();
        let driver = async {
            tokio::task::yield_now().await;
            assert!(dir.view().mutating);
            let second = dir.create_record(&draft).await;
            assert!(matches!(second, Err(ClientError::MutationInProgress)));
            let _ = gate.send(Ok(()));
        };
        let (first, ()) = futures::join!(dir.create_record(&draft), driver);

        assert!(first.is_ok());
        assert!(!dir.view().mutating);
        assert_eq!(creates(&api.calls()), 1);
    }

    #[tokio::test]
    async fn test_logout_during_mutation_skips_follow_up() {
        let (dir, api, _) = fixture();
        dir.login_with_token(&admin_token()).await.unwrap();
        let before = api.calls().len();

        let draft = valid_draft();
        let gate = api.gate_write();
        let driver = async {
            tokio::task::yield_now().await;
            dir.logout();
            let _ = gate.send(Ok(()));
        };
        let (result, ()) = futures::join!(dir.create_record(&draft), driver);

        assert!(result.is_ok());
        let view = dir.view();
        assert!(!view.mutating);
        assert!(view.page.records.is_empty());
        assert_eq!(view.notification.unwrap().message, "You have been logged out");
        // The create went out; no re-fetch followed it.
        assert_eq!(api.calls().len(), before + 1);
    }
    #[tokio::test]
    async fn test_mutation_slot_held_until_resync_settles() {
        let (dir, api, _) = fixture();
        dir.login_with_token(&admin_token()).await.unwrap();

        let first = valid_draft();
        let second = UserDraft::new("B", "b@x.com", "+12025550124").with_password("Abcdef12");
        let resync = api.gate_list();
        let driver = async {
            tokio::task::yield_now().await;
            assert!(dir.view().loading);
            assert!(dir.view().mutating);
            let result = dir.create_record(&second).await;
            assert!(matches!(result, Err(ClientError::MutationInProgress)));
            let _ = resync.send(Ok(UsersPage::single_page(Vec::new())));
        };
        let (result, ()) = futures::join!(dir.create_record(&first), driver);

        assert!(result.is_ok());
        assert!(!dir.view().mutating);
        assert_eq!(creates(&api.calls()), 1);
    }

    #[tokio::test]
    async fn test_logout_while_confirming_sends_no_delete() {
        let (dir, api, _) = fixture();
        api.seed(sample_users(3));
        dir.login_with_token(&admin_token()).await.unwrap();
        let before = api.calls().len();

        let answer = api.gate_confirm();
        let driver = async {
            tokio::task::yield_now().await;
            assert!(dir.view().mutating);
            dir.logout();
            let _ = answer.send(true);
        };
        let (result, ()) = futures::join!(dir.delete_record("user-2"), driver);

        assert!(matches!(result, Err(ClientError::Unauthorized(_))));
        assert_eq!(api.calls().len(), before);
        assert_eq!(api.prompts(), vec![DELETE_PROMPT.to_string()]);
        let view = dir.view();
        assert!(!view.authenticated);
        assert!(!view.mutating);
        assert_eq!(view.notification.unwrap().message, "You have been logged out");
    }

    #[tokio::test]
    async fn test_session_switch_while_confirming_sends_no_delete() {
        let (dir, api, _) = fixture();
        api.seed(sample_users(3));
        dir.login_with_token(&admin_token()).await.unwrap();

        let answer = api.gate_confirm();
        let driver = async {
            tokio::task::yield_now().await;
            dir.logout();
            dir.login_with_token(&admin_token()).await.unwrap();
            let _ = answer.send(true);
        };
        let (result, ()) = futures::join!(dir.delete_record("user-2"), driver);

        assert!(matches!(result, Err(ClientError::Unauthorized(_))));
        assert_eq!(writes(&api.calls()), 0);
        assert_eq!(dir.view().page.records.len(), 3);
    }

    #[tokio::test]
    async fn test_update_network_fault_reports_once() {
        let (dir, api, _) = fixture();
        api.seed(sample_users(5));
        dir.login_with_token(&admin_token()).await.unwrap();
        let before = dir.view().page;
        let calls_before = api.calls().len();

        api.fail_next(ApiError::Transport("connection reset".to_string()));
        let published = count_notifications(&dir);
        let result = dir.update_record("user-1", &valid_draft()).await;

        match result {
            Err(ClientError::MutationFailed(ApiError::Transport(_))) => {}
            other => panic!("expected a transport failure, got {other:?}"),
        }
        let view = dir.view();
        assert_eq!(view.page, before);
        assert!(!view.mutating);
        assert_eq!(api.calls().len(), calls_before + 1);
        assert_eq!(api.list_calls(), 1);
        assert_eq!(published.get(), 1);
        let notification = view.notification.unwrap();
        assert_eq!(notification.severity, Severity::Error);
        assert_eq!(notification.message, "Could not reach the server");
    }

    #[tokio::test]
    async fn test_delete_missing_record_reports_server_reason() {
        let (dir, api, _) = fixture();
        api.seed(sample_users(3));
        dir.login_with_token(&admin_token()).await.unwrap();
        let before = dir.view().page;
        let calls_before = api.calls().len();

        let published = count_notifications(&dir);
        let result = dir.delete_record("user-99").await;

        match result {
            Err(ClientError::MutationFailed(e)) => assert_eq!(e.status(), Some(404)),
            other => panic!("expected a 404, got {other:?}"),
        }
        let view = dir.view();
        assert_eq!(view.page, before);
        assert!(!view.mutating);
        assert_eq!(api.calls().len(), calls_before + 1);
        assert!(matches!(api.calls().last(), Some(Call::Delete { .. })));
        assert_eq!(published.get(), 1);
        let notification = view.notification.unwrap();
        assert_eq!(notification.severity, Severity::Error);
        assert_eq!(notification.message, "User not found");
    }
}
