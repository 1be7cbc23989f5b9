//! Test doubles: an in-memory directory server, a scripted confirmation
//! prompt, a tokio-backed timer, and token builders.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use api::{
    ApiError, DirectoryApi, LoginResponse, Pagination, Role, SessionUser, UserDraft, UserQuery,
    UserRecord, UsersPage,
};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use futures::channel::oneshot;
use serde_json::{json, Value};
use store::{AdminConfig, MemoryStore};

use crate::ports::{Confirm, Timer};
use crate::Directory;

pub type TestDirectory = Directory<FakeApi, MemoryStore, ScriptedConfirm>;

pub fn make_token(claims: Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(b"{\"alg\":\"HS256\",\"typ\":\"JWT\"}");
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
    let signature = URL_SAFE_NO_PAD.encode(b"sig");
    format!("{header}.{payload}.{signature}")
}

pub fn admin_token() -> String {
    make_token(json!({
        "id": "admin-1",
        "email": "admin@example.com",
        "name": "Admin",
        "role": "admin"
    }))
}

pub fn user_token() -> String {
    make_token(json!({
        "id": "user-1",
        "email": "user1@example.com",
        "name": "User 1",
        "role": "user"
    }))
}

pub fn sample_users(count: usize) -> Vec<UserRecord> {
    (1..=count)
        .map(|i| UserRecord {
            id: format!("user-{i}"),
            name: format!("User {i}"),
            email: format!("user{i}@example.com"),
            phone: format!("+1202555{i:04}"),
            role: Role::User,
            is_active: true,
            email_verified: false,
            created_at: None,
            last_login: None,
        })
        .collect()
}

/// One request as the fake server saw it.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Login { email: String },
    List { token: String, query: UserQuery },
    Create { token: String, draft: UserDraft },
    Update { token: String, id: String, draft: UserDraft },
    Delete { token: String, id: String },
}

#[derive(Default)]
struct State {
    users: Vec<UserRecord>,
    next_id: usize,
    calls: Vec<Call>,
    prompts: Vec<String>,
    failures: VecDeque<ApiError>,
    list_gates: VecDeque<oneshot::Receiver<Result<UsersPage, ApiError>>>,
    write_gates: VecDeque<oneshot::Receiver<Result<(), ApiError>>>,
    confirm_gates: VecDeque<oneshot::Receiver<bool>>,
    login: Option<Result<LoginResponse, ApiError>>,
}

/// In-memory directory server.
///
/// Clones share state, so a test keeps one handle to script responses and
/// inspect the call log while the directory owns another.
#[derive(Clone, Default)]
pub struct FakeApi {
    state: Rc<RefCell<State>>,
}

impl FakeApi {
    pub fn seed(&self, users: Vec<UserRecord>) {
        let mut state = self.state.borrow_mut();
        state.next_id = users.len() + 1;
        state.users = users;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn list_calls(&self) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| matches!(c, Call::List { .. }))
            .count()
    }

    /// Confirmation prompts shown during the test.
    pub fn prompts(&self) -> Vec<String> {
        self.state.borrow().prompts.clone()
    }

    /// Fail the next request of any kind with `error`.
    pub fn fail_next(&self, error: ApiError) {
        self.state.borrow_mut().failures.push_back(error);
    }

    pub fn script_login(&self, response: Result<LoginResponse, ApiError>) {
        self.state.borrow_mut().login = Some(response);
    }

    /// Hold the next unanswered list request until the sender fires; it
    /// answers with whatever is sent.
    pub fn gate_list(&self) -> oneshot::Sender<Result<UsersPage, ApiError>> {
        let (tx, rx) = oneshot::channel();
        self.state.borrow_mut().list_gates.push_back(rx);
        tx
    }

    /// Hold the next write until the sender fires. `Ok(())` lets the write
    /// go through normally.
    pub fn gate_write(&self) -> oneshot::Sender<Result<(), ApiError>> {
        let (tx, rx) = oneshot::channel();
        self.state.borrow_mut().write_gates.push_back(rx);
        tx
    }

    /// Keep the next confirmation prompt open until the sender answers it.
    /// A dropped sender counts as a decline.
    pub fn gate_confirm(&self) -> oneshot::Sender<bool> {
        let (tx, rx) = oneshot::channel();
        self.state.borrow_mut().confirm_gates.push_back(rx);
        tx
    }

    fn record(&self, call: Call) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(call);
        match state.failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn wait_for_write(&self) -> Result<(), ApiError> {
        let gate = self.state.borrow_mut().write_gates.pop_front();
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(ApiError::Transport("gate dropped".to_string()))),
            None => Ok(()),
        }
    }

    fn not_found() -> ApiError {
        ApiError::Status {
            status: 404,
            message: "User not found".to_string(),
        }
    }
}

impl DirectoryApi for FakeApi {
    async fn login(&self, email: &str, _password: &str) -> Result<LoginResponse, ApiError> {
        self.record(Call::Login {
            email: email.to_string(),
        })?;
        let scripted = self.state.borrow_mut().login.take();
        scripted.unwrap_or_else(|| {
            Ok(LoginResponse {
                token: admin_token(),
                user: Some(SessionUser {
                    id: Some("admin-1".to_string()),
                    name: Some("Admin".to_string()),
                    email: Some(email.to_string()),
                    role: Some(Role::Admin),
                }),
            })
        })
    }

    async fn list_users(&self, token: &str, query: &UserQuery) -> Result<UsersPage, ApiError> {
        self.record(Call::List {
            token: token.to_string(),
            query: query.clone(),
        })?;
        let gate = self.state.borrow_mut().list_gates.pop_front();
        if let Some(rx) = gate {
            return rx
                .await
                .unwrap_or_else(|_| Err(ApiError::Transport("gate dropped".to_string())));
        }

        let state = self.state.borrow();
        let needle = query.search.to_lowercase();
        let matching: Vec<&UserRecord> = state
            .users
            .iter()
            .filter(|u| {
                needle.is_empty()
                    || u.name.to_lowercase().contains(&needle)
                    || u.email.to_lowercase().contains(&needle)
            })
            .collect();
        let limit = query.limit.max(1) as usize;
        let total = matching.len();
        let pages = total.div_ceil(limit) as u32;
        let users = matching
            .into_iter()
            .skip((query.page.max(1) as usize - 1) * limit)
            .take(limit)
            .cloned()
            .collect();
        Ok(UsersPage {
            users,
            pagination: Pagination {
                current: query.page,
                pages,
                total: total as u64,
            },
        })
    }

    async fn create_user(&self, token: &str, draft: &UserDraft) -> Result<UserRecord, ApiError> {
        self.record(Call::Create {
            token: token.to_string(),
            draft: draft.clone(),
        })?;
        self.wait_for_write().await?;

        let mut state = self.state.borrow_mut();
        if state.users.iter().any(|u| u.email == draft.email) {
            return Err(ApiError::Status {
                status: 409,
                message: "Email already in use".to_string(),
            });
        }
        state.next_id = state.next_id.max(state.users.len() + 1);
        let record = UserRecord {
            id: format!("user-{}", state.next_id),
            name: draft.name.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            role: draft.role.unwrap_or_default(),
            is_active: true,
            email_verified: false,
            created_at: None,
            last_login: None,
        };
        state.next_id += 1;
        state.users.push(record.clone());
        Ok(record)
    }

    async fn update_user(
        &self,
        token: &str,
        id: &str,
        draft: &UserDraft,
    ) -> Result<UserRecord, ApiError> {
        self.record(Call::Update {
            token: token.to_string(),
            id: id.to_string(),
            draft: draft.clone(),
        })?;
        self.wait_for_write().await?;

        let mut state = self.state.borrow_mut();
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(Self::not_found)?;
        user.name = draft.name.clone();
        user.email = draft.email.clone();
        user.phone = draft.phone.clone();
        if let Some(role) = draft.role {
            user.role = role;
        }
        Ok(user.clone())
    }

    async fn delete_user(&self, token: &str, id: &str) -> Result<(), ApiError> {
        self.record(Call::Delete {
            token: token.to_string(),
            id: id.to_string(),
        })?;
        self.wait_for_write().await?;

        let mut state = self.state.borrow_mut();
        let before = state.users.len();
        state.users.retain(|u| u.id != id);
        if state.users.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }
}

/// Answers every prompt the same way, unless a gate is queued on the fake
/// server, and logs it there.
pub struct ScriptedConfirm {
    answer: bool,
    log: FakeApi,
}

impl ScriptedConfirm {
    pub fn new(answer: bool, log: FakeApi) -> Self {
        Self { answer, log }
    }
}

impl Confirm for ScriptedConfirm {
    async fn confirm(&self, message: &str) -> bool {
        let gate = {
            let mut state = self.log.state.borrow_mut();
            state.prompts.push(message.to_string());
            state.confirm_gates.pop_front()
        };
        match gate {
            Some(rx) => rx.await.unwrap_or(false),
            None => self.answer,
        }
    }
}

pub struct TokioTimer;

impl Timer for TokioTimer {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

fn build(storage: MemoryStore, answer: bool) -> (TestDirectory, FakeApi, MemoryStore) {
    let api = FakeApi::default();
    let confirm = ScriptedConfirm::new(answer, api.clone());
    let dir = Directory::new(
        api.clone(),
        storage.clone(),
        confirm,
        &AdminConfig::default(),
    );
    (dir, api, storage)
}

/// Directory over a fresh fake server and empty storage; deletes are
/// confirmed.
pub fn fixture() -> (TestDirectory, FakeApi, MemoryStore) {
    build(MemoryStore::new(), true)
}

pub fn fixture_with_storage(storage: MemoryStore) -> (TestDirectory, FakeApi, MemoryStore) {
    build(storage, true)
}

/// Like [`fixture`], but every confirmation prompt is declined.
pub fn fixture_declining() -> (TestDirectory, FakeApi, MemoryStore) {
    build(MemoryStore::new(), false)
}
