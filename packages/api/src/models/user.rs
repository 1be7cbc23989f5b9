//! # Managed account records
//!
//! Defines the wire shapes of the `/api/users` resource:
//!
//! ## [`UserRecord`]
//!
//! One account as returned by the server. Historical server versions name the
//! primary key either `id` or `_id` (sometimes both, when virtual ids are
//! enabled), and may send it as a string, a number, or an extended-JSON
//! `{"$oid": "..."}` object. Deserialization goes through a private wire struct
//! that folds every variant into the single canonical [`UserRecord::id`]; a
//! record with no usable identifier is rejected at the boundary so nothing
//! downstream ever has to branch on which field was present.
//!
//! ## [`UsersPage`]
//!
//! A page of records plus [`Pagination`] metadata. The list endpoint answers
//! `{ users, pagination: { current, pages, total } }`; older deployments
//! answer with a bare JSON array, which is accepted as a single page.
//!
//! ## [`UserDraft`]
//!
//! The request body for create/update. A blank or absent password is never
//! serialised, so an update leaves the stored password untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authorization role carried by accounts and credentials.
///
/// Unknown role strings deserialize as [`Role::User`]: an unrecognised role
/// never grants admin rights.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::User
        }
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A primary key as it may appear on the wire.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum WireId {
    Text(String),
    Number(i64),
    Object {
        #[serde(rename = "$oid")]
        oid: String,
    },
}

impl WireId {
    fn into_string(self) -> String {
        match self {
            WireId::Text(s) => s,
            WireId::Number(n) => n.to_string(),
            WireId::Object { oid } => oid,
        }
    }
}

/// Pick the canonical identifier from the `id` / `_id` pair, preferring `id`.
/// Blank strings count as absent.
pub(crate) fn canonical_id(id: Option<WireId>, mongo_id: Option<WireId>) -> Option<String> {
    [id, mongo_id]
        .into_iter()
        .flatten()
        .map(WireId::into_string)
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
}

/// A managed account as cached by the client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "WireUser")]
pub struct UserRecord {
    /// Canonical identifier, normalised from `id` or `_id`.
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub is_active: bool,
    pub email_verified: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireUser {
    id: Option<WireId>,
    #[serde(rename = "_id")]
    mongo_id: Option<WireId>,
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    role: Option<Role>,
    is_active: Option<bool>,
    email_verified: Option<bool>,
    created_at: Option<DateTime<Utc>>,
    last_login: Option<DateTime<Utc>>,
}

impl TryFrom<WireUser> for UserRecord {
    type Error = String;

    fn try_from(wire: WireUser) -> Result<Self, Self::Error> {
        let id = canonical_id(wire.id, wire.mongo_id)
            .ok_or_else(|| "user record has neither `id` nor `_id`".to_string())?;
        Ok(Self {
            id,
            name: wire.name.unwrap_or_default(),
            email: wire.email.unwrap_or_default(),
            phone: wire.phone.unwrap_or_default(),
            role: wire.role.unwrap_or_default(),
            is_active: wire.is_active.unwrap_or(true),
            email_verified: wire.email_verified.unwrap_or(false),
            created_at: wire.created_at,
            last_login: wire.last_login,
        })
    }
}

/// Pagination metadata reported by the list endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub current: u32,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub total: u64,
}

/// One page of the user list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireUsersPage")]
pub struct UsersPage {
    pub users: Vec<UserRecord>,
    pub pagination: Pagination,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireUsersPage {
    Paged {
        users: Vec<UserRecord>,
        pagination: Option<Pagination>,
    },
    Bare(Vec<UserRecord>),
}

impl From<WireUsersPage> for UsersPage {
    fn from(wire: WireUsersPage) -> Self {
        match wire {
            WireUsersPage::Paged { users, pagination } => {
                let pagination = pagination.unwrap_or_else(|| single_page(users.len()));
                Self { users, pagination }
            }
            WireUsersPage::Bare(users) => Self::single_page(users),
        }
    }
}

impl UsersPage {
    /// Wrap an unpaged list as page 1 of 1 (or of 0 when empty).
    pub fn single_page(users: Vec<UserRecord>) -> Self {
        Self {
            pagination: single_page(users.len()),
            users,
        }
    }
}

fn single_page(len: usize) -> Pagination {
    Pagination {
        current: 1,
        pages: u32::from(len > 0),
        total: len as u64,
    }
}

/// Parameters of a list request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserQuery {
    pub page: u32,
    pub limit: u32,
    pub search: String,
}

/// Request body for creating or updating an account.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "password_is_blank")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

fn password_is_blank(password: &Option<String>) -> bool {
    password.as_deref().map_or(true, |p| p.trim().is_empty())
}

impl UserDraft {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            password: None,
            role: None,
        }
    }

    /// Builder method to set the password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Builder method to set the role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Prefill an edit form from an existing record. The password is left
    /// empty so that saving without typing one keeps the stored password.
    pub fn from_record(record: &UserRecord) -> Self {
        Self {
            name: record.name.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            password: None,
            role: Some(record.role),
        }
    }
}
