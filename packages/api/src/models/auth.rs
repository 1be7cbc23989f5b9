//! Login request/response shapes.

use serde::{Deserialize, Serialize};

use super::user::{canonical_id, Role, WireId};

/// Body of `POST /api/auth/login`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Profile returned next to the token. Every field is optional: the token's
/// own claims are authoritative and this only fills gaps.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireSessionUser")]
pub struct SessionUser {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

#[derive(Deserialize)]
struct WireSessionUser {
    id: Option<WireId>,
    #[serde(rename = "_id")]
    mongo_id: Option<WireId>,
    name: Option<String>,
    email: Option<String>,
    role: Option<Role>,
}

impl From<WireSessionUser> for SessionUser {
    fn from(wire: WireSessionUser) -> Self {
        Self {
            id: canonical_id(wire.id, wire.mongo_id),
            name: wire.name,
            email: wire.email,
            role: wire.role,
        }
    }
}

/// Successful login: the bearer token plus an optional profile.
///
/// Early server versions answered with the bare token as a JSON string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireLoginResponse")]
pub struct LoginResponse {
    pub token: String,
    pub user: Option<SessionUser>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireLoginResponse {
    Full {
        token: String,
        user: Option<SessionUser>,
    },
    Bare(String),
}

impl From<WireLoginResponse> for LoginResponse {
    fn from(wire: WireLoginResponse) -> Self {
        match wire {
            WireLoginResponse::Full { token, user } => Self { token, user },
            WireLoginResponse::Bare(token) => Self { token, user: None },
        }
    }
}
