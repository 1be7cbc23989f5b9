//! # Credential codec
//!
//! Turns a bearer token into an [`Identity`] without asking the server. The
//! token is a JWT-shaped string: three dot-separated base64url segments
//! (header, claims, signature). Only the claims segment is read; the signature
//! is the server's business.
//!
//! The only mandatory claim is `role`. `id` (or `_id` / `userId`), `name`
//! and `email` are picked up when present and left as `None` otherwise.

use api::{Role, SessionUser};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ClientError;

/// Who the current credential belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Name for greetings, falling back to the email address.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("there")
    }

    /// Fill claims the token left out from the login response's profile.
    /// The token stays authoritative: present claims, and the role, are never
    /// overwritten.
    pub fn with_profile(mut self, profile: &SessionUser) -> Self {
        if self.id.is_none() {
            self.id = profile.id.clone();
        }
        if self.name.is_none() {
            self.name = profile.name.clone();
        }
        if self.email.is_none() {
            self.email = profile.email.clone();
        }
        self
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    id: Option<Value>,
    #[serde(rename = "_id")]
    mongo_id: Option<Value>,
    user_id: Option<Value>,
    name: Option<String>,
    email: Option<String>,
    role: Role,
}

fn claim_string(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decode a bearer credential into an [`Identity`].
pub fn decode(raw: &str) -> Result<Identity, ClientError> {
    let segments: Vec<&str> = raw.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(ClientError::MalformedCredential(format!(
            "expected 3 segments, found {}",
            segments.len()
        )));
    }

    let payload = segments[1].trim_end_matches('=');
    if payload.is_empty() {
        return Err(ClientError::MalformedCredential(
            "empty claims segment".to_string(),
        ));
    }
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| ClientError::MalformedCredential(format!("claims are not base64url: {e}")))?;
    let claims: Claims = serde_json::from_slice(&bytes)
        .map_err(|e| ClientError::MalformedCredential(format!("claims are not valid JSON: {e}")))?;

    let id = [claims.id, claims.mongo_id, claims.user_id]
        .into_iter()
        .find_map(claim_string);

    Ok(Identity {
        id,
        email: claims.email,
        name: claims.name,
        role: claims.role,
    })
}
