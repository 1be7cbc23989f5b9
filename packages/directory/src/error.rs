use api::ApiError;

use crate::validation::ValidationErrors;

/// Every way a controller operation can fail.
///
/// The first four variants are decided locally and never touch the network.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    /// The credential is not a three-segment token with decodable claims.
    #[error("malformed credential: {0}")]
    MalformedCredential(String),
    /// No session, or the session lacks the role the operation needs.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("invalid input: {0}")]
    Validation(ValidationErrors),
    /// Update or delete called without a record id.
    #[error("missing record identifier")]
    InvalidIdentifier,
    /// A mutation is already in flight.
    #[error("another change is still being saved")]
    MutationInProgress,
    #[error("could not load users: {0}")]
    FetchFailed(ApiError),
    #[error("could not save changes: {0}")]
    MutationFailed(ApiError),
    #[error("login failed: {0}")]
    LoginFailed(ApiError),
}

impl ClientError {
    /// Text shown in the notification toast.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::MalformedCredential(_) => {
                "Your session is invalid. Please log in again.".to_string()
            }
            ClientError::Unauthorized(reason) => reason.clone(),
            ClientError::Validation(errors) => format!("Please fix the form: {errors}"),
            ClientError::InvalidIdentifier => "Invalid user ID".to_string(),
            ClientError::MutationInProgress => {
                "Please wait for the current change to finish".to_string()
            }
            ClientError::FetchFailed(e) => format!("Failed to load users: {}", e.user_message()),
            ClientError::MutationFailed(e) => e.user_message(),
            ClientError::LoginFailed(e) => match e {
                ApiError::Status {
                    status: 400 | 401 | 403,
                    ..
                } => "Invalid credentials!".to_string(),
                other => format!("Login failed: {}", other.user_message()),
            },
        }
    }

    /// HTTP status of the failed request, for network-origin errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::FetchFailed(e)
            | ClientError::MutationFailed(e)
            | ClientError::LoginFailed(e) => e.status(),
            _ => None,
        }
    }
}
