//! Wire models for the directory REST resource.

mod auth;
mod user;

pub use auth::{LoginRequest, LoginResponse, SessionUser};
pub use user::{Pagination, Role, UserDraft, UserQuery, UserRecord, UsersPage};
