//! # API crate — REST contract of the directory server
//!
//! This crate is everything the admin client knows about the remote resource
//! server: the JSON shapes it sends and receives, the errors a call can end in,
//! and an HTTP implementation of the calls themselves. It holds no state; the
//! session and collection logic live in the `directory` crate, which is generic
//! over [`DirectoryApi`] so tests can swap in a scripted fake.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | Wire models: [`UserRecord`] (with `id`/`_id` normalisation), [`UsersPage`], [`UserDraft`], [`LoginResponse`], [`Role`] |
//! | [`client`] | The [`DirectoryApi`] trait and its `reqwest` implementation [`HttpApi`] |
//! | [`error`] | [`ApiError`]: non-2xx status (with the server's reason), transport failure, or undecodable body |

pub mod client;
pub mod error;
pub mod models;

pub use client::{DirectoryApi, HttpApi};
pub use error::ApiError;
pub use models::{
    LoginRequest, LoginResponse, Pagination, Role, SessionUser, UserDraft, UserQuery, UserRecord,
    UsersPage,
};
