//! # Directory REST client
//!
//! [`DirectoryApi`] is the contract the client core expects from the remote
//! resource server. [`HttpApi`] implements it over `reqwest`, which compiles to
//! `fetch` on `wasm32` and to hyper natively.
//!
//! | Method | Request |
//! |--------|---------|
//! | [`login`](DirectoryApi::login) | `POST /api/auth/login` |
//! | [`list_users`](DirectoryApi::list_users) | `GET /api/users?page&limit&search` |
//! | [`create_user`](DirectoryApi::create_user) | `POST /api/users` |
//! | [`update_user`](DirectoryApi::update_user) | `PUT /api/users/{id}` |
//! | [`delete_user`](DirectoryApi::delete_user) | `DELETE /api/users/{id}` |
//!
//! Every call except `login` carries the credential as an
//! `Authorization: Bearer` header. Non-2xx answers become
//! [`ApiError::Status`] with the server's `{"error": ...}` reason when present.

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::models::{LoginRequest, LoginResponse, UserDraft, UserQuery, UserRecord, UsersPage};

/// Async interface to the directory server.
pub trait DirectoryApi {
    fn login(
        &self,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<LoginResponse, ApiError>>;
    fn list_users(
        &self,
        token: &str,
        query: &UserQuery,
    ) -> impl std::future::Future<Output = Result<UsersPage, ApiError>>;
    fn create_user(
        &self,
        token: &str,
        draft: &UserDraft,
    ) -> impl std::future::Future<Output = Result<UserRecord, ApiError>>;
    fn update_user(
        &self,
        token: &str,
        id: &str,
        draft: &UserDraft,
    ) -> impl std::future::Future<Output = Result<UserRecord, ApiError>>;
    fn delete_user(
        &self,
        token: &str,
        id: &str,
    ) -> impl std::future::Future<Output = Result<(), ApiError>>;
}

/// `reqwest`-backed [`DirectoryApi`].
#[derive(Clone, Debug)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    /// Create a client for the server rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client reusing an existing `reqwest::Client`.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `/api/users/{id}` with `id` percent-encoded as one path segment.
    fn user_url(&self, id: &str) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.url("/api/users"))
            .map_err(|e| ApiError::Transport(format!("invalid base url: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::Transport(format!("invalid base url: {}", self.base_url)))?
            .push(id);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let fallback = status.canonical_reason().unwrap_or("Request failed");
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_body(status.as_u16(), fallback, &body))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl DirectoryApi for HttpApi {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        tracing::debug!(email, "POST /api/auth/login");
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send_json(self.client.post(self.url("/api/auth/login")).json(&body))
            .await
    }

    async fn list_users(&self, token: &str, query: &UserQuery) -> Result<UsersPage, ApiError> {
        tracing::debug!(page = query.page, search = %query.search, "GET /api/users");
        let request = self
            .client
            .get(self.url("/api/users"))
            .bearer_auth(token)
            .query(query);
        self.send_json(request).await
    }

    async fn create_user(&self, token: &str, draft: &UserDraft) -> Result<UserRecord, ApiError> {
        tracing::debug!("POST /api/users");
        let request = self
            .client
            .post(self.url("/api/users"))
            .bearer_auth(token)
            .json(draft);
        self.send_json(request).await
    }

    async fn update_user(
        &self,
        token: &str,
        id: &str,
        draft: &UserDraft,
    ) -> Result<UserRecord, ApiError> {
        tracing::debug!(id, "PUT /api/users/:id");
        let request = self
            .client
            .put(self.user_url(id)?)
            .bearer_auth(token)
            .json(draft);
        self.send_json(request).await
    }

    async fn delete_user(&self, token: &str, id: &str) -> Result<(), ApiError> {
        tracing::debug!(id, "DELETE /api/users/:id");
        let request = self.client.delete(self.user_url(id)?).bearer_auth(token);
        self.send(request).await?;
        Ok(())
    }
}
