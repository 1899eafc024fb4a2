//! HTTP client for the persistence backend.
//!
//! Wraps `reqwest` with a bounded per-request timeout, so a dead backend
//! surfaces as an ordinary retryable failure rather than a hang. Every
//! failure maps into the small [`ApiError`] taxonomy the store reports to
//! the UI.

use std::time::Duration;

use reqwest::StatusCode;
use taskdeck_proto::auth::{Credentials, ErrorBody, Session, User};
use taskdeck_proto::task::{NewTask, Task, TaskId, TaskPatch};

/// Errors from talking to the backend. All of them are recoverable: the
/// caller keeps its state and the user may retry.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Network-level failure: connect error, timeout, or a malformed
    /// response body.
    #[error("could not reach the backend: {0}")]
    Transport(#[from] reqwest::Error),

    /// Token missing, expired, or revoked.
    #[error("authentication required")]
    Unauthorized,

    /// The backend refused the request; the message comes from its JSON
    /// error body.
    #[error("{message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Human-readable reason from the backend.
        message: String,
    },
}

/// Connection settings for the backend, resolved from configuration.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of the backend (e.g., `http://127.0.0.1:9400`).
    pub base_url: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

/// JSON API client for the persistence backend.
///
/// Holds the bearer token after [`sign_in`](Self::sign_in); task calls made
/// without one fail with [`ApiError::Unauthorized`] server-side.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Creates a client for the given base URL with a bounded per-request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;
        let base: String = base_url.into();
        Ok(Self {
            http,
            base_url: base.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Creates a client from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the underlying HTTP client cannot
    /// be constructed.
    pub fn from_config(config: &RemoteConfig) -> Result<Self, ApiError> {
        Self::new(config.base_url.clone(), config.request_timeout)
    }

    /// Installs a bearer token, e.g. one restored from a saved session.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Maps a non-success response to an [`ApiError`], extracting the
    /// backend's error body when there is one.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => format!("backend returned {status}"),
        };
        Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the backend is unreachable or refuses the
    /// registration.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let creds = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .http
            .post(self.url("/auth/signup"))
            .json(&creds)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Signs in and keeps the issued bearer token for subsequent calls.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] for bad credentials, or another
    /// [`ApiError`] for transport/backend failures.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<Session, ApiError> {
        let creds = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .http
            .post(self.url("/auth/signin"))
            .json(&creds)
            .send()
            .await?;
        let session: Session = Self::check(response).await?.json().await?;
        self.token = Some(session.token.clone());
        Ok(session)
    }

    /// Signs out. The local token is cleared unconditionally; the backend
    /// revocation is best-effort and its failure is reported but leaves the
    /// client signed out.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the revocation call fails.
    pub async fn sign_out(&mut self) -> Result<(), ApiError> {
        let Some(token) = self.token.take() else {
            return Ok(());
        };
        let response = self
            .http
            .post(self.url("/auth/signout"))
            .bearer_auth(&token)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Resolves the current token to its user.
    ///
    /// Returns `Ok(None)` when no token is set or the token is no longer
    /// accepted — a stale remembered session, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] or [`ApiError::Rejected`] for
    /// failures other than an expired token.
    pub async fn current_user(&self) -> Result<Option<User>, ApiError> {
        if self.token.is_none() {
            return Ok(None);
        }
        let response = self.authed(self.http.get(self.url("/auth/me"))).send().await?;
        match Self::check(response).await {
            Ok(response) => Ok(Some(response.json().await?)),
            Err(ApiError::Unauthorized) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Stores a new task and returns the backend's canonical record.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the backend is unreachable or refuses the
    /// insert.
    pub async fn insert(&self, new: &NewTask) -> Result<Task, ApiError> {
        let response = self
            .authed(self.http.post(self.url("/tasks")))
            .json(new)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Applies a partial update and returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the backend is unreachable, the task is
    /// unknown to it, or the update is refused.
    pub async fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<Task, ApiError> {
        let response = self
            .authed(self.http.patch(self.url(&format!("/tasks/{id}"))))
            .json(patch)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the backend is unreachable or the task is
    /// unknown to it.
    pub async fn delete(&self, id: &TaskId) -> Result<(), ApiError> {
        let response = self
            .authed(self.http.delete(self.url(&format!("/tasks/{id}"))))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Fetches the owner's tasks, newest-first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the backend is unreachable or refuses the
    /// listing.
    pub async fn list(&self) -> Result<Vec<Task>, ApiError> {
        let response = self.authed(self.http.get(self.url("/tasks"))).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }
}
