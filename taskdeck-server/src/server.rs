//! HTTP API for the `Taskdeck` backend.
//!
//! An axum JSON server exposing the auth endpoints and the per-owner task
//! collection. Every task route requires a bearer token; the owner of a
//! record is always the authenticated user — an `owner_id` supplied by a
//! client is never trusted.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use taskdeck_proto::auth::{Credentials, ErrorBody, Session, User};
use taskdeck_proto::task::{MAX_TASK_TEXT_LENGTH, NewTask, Task, TaskId, TaskPatch, validate_text};
use uuid::Uuid;

use crate::auth::{AuthError, UserRegistry};
use crate::config::ServerConfig;
use crate::store::{InsertError, TaskStore};

/// Shared server state: accounts, tokens, and task collections.
pub struct ServerState {
    /// Account and token registry.
    pub users: UserRegistry,
    /// Per-owner task collections.
    pub tasks: TaskStore,
    /// Maximum accepted task text length in characters.
    max_text_len: usize,
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerState {
    /// Creates a state with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: UserRegistry::new(),
            tasks: TaskStore::new(),
            max_text_len: MAX_TASK_TEXT_LENGTH,
        }
    }

    /// Creates a state with limits taken from the resolved configuration.
    #[must_use]
    pub fn with_config(config: &ServerConfig) -> Self {
        Self {
            users: UserRegistry::new(),
            tasks: TaskStore::with_max_tasks(config.max_tasks_per_owner),
            max_text_len: config.max_text_len,
        }
    }
}

/// A failure that renders as a JSON error body with a status code.
#[derive(Debug)]
struct ApiFailure {
    status: StatusCode,
    message: String,
}

impl ApiFailure {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "authentication required")
    }

    fn task_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "task not found")
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiFailure {
    fn from(err: AuthError) -> Self {
        let status = match err {
            AuthError::InvalidEmail | AuthError::PasswordTooShort => StatusCode::BAD_REQUEST,
            AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        };
        Self::new(status, err.to_string())
    }
}

impl From<InsertError> for ApiFailure {
    fn from(err: InsertError) -> Self {
        Self::new(StatusCode::CONFLICT, err.to_string())
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Resolves the request's bearer token to its user.
async fn authenticate(state: &ServerState, headers: &HeaderMap) -> Result<User, ApiFailure> {
    let token = bearer_token(headers).ok_or_else(ApiFailure::unauthorized)?;
    state
        .users
        .verify(token)
        .await
        .ok_or_else(ApiFailure::unauthorized)
}

async fn sign_up(
    State(state): State<Arc<ServerState>>,
    Json(creds): Json<Credentials>,
) -> Result<(StatusCode, Json<User>), ApiFailure> {
    let user = state.users.sign_up(&creds.email, &creds.password).await?;
    tracing::info!(user_id = %user.id, email = %user.email, "account created");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn sign_in(
    State(state): State<Arc<ServerState>>,
    Json(creds): Json<Credentials>,
) -> Result<Json<Session>, ApiFailure> {
    let session = state.users.sign_in(&creds.email, &creds.password).await?;
    tracing::info!(user_id = %session.user.id, "signed in");
    Ok(Json(session))
}

async fn sign_out(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiFailure> {
    let token = bearer_token(&headers).ok_or_else(ApiFailure::unauthorized)?;
    state.users.sign_out(token).await;
    Ok(StatusCode::NO_CONTENT)
}

async fn me(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
) -> Result<Json<User>, ApiFailure> {
    let user = authenticate(&state, &headers).await?;
    Ok(Json(user))
}

async fn list_tasks(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Task>>, ApiFailure> {
    let user = authenticate(&state, &headers).await?;
    let tasks = state.tasks.list_newest_first(&user.id).await;
    Ok(Json(tasks))
}

async fn create_task(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Json(mut new): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>), ApiFailure> {
    let user = authenticate(&state, &headers).await?;

    let trimmed = validate_text(&new.text, state.max_text_len)
        .map_err(|e| ApiFailure::new(StatusCode::BAD_REQUEST, e.to_string()))?
        .to_string();
    new.text = trimmed;

    let task = state.tasks.insert(&user.id, new).await?;
    tracing::info!(owner = %user.id, task_id = %task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<Task>, ApiFailure> {
    let user = authenticate(&state, &headers).await?;
    let id = TaskId::from_uuid(id);
    let task = state
        .tasks
        .update(&user.id, &id, patch)
        .await
        .ok_or_else(ApiFailure::task_not_found)?;
    tracing::debug!(owner = %user.id, task_id = %task.id, "task updated");
    Ok(Json(task))
}

async fn delete_task(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiFailure> {
    let user = authenticate(&state, &headers).await?;
    let id = TaskId::from_uuid(id);
    if state.tasks.remove(&user.id, &id).await {
        tracing::debug!(owner = %user.id, task_id = %id, "task deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiFailure::task_not_found())
    }
}

/// Builds the API router over the given state.
#[must_use]
pub fn router(state: Arc<ServerState>) -> axum::Router {
    axum::Router::new()
        .route("/auth/signup", post(sign_up))
        .route("/auth/signin", post(sign_in))
        .route("/auth/signout", post(sign_out))
        .route("/auth/me", get(me))
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/{id}", patch(update_task).delete(delete_task))
        .with_state(state)
}

/// Starts the backend on the given address and returns the bound address
/// and a join handle.
///
/// This is the primary entry point used by both `main.rs` and test code.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server(
    addr: &str,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    start_server_with_state(addr, Arc::new(ServerState::new())).await
}

/// Starts the backend with a pre-configured [`ServerState`].
///
/// Use [`ServerState::with_config`] to apply limits from the resolved
/// [`ServerConfig`].
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server_with_state(
    addr: &str,
    state: Arc<ServerState>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "backend server error");
        }
    });

    Ok((bound_addr, handle))
}
