//! Authentication types shared between the client and the backend.
//!
//! The backend issues an opaque bearer token on sign-in; the client sends
//! it in the `Authorization` header on every task call and persists the
//! whole [`Session`] for remembered login across restarts.

use serde::{Deserialize, Serialize};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Sign-up / sign-in request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Account email address.
    pub email: String,
    /// Account password (never stored in the clear server-side).
    pub password: String,
}

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable user id, used as the `owner_id` on task records.
    pub id: String,
    /// Email the account was registered with.
    pub email: String,
}

/// A signed-in session: the bearer token plus the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token.
    pub token: String,
    /// The signed-in user.
    pub user: User,
}

/// JSON error body returned by the backend on any failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable description of what went wrong.
    pub error: String,
}
