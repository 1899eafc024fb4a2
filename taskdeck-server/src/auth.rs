//! User accounts and bearer tokens.
//!
//! Accounts live in memory; passwords are stored as SHA-256 digests, never
//! in the clear. Sign-in issues an opaque token mapped back to its user,
//! revoked on sign-out. Token lookup is the hot path for every task call.

use std::collections::HashMap;

use sha2::{Digest, Sha256};
use taskdeck_proto::auth::{MIN_PASSWORD_LENGTH, Session, User};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Errors from account and token operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    /// Email failed the minimal shape check.
    #[error("email address looks invalid")]
    InvalidEmail,
    /// Password shorter than the minimum.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    PasswordTooShort,
    /// Sign-up with an email that already has an account.
    #[error("an account with this email already exists")]
    EmailTaken,
    /// Unknown email or wrong password. Deliberately does not say which.
    #[error("invalid email or password")]
    InvalidCredentials,
}

/// A registered account.
struct Account {
    user: User,
    password_digest: String,
}

/// In-memory registry of accounts and live tokens.
pub struct UserRegistry {
    accounts: RwLock<HashMap<String, Account>>,
    tokens: RwLock<HashMap<String, User>>,
}

impl Default for UserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl UserRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            tokens: RwLock::new(HashMap::new()),
        }
    }

    fn digest(password: &str) -> String {
        hex::encode(Sha256::digest(password.as_bytes()))
    }

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidEmail`], [`AuthError::PasswordTooShort`],
    /// or [`AuthError::EmailTaken`].
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::PasswordTooShort);
        }

        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(email) {
            return Err(AuthError::EmailTaken);
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
        };
        accounts.insert(
            email.to_string(),
            Account {
                user: user.clone(),
                password_digest: Self::digest(password),
            },
        );
        Ok(user)
    }

    /// Verifies credentials and issues a fresh bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown email or a
    /// wrong password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let accounts = self.accounts.read().await;
        let account = accounts
            .get(email.trim())
            .ok_or(AuthError::InvalidCredentials)?;
        if account.password_digest != Self::digest(password) {
            return Err(AuthError::InvalidCredentials);
        }
        let user = account.user.clone();
        drop(accounts);

        let token = Uuid::new_v4().to_string();
        self.tokens
            .write()
            .await
            .insert(token.clone(), user.clone());
        Ok(Session { token, user })
    }

    /// Revokes a token. Returns whether it was live.
    pub async fn sign_out(&self, token: &str) -> bool {
        self.tokens.write().await.remove(token).is_some()
    }

    /// Resolves a token to its user, if the token is live.
    pub async fn verify(&self, token: &str) -> Option<User> {
        self.tokens.read().await.get(token).cloned()
    }
}
