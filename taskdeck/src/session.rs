//! Session persistence: remembered login across restarts.
//!
//! The session is loaded once at startup and handed to the Task Store's
//! constructor; nothing else reads the file during the run. Signing out
//! deletes it.

use std::path::{Path, PathBuf};

use taskdeck_proto::auth::{Session, User};

/// Errors that can occur reading or writing the session file.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Failed to read the session file.
    #[error("failed to read session file {path}: {source}")]
    Read {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write or delete the session file.
    #[error("failed to write session file {path}: {source}")]
    Write {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The session file exists but does not parse.
    #[error("session file is corrupt: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Default session file location (`<data_dir>/taskdeck/session.json`).
#[must_use]
pub fn default_session_path() -> Option<PathBuf> {
    Some(dirs::data_dir()?.join("taskdeck").join("session.json"))
}

/// Loads a remembered session. A missing file is simply `None`.
///
/// # Errors
///
/// Returns [`SessionError`] if the file exists but cannot be read or parsed.
pub fn load(path: &Path) -> Result<Option<Session>, SessionError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(SessionError::Read {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Saves the session, creating the parent directory if needed.
///
/// # Errors
///
/// Returns [`SessionError`] if the directory or file cannot be written.
pub fn save(path: &Path, session: &Session) -> Result<(), SessionError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SessionError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    let contents = serde_json::to_string_pretty(session)?;
    std::fs::write(path, contents).map_err(|e| SessionError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Deletes the session file. A missing file is fine.
///
/// # Errors
///
/// Returns [`SessionError::Write`] if the file exists but cannot be removed.
pub fn clear(path: &Path) -> Result<(), SessionError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(SessionError::Write {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Builds a local session for offline mode: any non-empty username works
/// and the password is not verified, exactly like a demo login. Tasks for
/// a local session live only in memory.
#[must_use]
pub fn local_session(username: &str) -> Session {
    let name = username.trim();
    Session {
        token: String::new(),
        user: User {
            id: format!("local:{name}"),
            email: name.to_string(),
        },
    }
}
