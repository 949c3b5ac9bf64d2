//! Issuer error types.

use signout_core::NotificationError;
use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur while issuing or redeeming a sign-out callback.
///
/// A refused session id is not an error: the issuer returns `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum IssuerError {
    /// The session has no authenticated principal.
    #[error("no authenticated principal in session")]
    Unauthenticated,

    /// Reading the session failed.
    #[error("session error: {0}")]
    Session(String),

    /// The notification could not be built from the session data.
    #[error("invalid notification: {0}")]
    InvalidNotification(#[from] NotificationError),

    /// The message store rejected or could not accept the handoff.
    #[error("message store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

impl From<tower_sessions::session::Error> for IssuerError {
    fn from(err: tower_sessions::session::Error) -> Self {
        Self::Session(err.to_string())
    }
}

/// Result type alias for `IssuerError`.
pub type Result<T> = std::result::Result<T, IssuerError>;
