//! End-of-session notification payload.

use serde::{Deserialize, Serialize};

use super::id::{ClientId, SessionId, SubjectId};

/// Errors that can occur when building a [`SignOutNotification`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    /// The subject id is empty or whitespace only.
    #[error("notification subject id cannot be empty")]
    EmptySubjectId,
    /// The session id is empty or whitespace only.
    #[error("notification session id cannot be empty")]
    EmptySessionId,
}

/// Describes the end of one subject's session, addressed to the clients that
/// took part in it.
///
/// ## Constraints
///
/// - `subject_id` must not be blank
/// - `session_id` must not be blank, and is the session the notification was
///   authorized against
/// - `client_ids` may be empty (nobody to notify, but the session still ended)
///
/// ## Examples
///
/// ```
/// use signout_core::{ClientId, SessionId, SignOutNotification, SubjectId};
///
/// let notification = SignOutNotification::new(
///     SubjectId::from("alice"),
///     SessionId::from("s1"),
///     vec![ClientId::from("web")],
/// )
/// .unwrap();
/// assert_eq!(notification.session_id().as_str(), "s1");
///
/// assert!(SignOutNotification::new(SubjectId::from(""), SessionId::from("s1"), vec![]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignOutNotification {
    subject_id: SubjectId,
    session_id: SessionId,
    client_ids: Vec<ClientId>,
}

impl SignOutNotification {
    /// Build a notification.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError::EmptySubjectId` or
    /// `NotificationError::EmptySessionId` if either id is blank.
    pub fn new(
        subject_id: SubjectId,
        session_id: SessionId,
        client_ids: Vec<ClientId>,
    ) -> Result<Self, NotificationError> {
        if subject_id.is_blank() {
            return Err(NotificationError::EmptySubjectId);
        }
        if session_id.is_blank() {
            return Err(NotificationError::EmptySessionId);
        }

        Ok(Self {
            subject_id,
            session_id,
            client_ids,
        })
    }

    #[must_use]
    pub const fn subject_id(&self) -> &SubjectId {
        &self.subject_id
    }

    #[must_use]
    pub const fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Clients to notify, in the order they joined the session.
    #[must_use]
    pub fn client_ids(&self) -> &[ClientId] {
        &self.client_ids
    }
}
