//! Authenticated end user.

use serde::{Deserialize, Serialize};

use super::id::SubjectId;

/// The authenticated end user behind a session.
///
/// Only the subject id is interpreted by the sign-out flow; the display name
/// is carried for logging and UI purposes by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    subject_id: SubjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
}

impl Principal {
    /// Create a principal for the given subject.
    #[must_use]
    pub fn new(subject_id: impl Into<SubjectId>) -> Self {
        Self {
            subject_id: subject_id.into(),
            display_name: None,
        }
    }

    /// Attach a human-readable display name.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// The subject identifier of the user.
    #[must_use]
    pub const fn subject_id(&self) -> &SubjectId {
        &self.subject_id
    }

    /// The display name, if one was recorded at sign-in.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_is_optional_in_json() {
        let principal = Principal::new("alice");
        let json = serde_json::to_string(&principal).unwrap();
        assert_eq!(json, r#"{"subject_id":"alice"}"#);

        let named: Principal =
            serde_json::from_str(r#"{"subject_id":"bob","display_name":"Bob"}"#).unwrap();
        assert_eq!(named.subject_id().as_str(), "bob");
        assert_eq!(named.display_name(), Some("Bob"));
    }
}
