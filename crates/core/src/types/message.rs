//! Envelope for payloads handed to a message store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A payload stamped with its creation time.
///
/// Stores use `created` to apply their retention policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message<T> {
    /// When the message was created (UTC).
    pub created: DateTime<Utc>,
    /// The wrapped payload.
    pub data: T,
}

impl<T> Message<T> {
    /// Wrap `data`, stamping it with the current time.
    #[must_use]
    pub fn new(data: T) -> Self {
        Self {
            created: Utc::now(),
            data,
        }
    }

    /// Wrap `data` with an explicit creation time.
    #[must_use]
    pub const fn with_created(data: T, created: DateTime<Utc>) -> Self {
        Self { created, data }
    }

    /// Unwrap the payload.
    #[must_use]
    pub fn into_data(self) -> T {
        self.data
    }
}
