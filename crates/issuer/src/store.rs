//! One-time message handoff.
//!
//! The issuer writes each sign-out notification to a [`MessageStore`] and puts
//! the returned correlation token in the callback URL. The callback page later
//! reads the notification back with that token.
//!
//! [`MemoryMessageStore`] keeps messages in a `moka` cache with a time-to-live
//! and hands each one out at most once. When it is full, writes fail instead of
//! evicting or dropping pending messages.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use moka::future::Cache;
use rand::RngCore;
use signout_core::{CorrelationToken, Message};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::IssuerConfig;

/// Errors raised by a message store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached or refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Durable handoff of messages keyed by store-generated tokens.
///
/// Tokens must be unique per write. Callers treat them as opaque and must not
/// assume a message can be read more than once.
pub trait MessageStore<T>: Send + Sync {
    /// Persist `message` and return the token that retrieves it.
    fn write(
        &self,
        message: Message<T>,
    ) -> impl Future<Output = Result<CorrelationToken, StoreError>> + Send;

    /// Retrieve the message for `token`, if it is still available.
    fn read(
        &self,
        token: &CorrelationToken,
    ) -> impl Future<Output = Result<Option<Message<T>>, StoreError>> + Send;
}

/// Generate an unguessable token (256 random bits, base64url without padding).
pub(crate) fn random_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

// =============================================================================
// MemoryMessageStore
// =============================================================================

/// In-process message store backed by `moka`.
///
/// Reads consume the entry. Messages older than the time-to-live read as
/// missing even if the cache has not evicted them yet.
///
/// The cache itself is unbounded; `capacity` is enforced on write so an
/// acknowledged message is never evicted before it expires or is read.
#[derive(Clone)]
pub struct MemoryMessageStore<T> {
    cache: Cache<String, Arc<Message<T>>>,
    ttl: Duration,
    capacity: u64,
}

impl<T> MemoryMessageStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a store holding at most `capacity` messages for `ttl` each.
    #[must_use]
    pub fn new(ttl: Duration, capacity: u64) -> Self {
        let cache = Cache::builder().time_to_live(ttl).build();

        Self {
            cache,
            ttl,
            capacity,
        }
    }

    /// Create a store sized from the issuer configuration.
    #[must_use]
    pub fn from_config(config: &IssuerConfig) -> Self {
        Self::new(config.message_ttl(), config.message_capacity())
    }

    fn is_expired(&self, message: &Message<T>) -> bool {
        let Ok(ttl) = chrono::Duration::from_std(self.ttl) else {
            return false;
        };
        Utc::now().signed_duration_since(message.created) > ttl
    }
}

impl<T> MessageStore<T> for MemoryMessageStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn write(&self, message: Message<T>) -> Result<CorrelationToken, StoreError> {
        // Flush expirations so the entry count is current.
        self.cache.run_pending_tasks().await;
        if self.cache.entry_count() >= self.capacity {
            warn!(capacity = self.capacity, "Message store full, rejecting write");
            return Err(StoreError::Unavailable("store full".to_string()));
        }

        let token = random_token();
        self.cache.insert(token.clone(), Arc::new(message)).await;
        Ok(CorrelationToken::new(token))
    }

    async fn read(&self, token: &CorrelationToken) -> Result<Option<Message<T>>, StoreError> {
        let Some(message) = self.cache.remove(token.as_str()).await else {
            return Ok(None);
        };

        if self.is_expired(&message) {
            debug!("Discarding expired message");
            return Ok(None);
        }

        Ok(Some(Arc::unwrap_or_clone(message)))
    }
}

impl<T> std::fmt::Debug for MemoryMessageStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryMessageStore")
            .field("ttl", &self.ttl)
            .field("capacity", &self.capacity)
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}
