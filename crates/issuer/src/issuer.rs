//! Sign-out callback issuer.
//!
//! Given a logout request, decides whether the caller may receive a sign-out
//! notification for a session, hands the notification to the message store
//! and returns the correlated end-session callback URL.
//!
//! # Flow
//!
//! 1. Read the current session id from the [`SessionOracle`]
//! 2. Resolve the target: the requested session id, or the current one when
//!    none was requested
//! 3. Gate: the target must equal the current session id, otherwise nothing
//!    is issued
//! 4. Build the [`SignOutNotification`] from the principal and client list
//! 5. Write it to the [`MessageStore`] and receive a correlation token
//! 6. Compose `base_url/callback_path?param=token`
//!
//! Anonymous callers and mismatched session ids get the same `Ok(None)`, with
//! no store write and the same log line, so the result reveals nothing about
//! which session ids are valid.

use std::sync::Arc;

use signout_core::url::{add_query_string, join, relative_url};
use signout_core::{CorrelationToken, Message, SessionId, SignOutNotification};
use tracing::{debug, error, info, instrument};

use crate::config::IssuerConfig;
use crate::error::Result;
use crate::session::SessionOracle;
use crate::store::MessageStore;

/// Issues end-session callback URLs.
///
/// Cheaply cloneable via `Arc`; share one instance across requests. The
/// session oracle is request-scoped and passed to each call.
pub struct SignOutCallbackIssuer<S> {
    inner: Arc<IssuerInner<S>>,
}

struct IssuerInner<S> {
    config: IssuerConfig,
    store: S,
}

impl<S> Clone for SignOutCallbackIssuer<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> SignOutCallbackIssuer<S>
where
    S: MessageStore<SignOutNotification>,
{
    /// Create an issuer.
    ///
    /// # Arguments
    ///
    /// * `config` - Validated issuer configuration
    /// * `store` - Message store receiving the notifications
    #[must_use]
    pub fn new(config: IssuerConfig, store: S) -> Self {
        Self {
            inner: Arc::new(IssuerInner { config, store }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &IssuerConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.inner.store
    }

    /// Issue a sign-out callback URL for the caller's session.
    ///
    /// `requested_session_id` is the session the caller wants notified. `None`
    /// or an empty string means the current session.
    ///
    /// Returns `Ok(None)` when there is nothing to notify: the caller has no
    /// session, or asked for a session other than its own.
    ///
    /// # Errors
    ///
    /// - `IssuerError::Session` / `IssuerError::Unauthenticated` if the session
    ///   cannot be read after the gate passed
    /// - `IssuerError::InvalidNotification` if the principal has no subject id
    /// - `IssuerError::StoreUnavailable` if the handoff fails; no URL is returned
    #[instrument(skip_all, fields(explicit_sid = requested_session_id.is_some_and(|s| !s.is_empty())))]
    pub async fn issue_signout_callback_url<O>(
        &self,
        oracle: &O,
        requested_session_id: Option<&str>,
    ) -> Result<Option<String>>
    where
        O: SessionOracle,
    {
        let current_session_id = oracle.current_session_id().await?;

        let Some(session_id) = authorize(current_session_id.as_ref(), requested_session_id) else {
            debug!("No session to notify");
            return Ok(None);
        };

        let principal = oracle.current_principal().await?;
        let client_ids = oracle.participating_client_ids().await?;
        let notification =
            SignOutNotification::new(principal.subject_id().clone(), session_id, client_ids)?;
        let client_count = notification.client_ids().len();

        let token = self
            .inner
            .store
            .write(Message::new(notification))
            .await
            .inspect_err(|e| error!(error = %e, "Sign-out notification handoff failed"))?;

        // Nothing fallible or awaited past this point: once the write
        // succeeded, the caller either gets this URL or the call was dropped.
        let url = self.end_session_callback_url(&token);
        info!(clients = client_count, "Issued sign-out callback");

        Ok(Some(url))
    }

    /// Read back the notification a callback URL points at.
    ///
    /// # Errors
    ///
    /// Returns `IssuerError::StoreUnavailable` if the store cannot be read.
    pub async fn redeem(&self, token: &CorrelationToken) -> Result<Option<SignOutNotification>> {
        let message = self.inner.store.read(token).await?;
        if message.is_none() {
            debug!("Sign-out callback token not found or already used");
        }
        Ok(message.map(Message::into_data))
    }

    /// The end-session callback URL carrying `token`.
    #[must_use]
    pub fn end_session_callback_url(&self, token: &CorrelationToken) -> String {
        let config = &self.inner.config;
        add_query_string(
            &join(config.base_url(), config.callback_path()),
            config.callback_param(),
            token.as_str(),
        )
    }

    /// Resolve a local path under the server's base URL.
    ///
    /// Returns `None` for anything that is not a local path.
    #[must_use]
    pub fn relative_url(&self, path: &str) -> Option<String> {
        relative_url(self.inner.config.base_url(), path)
    }

    /// The issuer URI.
    #[must_use]
    pub fn issuer_uri(&self) -> String {
        self.inner.config.issuer_uri()
    }
}

/// Resolve the session to notify, or `None` if the caller may not notify it.
///
/// The target is the requested id when one is given, the current id otherwise,
/// and it must equal the current session id.
fn authorize(current: Option<&SessionId>, requested: Option<&str>) -> Option<SessionId> {
    let current = current?;
    match requested.filter(|sid| !sid.is_empty()) {
        None => Some(current.clone()),
        Some(requested) if requested == current.as_str() => Some(SessionId::from(requested)),
        Some(_) => None,
    }
}
