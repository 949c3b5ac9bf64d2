//! Integration test helpers for the sign-out callback issuer.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p signout-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `signout_flow` - Login, issue, redeem over `tower-sessions`
//! - `gate_properties` - Authorization gate and URL shape properties

use std::sync::Arc;
use std::time::Duration;

use signout_core::{ClientId, CorrelationToken, Principal, SessionId, SignOutNotification};
use signout_issuer::session::{add_participating_client, start_authenticated_session};
use signout_issuer::{IssuerConfig, MemoryMessageStore, SignOutCallbackIssuer};
use tower_sessions::{MemoryStore, Session};
use url::Url;

/// Origin used by every test issuer.
pub const TEST_ORIGIN: &str = "https://id.example.com";

/// Base path used by every test issuer.
pub const TEST_BASE_PATH: &str = "/as";

/// Issuer backed by the in-memory store.
pub type TestIssuer = SignOutCallbackIssuer<MemoryMessageStore<SignOutNotification>>;

/// Build an issuer for `https://id.example.com/as` with default routes.
///
/// # Panics
///
/// Panics if the test configuration is rejected.
#[must_use]
pub fn test_issuer() -> TestIssuer {
    let config = IssuerConfig::new(TEST_ORIGIN, TEST_BASE_PATH).expect("valid test configuration");
    let store = MemoryMessageStore::new(Duration::from_secs(60), 1_000);
    SignOutCallbackIssuer::new(config, store)
}

/// A fresh, empty session on an in-memory session store.
#[must_use]
pub fn anonymous_session() -> Session {
    Session::new(None, Arc::new(MemoryStore::default()), None)
}

/// A session where `subject` signed in as `session_id` and visited `clients`.
///
/// # Panics
///
/// Panics if the session cannot be written.
pub async fn signed_in_session(session_id: &str, subject: &str, clients: &[&str]) -> Session {
    let session = anonymous_session();
    start_authenticated_session(&session, &SessionId::from(session_id), &Principal::new(subject))
        .await
        .expect("start session");
    for client in clients {
        add_participating_client(&session, &ClientId::from(*client))
            .await
            .expect("add client");
    }
    session
}

/// Extract the correlation token from an issued callback URL.
///
/// # Panics
///
/// Panics if the URL does not parse or carries no `param` query parameter.
#[must_use]
pub fn token_from(callback_url: &str, param: &str) -> CorrelationToken {
    Url::parse(callback_url)
        .expect("absolute callback URL")
        .query_pairs()
        .find(|(key, _)| key == param)
        .map(|(_, value)| CorrelationToken::new(value.into_owned()))
        .expect("callback URL carries a token")
}
