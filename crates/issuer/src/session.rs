//! Session oracle: read access to the caller's authenticated session.
//!
//! The issuer never owns session storage. It reads the current session id,
//! principal and participating clients through [`SessionOracle`], which the
//! host implements over whatever session layer it runs. A `tower-sessions`
//! adapter is provided, along with helpers the host's login code uses to
//! record the data the adapter reads.

use std::future::Future;

use signout_core::{ClientId, Principal, SessionId};
use tower_sessions::Session;

use crate::error::{IssuerError, Result};
use crate::store::random_token;

/// Session keys for sign-out state.
pub mod session_keys {
    /// Key for the authenticated session id.
    pub const SESSION_ID: &str = "signout.session_id";

    /// Key for the authenticated principal.
    pub const PRINCIPAL: &str = "signout.principal";

    /// Key for the ordered list of clients that took part in the session.
    pub const CLIENT_LIST: &str = "signout.client_list";
}

/// Read access to the current request's authenticated session.
///
/// Implementations must return a stable view for the duration of one request:
/// every call made while issuing one callback has to observe the same session.
pub trait SessionOracle: Send + Sync {
    /// The current session id, or `None` for an anonymous caller.
    fn current_session_id(&self) -> impl Future<Output = Result<Option<SessionId>>> + Send;

    /// The authenticated principal.
    ///
    /// Fails with `IssuerError::Unauthenticated` when there is none.
    fn current_principal(&self) -> impl Future<Output = Result<Principal>> + Send;

    /// Clients that took part in the current session, in join order.
    fn participating_client_ids(&self) -> impl Future<Output = Result<Vec<ClientId>>> + Send;
}

/// Generate a fresh session id (256 random bits, base64url).
#[must_use]
pub fn generate_session_id() -> SessionId {
    SessionId::new(random_token())
}

// =============================================================================
// tower-sessions adapter
// =============================================================================

/// [`SessionOracle`] over a request's `tower_sessions::Session`.
///
/// # Example
///
/// ```rust,ignore
/// async fn logout(State(state): State<AppState>, session: Session) -> Result<Response> {
///     let oracle = TowerSessionOracle::new(session);
///     let callback = state.issuer().issue_signout_callback_url(&oracle, None).await?;
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct TowerSessionOracle {
    session: Session,
}

impl TowerSessionOracle {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl SessionOracle for TowerSessionOracle {
    async fn current_session_id(&self) -> Result<Option<SessionId>> {
        let session_id: Option<SessionId> = self.session.get(session_keys::SESSION_ID).await?;
        Ok(session_id.filter(|sid| !sid.is_blank()))
    }

    async fn current_principal(&self) -> Result<Principal> {
        self.session
            .get::<Principal>(session_keys::PRINCIPAL)
            .await?
            .ok_or(IssuerError::Unauthenticated)
    }

    async fn participating_client_ids(&self) -> Result<Vec<ClientId>> {
        Ok(self
            .session
            .get::<Vec<ClientId>>(session_keys::CLIENT_LIST)
            .await?
            .unwrap_or_default())
    }
}

/// Record a freshly authenticated session.
///
/// Any client list left over from a previous session is cleared.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn start_authenticated_session(
    session: &Session,
    session_id: &SessionId,
    principal: &Principal,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::SESSION_ID, session_id).await?;
    session.insert(session_keys::PRINCIPAL, principal).await?;
    session
        .remove::<Vec<ClientId>>(session_keys::CLIENT_LIST)
        .await?;
    Ok(())
}

/// Record that `client_id` took part in the current session.
///
/// The list keeps join order and never holds the same client twice.
///
/// # Errors
///
/// Returns an error if the session cannot be read or modified.
pub async fn add_participating_client(
    session: &Session,
    client_id: &ClientId,
) -> std::result::Result<(), tower_sessions::session::Error> {
    let mut clients: Vec<ClientId> = session
        .get(session_keys::CLIENT_LIST)
        .await?
        .unwrap_or_default();

    if !clients.contains(client_id) {
        clients.push(client_id.clone());
        session.insert(session_keys::CLIENT_LIST, clients).await?;
    }
    Ok(())
}

/// Clear the authenticated session data (local sign-out).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn end_authenticated_session(
    session: &Session,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session.remove::<SessionId>(session_keys::SESSION_ID).await?;
    session.remove::<Principal>(session_keys::PRINCIPAL).await?;
    session
        .remove::<Vec<ClientId>>(session_keys::CLIENT_LIST)
        .await?;
    Ok(())
}

// =============================================================================
// Snapshot
// =============================================================================

/// A frozen view of a session.
///
/// Used directly by tools and tests, or captured from a live oracle so that
/// every read within one request sees the same data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub session_id: Option<SessionId>,
    pub principal: Option<Principal>,
    pub client_ids: Vec<ClientId>,
}

impl SessionSnapshot {
    /// A caller with no session.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// An authenticated session.
    #[must_use]
    pub fn authenticated(
        session_id: impl Into<SessionId>,
        principal: Principal,
        client_ids: Vec<ClientId>,
    ) -> Self {
        Self {
            session_id: Some(session_id.into()),
            principal: Some(principal),
            client_ids,
        }
    }

    /// Read everything `oracle` exposes into a snapshot.
    ///
    /// A missing principal is recorded as `None` rather than failing.
    ///
    /// # Errors
    ///
    /// Propagates any other error from the oracle.
    pub async fn capture<O: SessionOracle>(oracle: &O) -> Result<Self> {
        let session_id = oracle.current_session_id().await?;
        let principal = match oracle.current_principal().await {
            Ok(principal) => Some(principal),
            Err(IssuerError::Unauthenticated) => None,
            Err(err) => return Err(err),
        };
        let client_ids = oracle.participating_client_ids().await?;

        Ok(Self {
            session_id,
            principal,
            client_ids,
        })
    }
}

impl SessionOracle for SessionSnapshot {
    async fn current_session_id(&self) -> Result<Option<SessionId>> {
        Ok(self.session_id.clone().filter(|sid| !sid.is_blank()))
    }

    async fn current_principal(&self) -> Result<Principal> {
        self.principal.clone().ok_or(IssuerError::Unauthenticated)
    }

    async fn participating_client_ids(&self) -> Result<Vec<ClientId>> {
        Ok(self.client_ids.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn new_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_anonymous_session() {
        let oracle = TowerSessionOracle::new(new_session());

        assert_eq!(oracle.current_session_id().await.unwrap(), None);
        assert!(matches!(
            oracle.current_principal().await,
            Err(IssuerError::Unauthenticated)
        ));
        assert!(oracle.participating_client_ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_authenticated_session_round_trip() {
        let session = new_session();
        let sid = SessionId::from("s1");
        start_authenticated_session(&session, &sid, &Principal::new("alice"))
            .await
            .unwrap();
        add_participating_client(&session, &ClientId::from("web"))
            .await
            .unwrap();
        add_participating_client(&session, &ClientId::from("mobile"))
            .await
            .unwrap();
        add_participating_client(&session, &ClientId::from("web"))
            .await
            .unwrap();

        let oracle = TowerSessionOracle::new(session);
        assert_eq!(oracle.current_session_id().await.unwrap(), Some(sid));
        assert_eq!(
            oracle.current_principal().await.unwrap().subject_id().as_str(),
            "alice"
        );
        assert_eq!(
            oracle.participating_client_ids().await.unwrap(),
            vec![ClientId::from("web"), ClientId::from("mobile")]
        );
    }

    #[tokio::test]
    async fn test_new_session_clears_old_clients() {
        let session = new_session();
        start_authenticated_session(&session, &SessionId::from("s1"), &Principal::new("alice"))
            .await
            .unwrap();
        add_participating_client(&session, &ClientId::from("web"))
            .await
            .unwrap();

        start_authenticated_session(&session, &SessionId::from("s2"), &Principal::new("alice"))
            .await
            .unwrap();

        let oracle = TowerSessionOracle::new(session);
        assert!(oracle.participating_client_ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_end_authenticated_session() {
        let session = new_session();
        start_authenticated_session(&session, &SessionId::from("s1"), &Principal::new("alice"))
            .await
            .unwrap();
        end_authenticated_session(&session).await.unwrap();

        let snapshot = SessionSnapshot::capture(&TowerSessionOracle::new(session))
            .await
            .unwrap();
        assert_eq!(snapshot, SessionSnapshot::anonymous());
    }

    #[tokio::test]
    async fn test_blank_session_id_reads_as_none() {
        let snapshot = SessionSnapshot::authenticated("  ", Principal::new("alice"), vec![]);
        assert_eq!(snapshot.current_session_id().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_capture_freezes_session() {
        let session = new_session();
        start_authenticated_session(&session, &SessionId::from("s1"), &Principal::new("alice"))
            .await
            .unwrap();
        let snapshot = SessionSnapshot::capture(&TowerSessionOracle::new(session.clone()))
            .await
            .unwrap();

        end_authenticated_session(&session).await.unwrap();

        assert_eq!(
            snapshot.current_session_id().await.unwrap(),
            Some(SessionId::from("s1"))
        );
    }

    #[test]
    fn test_generated_session_ids_are_unique() {
        let a = generate_session_id();
        let b = generate_session_id();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 43);
    }
}
