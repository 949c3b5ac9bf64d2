//! End-to-end sign-out flow over `tower-sessions`.
//!
//! A user signs in, visits clients, signs out; the issued callback URL is
//! redeemed on the callback side exactly once.

#![allow(clippy::unwrap_used)]

use signout_core::ClientId;
use signout_issuer::session::{add_participating_client, end_authenticated_session};
use signout_issuer::{IssuerError, SessionSnapshot, TowerSessionOracle};
use signout_integration_tests::{anonymous_session, signed_in_session, test_issuer, token_from};

// =============================================================================
// Issue and redeem
// =============================================================================

#[tokio::test]
async fn test_browser_initiated_signout() {
    let issuer = test_issuer();
    let session = signed_in_session("s1", "alice", &["web", "mobile"]).await;
    let oracle = TowerSessionOracle::new(session);

    let url = issuer
        .issue_signout_callback_url(&oracle, None)
        .await
        .unwrap()
        .expect("callback issued for current session");

    assert!(url.starts_with("https://id.example.com/as/connect/endsessioncallback?sid="));

    let notification = issuer
        .redeem(&token_from(&url, "sid"))
        .await
        .unwrap()
        .expect("notification available");
    assert_eq!(notification.subject_id().as_str(), "alice");
    assert_eq!(notification.session_id().as_str(), "s1");
    assert_eq!(
        notification.client_ids(),
        &[ClientId::from("web"), ClientId::from("mobile")]
    );
}

#[tokio::test]
async fn test_callback_is_single_use() {
    let issuer = test_issuer();
    let oracle = TowerSessionOracle::new(signed_in_session("s1", "alice", &["web"]).await);

    let url = issuer
        .issue_signout_callback_url(&oracle, Some("s1"))
        .await
        .unwrap()
        .unwrap();
    let token = token_from(&url, "sid");

    assert!(issuer.redeem(&token).await.unwrap().is_some());
    assert!(issuer.redeem(&token).await.unwrap().is_none());
}

#[tokio::test]
async fn test_each_signout_gets_its_own_token() {
    let issuer = test_issuer();
    let oracle = TowerSessionOracle::new(signed_in_session("s1", "alice", &[]).await);

    let first = issuer.issue_signout_callback_url(&oracle, None).await.unwrap().unwrap();
    let second = issuer.issue_signout_callback_url(&oracle, None).await.unwrap().unwrap();

    assert_ne!(token_from(&first, "sid"), token_from(&second, "sid"));
}

#[tokio::test]
async fn test_clients_joined_after_issue_are_not_included() {
    let issuer = test_issuer();
    let session = signed_in_session("s1", "alice", &["web"]).await;

    let url = issuer
        .issue_signout_callback_url(&TowerSessionOracle::new(session.clone()), None)
        .await
        .unwrap()
        .unwrap();
    add_participating_client(&session, &ClientId::from("late"))
        .await
        .unwrap();

    let notification = issuer
        .redeem(&token_from(&url, "sid"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(notification.client_ids(), &[ClientId::from("web")]);
}

// =============================================================================
// Refusals
// =============================================================================

#[tokio::test]
async fn test_anonymous_caller_gets_nothing() {
    let issuer = test_issuer();
    let oracle = TowerSessionOracle::new(anonymous_session());

    assert_eq!(issuer.issue_signout_callback_url(&oracle, None).await.unwrap(), None);
    assert_eq!(
        issuer.issue_signout_callback_url(&oracle, Some("s1")).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn test_forged_session_id_is_refused() {
    let issuer = test_issuer();
    let oracle = TowerSessionOracle::new(signed_in_session("s1", "alice", &["web"]).await);

    let result = issuer
        .issue_signout_callback_url(&oracle, Some("someone-elses-session"))
        .await
        .unwrap();

    assert_eq!(result, None);
}

#[tokio::test]
async fn test_signed_out_session_gets_nothing() {
    let issuer = test_issuer();
    let session = signed_in_session("s1", "alice", &["web"]).await;
    end_authenticated_session(&session).await.unwrap();

    let result = issuer
        .issue_signout_callback_url(&TowerSessionOracle::new(session), Some("s1"))
        .await
        .unwrap();

    assert_eq!(result, None);
}

// =============================================================================
// Snapshot
// =============================================================================

#[tokio::test]
async fn test_snapshot_of_live_session_issues_same_payload() {
    let issuer = test_issuer();
    let session = signed_in_session("s1", "alice", &["web"]).await;
    let snapshot = SessionSnapshot::capture(&TowerSessionOracle::new(session))
        .await
        .unwrap();

    let url = issuer.issue_signout_callback_url(&snapshot, None).await.unwrap().unwrap();
    let notification = issuer.redeem(&token_from(&url, "sid")).await.unwrap().unwrap();

    assert_eq!(notification.session_id().as_str(), "s1");
    assert_eq!(notification.client_ids(), &[ClientId::from("web")]);
}

#[tokio::test]
async fn test_session_id_without_principal_fails() {
    let issuer = test_issuer();
    let session = anonymous_session();
    session
        .insert(signout_issuer::session::session_keys::SESSION_ID, "s1")
        .await
        .unwrap();

    let result = issuer
        .issue_signout_callback_url(&TowerSessionOracle::new(session), None)
        .await;

    assert!(matches!(result, Err(IssuerError::Unauthenticated)));
}
