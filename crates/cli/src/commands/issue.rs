//! Issue a sign-out callback against an in-memory session.
//!
//! Runs the same issuer a server would, with a [`SessionSnapshot`] standing in
//! for the request's session and a [`MemoryMessageStore`] for the handoff.

use signout_core::{ClientId, CorrelationToken, Principal, SessionId};
use signout_issuer::session::generate_session_id;
use signout_issuer::{
    IssuerConfig, IssuerError, MemoryMessageStore, SessionSnapshot, SignOutCallbackIssuer,
};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::IssueArgs;

/// Errors that can occur while issuing a callback.
#[derive(Debug, Error)]
pub enum IssueError {
    /// An authenticated session needs a subject.
    #[error("--subject is required unless --anonymous is set")]
    MissingSubject,

    #[error(transparent)]
    Issuer(#[from] IssuerError),

    #[error("Issued URL is malformed: {0}")]
    Url(#[from] url::ParseError),

    #[error("Issued URL has no {0} parameter")]
    MissingToken(String),

    #[error("Failed to encode notification: {0}")]
    Json(#[from] serde_json::Error),
}

/// Issue a callback and print it, optionally redeeming it straight away.
///
/// # Errors
///
/// Returns `IssueError` if the session arguments are incomplete or the issuer fails.
pub async fn run(config: IssuerConfig, args: IssueArgs) -> Result<(), IssueError> {
    let session = if args.anonymous {
        SessionSnapshot::anonymous()
    } else {
        let subject = args.subject.ok_or(IssueError::MissingSubject)?;
        let session_id = args
            .session_id
            .map_or_else(generate_session_id, SessionId::from);
        println!("session: {session_id}");

        SessionSnapshot::authenticated(
            session_id,
            Principal::new(subject),
            args.clients.into_iter().map(ClientId::from).collect(),
        )
    };

    let store = MemoryMessageStore::from_config(&config);
    let issuer = SignOutCallbackIssuer::new(config, store);

    let Some(callback_url) = issuer
        .issue_signout_callback_url(&session, args.requested_sid.as_deref())
        .await?
    else {
        println!("no sign-out notification issued");
        return Ok(());
    };
    println!("{callback_url}");

    if args.redeem {
        let param = issuer.config().callback_param();
        let token = Url::parse(&callback_url)?
            .query_pairs()
            .find(|(key, _)| key == param)
            .map(|(_, value)| CorrelationToken::new(value.into_owned()))
            .ok_or_else(|| IssueError::MissingToken(param.to_string()))?;
        debug!("Redeeming callback token");

        match issuer.redeem(&token).await? {
            Some(notification) => println!("{}", serde_json::to_string_pretty(&notification)?),
            None => println!("notification no longer available"),
        }
    }

    Ok(())
}
