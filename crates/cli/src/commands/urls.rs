//! URL derivation commands.

use signout_core::url::relative_url as resolve_relative_url;
use signout_issuer::IssuerConfig;
use thiserror::Error;

/// Errors that can occur while deriving URLs.
#[derive(Debug, Error)]
pub enum UrlError {
    /// The path would leave the server's origin.
    #[error("Not a local path: {0}")]
    NotLocal(String),
}

/// Print `path` resolved against the configured base URL.
///
/// # Errors
///
/// Returns `UrlError::NotLocal` if `path` is not a local path.
pub fn relative_url(config: &IssuerConfig, path: &str) -> Result<(), UrlError> {
    let url = resolve_relative_url(config.base_url(), path)
        .ok_or_else(|| UrlError::NotLocal(path.to_string()))?;
    println!("{url}");
    Ok(())
}

/// Print the issuer URI.
pub fn issuer_uri(config: &IssuerConfig) {
    println!("{}", config.issuer_uri());
}
