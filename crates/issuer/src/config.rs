//! Issuer configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SIGNOUT_ORIGIN` - Public origin of the identity server (e.g. `https://id.example.com`)
//!
//! ## Optional
//! - `SIGNOUT_BASE_PATH` - Path the identity server is mounted under (default: empty)
//! - `SIGNOUT_ISSUER_URI` - Explicit issuer URI (default: derived from the base URL)
//! - `SIGNOUT_CALLBACK_PATH` - End-session callback route (default: `connect/endsessioncallback`)
//! - `SIGNOUT_CALLBACK_PARAM` - Query parameter carrying the correlation token (default: `sid`)
//! - `SIGNOUT_MESSAGE_TTL_SECS` - How long handed-off notifications stay readable (default: 300)
//! - `SIGNOUT_MESSAGE_CAPACITY` - Maximum number of pending notifications (default: 10000)

use std::time::Duration;

use signout_core::url::remove_trailing_slash;
use thiserror::Error;
use url::Url;

/// Default end-session callback route, relative to the base URL.
pub const DEFAULT_CALLBACK_PATH: &str = "connect/endsessioncallback";

/// Default query parameter name for the correlation token.
pub const DEFAULT_CALLBACK_PARAM: &str = "sid";

const DEFAULT_MESSAGE_TTL_SECS: u64 = 300;
const DEFAULT_MESSAGE_CAPACITY: u64 = 10_000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Issuer configuration.
///
/// Built once at startup and shared by every request. The origin and base path
/// are validated on construction, so URL composition never fails afterwards.
#[derive(Debug, Clone)]
pub struct IssuerConfig {
    base_url: String,
    issuer_uri: Option<String>,
    callback_path: String,
    callback_param: String,
    message_ttl: Duration,
    message_capacity: u64,
}

impl IssuerConfig {
    /// Create a configuration from an origin and the base path the server is
    /// mounted under. Everything else takes its default.
    ///
    /// The base URL is always `origin` followed by `base_path`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` if `origin` is not an absolute
    /// `http`/`https` origin (no path, query or fragment), or if `base_path`
    /// carries a query or fragment.
    pub fn new(origin: &str, base_path: &str) -> Result<Self, ConfigError> {
        let origin = validate_origin(origin)?;
        let base_path = normalize_base_path(base_path)?;

        Ok(Self {
            base_url: format!("{origin}{base_path}"),
            issuer_uri: None,
            callback_path: DEFAULT_CALLBACK_PATH.to_string(),
            callback_param: DEFAULT_CALLBACK_PARAM.to_string(),
            message_ttl: Duration::from_secs(DEFAULT_MESSAGE_TTL_SECS),
            message_capacity: DEFAULT_MESSAGE_CAPACITY,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let origin = get_required(&lookup, "SIGNOUT_ORIGIN")?;
        let base_path = get_or_default(&lookup, "SIGNOUT_BASE_PATH", "");
        let mut config = Self::new(&origin, &base_path)?;

        config.issuer_uri = lookup("SIGNOUT_ISSUER_URI").filter(|uri| !uri.trim().is_empty());

        config.callback_path = validate_callback_path(get_or_default(
            &lookup,
            "SIGNOUT_CALLBACK_PATH",
            DEFAULT_CALLBACK_PATH,
        ))?;
        config.callback_param = validate_callback_param(get_or_default(
            &lookup,
            "SIGNOUT_CALLBACK_PARAM",
            DEFAULT_CALLBACK_PARAM,
        ))?;

        let ttl_secs = parse_positive(
            &lookup,
            "SIGNOUT_MESSAGE_TTL_SECS",
            DEFAULT_MESSAGE_TTL_SECS,
        )?;
        config.message_ttl = Duration::from_secs(ttl_secs);
        config.message_capacity =
            parse_positive(&lookup, "SIGNOUT_MESSAGE_CAPACITY", DEFAULT_MESSAGE_CAPACITY)?;

        Ok(config)
    }

    /// Use an explicit issuer URI instead of deriving it from the base URL.
    #[must_use]
    pub fn with_issuer_uri(mut self, issuer_uri: impl Into<String>) -> Self {
        self.issuer_uri = Some(issuer_uri.into());
        self
    }

    /// Override the end-session callback route.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `path` carries a query or fragment.
    pub fn with_callback_path(mut self, path: impl Into<String>) -> Result<Self, ConfigError> {
        self.callback_path = validate_callback_path(path.into())?;
        Ok(self)
    }

    /// Override the correlation token query parameter name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `param` is blank.
    pub fn with_callback_param(mut self, param: impl Into<String>) -> Result<Self, ConfigError> {
        self.callback_param = validate_callback_param(param.into())?;
        Ok(self)
    }

    /// Override how long handed-off notifications remain readable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `ttl` is zero.
    pub fn with_message_ttl(mut self, ttl: Duration) -> Result<Self, ConfigError> {
        if ttl.is_zero() {
            return Err(ConfigError::InvalidEnvVar(
                "SIGNOUT_MESSAGE_TTL_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        self.message_ttl = ttl;
        Ok(self)
    }

    /// Public base URL: origin followed by base path.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The issuer URI.
    ///
    /// An explicitly configured URI wins. Otherwise it is the base URL without
    /// a trailing slash, lower-cased.
    #[must_use]
    pub fn issuer_uri(&self) -> String {
        self.issuer_uri
            .clone()
            .unwrap_or_else(|| remove_trailing_slash(&self.base_url).to_lowercase())
    }

    #[must_use]
    pub fn callback_path(&self) -> &str {
        &self.callback_path
    }

    #[must_use]
    pub fn callback_param(&self) -> &str {
        &self.callback_param
    }

    #[must_use]
    pub const fn message_ttl(&self) -> Duration {
        self.message_ttl
    }

    #[must_use]
    pub const fn message_capacity(&self) -> u64 {
        self.message_capacity
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required variable.
fn get_required<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a variable with a default value.
fn get_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Parse a numeric variable that must be greater than zero.
fn parse_positive<F>(lookup: &F, key: &str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = get_or_default(lookup, key, &default.to_string())
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if value == 0 {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(value)
}

/// The token query is appended to the callback route, which must not carry
/// its own query or fragment.
fn validate_callback_path(path: String) -> Result<String, ConfigError> {
    if path.contains(['?', '#']) {
        return Err(ConfigError::InvalidEnvVar(
            "SIGNOUT_CALLBACK_PATH".to_string(),
            "must not contain a query or fragment".to_string(),
        ));
    }
    Ok(path)
}

fn validate_callback_param(param: String) -> Result<String, ConfigError> {
    if param.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar(
            "SIGNOUT_CALLBACK_PARAM".to_string(),
            "must not be empty".to_string(),
        ));
    }
    Ok(param)
}

/// Validate an origin and return it without a trailing slash.
fn validate_origin(origin: &str) -> Result<String, ConfigError> {
    let parsed = Url::parse(origin)
        .map_err(|e| ConfigError::InvalidBaseUrl(format!("{origin}: {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl(format!(
            "{origin}: scheme must be http or https"
        )));
    }
    if parsed.host_str().is_none() {
        return Err(ConfigError::InvalidBaseUrl(format!("{origin}: missing host")));
    }
    if parsed.path() != "/" || parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(ConfigError::InvalidBaseUrl(format!(
            "{origin}: origin must not carry a path, query or fragment"
        )));
    }

    Ok(remove_trailing_slash(origin).to_string())
}

/// Normalize a base path to either empty or `/segment[/segment...]`.
fn normalize_base_path(base_path: &str) -> Result<String, ConfigError> {
    if base_path.contains(['?', '#']) {
        return Err(ConfigError::InvalidBaseUrl(format!(
            "{base_path}: base path must not carry a query or fragment"
        )));
    }

    let trimmed = base_path.trim_matches('/');
    if trimmed.is_empty() {
        Ok(String::new())
    } else {
        Ok(format!("/{trimmed}"))
    }
}
