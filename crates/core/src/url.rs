//! URL composition helpers.
//!
//! Pure string functions used to build every URL the issuer emits. None of
//! them touch the network or parse full URLs; base URLs are validated once at
//! configuration time.

/// Returns `true` if `url` is a path that stays on this server's origin.
///
/// Accepted forms are `/path` and `~/path` (application-relative). Anything
/// with a scheme, protocol-relative forms (`//host`, `/\host`), bare relative
/// paths and inputs containing ASCII control characters are rejected.
///
/// # Examples
///
/// ```
/// use signout_core::url::is_local_url;
///
/// assert!(is_local_url("/connect/endsession"));
/// assert!(is_local_url("~/account/logout"));
/// assert!(!is_local_url("//evil.example.com"));
/// assert!(!is_local_url("https://evil.example.com"));
/// ```
#[must_use]
pub fn is_local_url(url: &str) -> bool {
    if url.chars().any(|c| c.is_ascii_control()) {
        return false;
    }

    let rest = if let Some(rest) = url.strip_prefix("~/") {
        rest
    } else if let Some(rest) = url.strip_prefix('/') {
        rest
    } else {
        return false;
    };

    !(rest.starts_with('/') || rest.starts_with('\\'))
}

/// Append a `/` to `url` unless it already ends with one.
#[must_use]
pub fn ensure_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_owned()
    } else {
        format!("{url}/")
    }
}

/// Strip leading slashes from `path`.
///
/// Stripping every leading slash keeps the function idempotent and guarantees
/// that joining the result onto a slash-terminated base never yields `//`.
#[must_use]
pub fn remove_leading_slash(path: &str) -> &str {
    path.trim_start_matches('/')
}

/// Strip a single trailing `/` from `url`, if present.
#[must_use]
pub fn remove_trailing_slash(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}

/// Append a query parameter to `url`.
///
/// Uses `?` when `url` has no query yet and `&` otherwise. Both key and value
/// are percent-encoded. A fragment, if present, stays at the end.
///
/// # Examples
///
/// ```
/// use signout_core::url::add_query_string;
///
/// assert_eq!(add_query_string("https://id.example.com/cb", "sid", "a b"), "https://id.example.com/cb?sid=a%20b");
/// assert_eq!(add_query_string("https://id.example.com/cb?x=1", "sid", "y"), "https://id.example.com/cb?x=1&sid=y");
/// ```
#[must_use]
pub fn add_query_string(url: &str, key: &str, value: &str) -> String {
    let (base, fragment) = match url.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (url, None),
    };

    let separator = if base.ends_with('?') || base.ends_with('&') {
        ""
    } else if base.contains('?') {
        "&"
    } else {
        "?"
    };

    let mut composed = format!(
        "{base}{separator}{}={}",
        urlencoding::encode(key),
        urlencoding::encode(value)
    );
    if let Some(fragment) = fragment {
        composed.push('#');
        composed.push_str(fragment);
    }
    composed
}

/// Resolve a local `path` against `base_url`.
///
/// Returns `None` if `path` is not a local URL (see [`is_local_url`]), so
/// caller-supplied paths can never produce an open redirect.
///
/// # Examples
///
/// ```
/// use signout_core::url::relative_url;
///
/// assert_eq!(
///     relative_url("https://id.example.com/as", "~/account/logout").as_deref(),
///     Some("https://id.example.com/as/account/logout")
/// );
/// assert_eq!(relative_url("https://id.example.com", "https://evil.example.com"), None);
/// ```
#[must_use]
pub fn relative_url(base_url: &str, path: &str) -> Option<String> {
    if !is_local_url(path) {
        return None;
    }

    let path = path.strip_prefix('~').unwrap_or(path);
    Some(join(base_url, path))
}

/// Join `path` onto `base_url` with exactly one slash between them.
#[must_use]
pub fn join(base_url: &str, path: &str) -> String {
    let mut joined = ensure_trailing_slash(base_url);
    joined.push_str(remove_leading_slash(path));
    joined
}
