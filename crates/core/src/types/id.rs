//! Newtype identifiers for type-safe session references.
//!
//! Use the `define_string_id!` macro to create type-safe wrappers that prevent
//! accidentally passing a client id where a session id is expected.

/// Macro to define a type-safe string identifier.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Accessors: `new()`, `as_str()`, `into_inner()`, `is_blank()`
/// - `From<String>`, `From<&str>`, `AsRef<str>` and `Display` implementations
///
/// The wrapper does not validate its contents. Emptiness is checked where it
/// matters, e.g. when building a [`crate::SignOutNotification`].
///
/// # Example
///
/// ```rust
/// # use signout_core::define_string_id;
/// define_string_id!(TenantId);
/// define_string_id!(RealmId);
///
/// let tenant = TenantId::from("acme");
/// let realm = RealmId::from("acme");
///
/// // These are different types, so this won't compile:
/// // let _: TenantId = realm;
/// assert_eq!(tenant.as_str(), realm.as_str());
/// ```
#[macro_export]
macro_rules! define_string_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the identifier and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }

            /// Returns `true` if the identifier is empty or whitespace only.
            #[must_use]
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Identifiers used across the sign-out flow
define_string_id!(SessionId);
define_string_id!(SubjectId);
define_string_id!(ClientId);

// Opaque id handed out by a message store
define_string_id!(CorrelationToken);
