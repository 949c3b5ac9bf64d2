//! Signout Issuer library.
//!
//! Decides whether the caller of a logout may receive a sign-out notification
//! callback for a session, hands the notification to a one-time message store
//! and returns the correlated callback URL.
//!
//! # Modules
//!
//! - [`config`] - Base URL, callback route and store settings from the environment
//! - [`session`] - The session oracle contract and its `tower-sessions` adapter
//! - [`store`] - The message handoff contract and a `moka`-backed memory store
//! - [`issuer`] - The callback issuer itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod issuer;
pub mod session;
pub mod store;

pub use config::{ConfigError, IssuerConfig};
pub use error::{IssuerError, Result};
pub use issuer::SignOutCallbackIssuer;
pub use session::{SessionOracle, SessionSnapshot, TowerSessionOracle};
pub use store::{MemoryMessageStore, MessageStore, StoreError};
