//! Signout Core - Shared types library.
//!
//! This crate provides the types and pure helpers used by the sign-out
//! notification components:
//! - `issuer` - Authorizes and issues end-session callback URLs
//! - `cli` - Command-line tool for issuing and inspecting callbacks
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no session
//! access, no message stores. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype identifiers, the principal, the notification payload
//!   and the message envelope handed to stores
//! - [`url`] - Slash normalization, local-path validation and query-string
//!   composition

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod url;

pub use types::*;
