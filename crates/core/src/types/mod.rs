//! Core types for sign-out notifications.
//!
//! This module provides type-safe wrappers for the session-end domain.

pub mod id;
pub mod message;
pub mod notification;
pub mod principal;

pub use id::*;
pub use message::Message;
pub use notification::{NotificationError, SignOutNotification};
pub use principal::Principal;
