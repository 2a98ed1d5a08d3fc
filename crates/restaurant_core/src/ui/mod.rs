//! Collaborator ports toward the platform UI.
//!
//! # Responsibility
//! - Define navigation and user-notification capabilities the core calls.
//! - Provide log-backed implementations for headless hosts.

mod navigation;
mod notification;

pub use navigation::{LogNavigator, Navigator, Route};
pub use notification::{LogNotifier, Notifier};
