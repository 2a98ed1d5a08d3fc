//! Domain model for the restaurant home screen.
//!
//! # Responsibility
//! - Define the explicit record shape decoded from remote documents.
//!
//! # Invariants
//! - Every record is identified by the id assigned by the remote store.
//! - Missing optional fields are defaulted during decoding, never left implicit.

pub mod restaurant;
