//! Live synchronization between the remote collection and the screen list.
//!
//! # Responsibility
//! - Turn pushed snapshots into enriched, ordered restaurant lists.
//! - Publish only the most recent snapshot's list.
//!
//! # Invariants
//! - Published list order equals snapshot document order.
//! - A per-record override failure never blocks other records.

pub mod live_list;
