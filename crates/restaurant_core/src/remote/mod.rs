//! Remote live document store contract.
//!
//! # Responsibility
//! - Define the async subscribe/delete capability the home screen consumes.
//! - Model pushed snapshots and the cancellable subscription handle.
//!
//! # Invariants
//! - A subscription stays registered until `unsubscribe` or drop.
//! - Snapshot document order is the order the store delivers.

use async_trait::async_trait;
use futures::Stream;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

mod memory;

pub use memory::MemoryRemoteStore;

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Remote store failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// Store is offline or refused the request.
    Unavailable(String),
    /// Collection name is empty or malformed.
    InvalidCollection(String),
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(details) => write!(f, "remote store unavailable: {details}"),
            Self::InvalidCollection(name) => write!(f, "invalid collection name: `{name}`"),
        }
    }
}

impl Error for RemoteError {}

/// One document inside a pushed snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    pub id: String,
    pub fields: Map<String, Value>,
}

/// Full contents of a collection at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionSnapshot {
    pub documents: Vec<DocumentSnapshot>,
}

impl CollectionSnapshot {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Live feed of snapshots for one collection.
///
/// Dropping the subscription releases it on the store side.
pub struct Subscription {
    receiver: mpsc::UnboundedReceiver<CollectionSnapshot>,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Builds a subscription; `release` runs once on unsubscribe or drop.
    pub fn new(
        receiver: mpsc::UnboundedReceiver<CollectionSnapshot>,
        release: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            receiver,
            release: Some(Box::new(release)),
        }
    }

    /// Waits for the next snapshot; `None` once the store closes the feed.
    pub async fn next_snapshot(&mut self) -> Option<CollectionSnapshot> {
        self.receiver.recv().await
    }

    /// Releases the registration explicitly.
    pub fn unsubscribe(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if let Some(release) = self.release.take() {
            self.receiver.close();
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_once();
    }
}

impl Stream for Subscription {
    type Item = CollectionSnapshot;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

/// Remote document database holding the restaurant collection.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Opens a standing subscription; the current contents arrive first.
    async fn subscribe(&self, collection: &str) -> RemoteResult<Subscription>;
    /// Deletes one document by id.
    async fn delete(&self, collection: &str, id: &str) -> RemoteResult<()>;
}
