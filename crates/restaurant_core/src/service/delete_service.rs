//! Restaurant delete use-case.
//!
//! # Responsibility
//! - Delete one restaurant remotely, then drop its local override.
//! - Report the outcome to the user through the notifier.
//!
//! # Invariants
//! - Local cleanup runs only after the remote delete succeeded.
//! - A cleanup failure is logged, never surfaced to the user.
//! - The displayed list is not touched; the next snapshot reflects the delete.

use crate::prefs::show_reviews::show_reviews_key;
use crate::prefs::PreferenceStore;
use crate::remote::{RemoteError, RemoteStore};
use crate::ui::Notifier;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub const DELETE_SUCCESS_TITLE: &str = "Success";
pub const DELETE_SUCCESS_MESSAGE: &str = "Restaurant deleted!";
pub const DELETE_FAILURE_TITLE: &str = "Error";
pub const DELETE_FAILURE_MESSAGE: &str = "Failed to delete restaurant.";

/// Delete use-case error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteError {
    /// Remote store rejected the delete; local state was left untouched.
    Remote(RemoteError),
}

impl Display for DeleteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote(err) => write!(f, "remote delete failed: {err}"),
        }
    }
}

impl Error for DeleteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Remote(err) => Some(err),
        }
    }
}

impl From<RemoteError> for DeleteError {
    fn from(value: RemoteError) -> Self {
        Self::Remote(value)
    }
}

/// Result of a successful delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteReport {
    pub restaurant_id: String,
    /// `false` when the override key could not be removed and was left behind.
    pub override_cleared: bool,
}

/// Coordinates remote deletion and local override cleanup.
pub struct DeleteCoordinator {
    remote: Arc<dyn RemoteStore>,
    prefs: Arc<dyn PreferenceStore>,
    notifier: Arc<dyn Notifier>,
    collection: String,
}

impl DeleteCoordinator {
    pub fn new(
        remote: Arc<dyn RemoteStore>,
        prefs: Arc<dyn PreferenceStore>,
        notifier: Arc<dyn Notifier>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            remote,
            prefs,
            notifier,
            collection: collection.into(),
        }
    }

    /// Deletes `restaurant_id` and notifies the user of the outcome.
    ///
    /// # Errors
    /// - Returns `DeleteError::Remote` when the remote delete fails; the
    ///   failure notification has already been shown.
    pub async fn delete_restaurant(&self, restaurant_id: &str) -> Result<DeleteReport, DeleteError> {
        if let Err(err) = self.remote.delete(&self.collection, restaurant_id).await {
            error!(
                "event=restaurant_delete module=service status=error restaurant_id={} error_code=remote_delete_failed error={}",
                restaurant_id, err
            );
            self.notifier.notify(DELETE_FAILURE_TITLE, DELETE_FAILURE_MESSAGE);
            return Err(err.into());
        }

        let key = show_reviews_key(restaurant_id);
        let override_cleared = match self.prefs.remove(&key).await {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    "event=override_cleanup module=service status=error restaurant_id={} error_code=override_orphaned error={}",
                    restaurant_id, err
                );
                false
            }
        };

        info!(
            "event=restaurant_delete module=service status=ok restaurant_id={} override_cleared={}",
            restaurant_id, override_cleared
        );
        self.notifier.notify(DELETE_SUCCESS_TITLE, DELETE_SUCCESS_MESSAGE);
        Ok(DeleteReport {
            restaurant_id: restaurant_id.to_string(),
            override_cleared,
        })
    }
}
