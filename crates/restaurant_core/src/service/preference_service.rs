//! On-device `showReviews` override use-cases.
//!
//! # Responsibility
//! - Create, read and clear the per-restaurant override.
//!
//! # Invariants
//! - Overrides are written as JSON booleans under `show_reviews_key(id)`.

use crate::prefs::show_reviews::{encode_show_reviews, show_reviews_key, ShowReviewsOverride};
use crate::prefs::{PrefResult, PreferenceStore};
use log::info;
use std::sync::Arc;

/// Facade over the local store for preference overrides.
pub struct PreferenceService {
    prefs: Arc<dyn PreferenceStore>,
}

impl PreferenceService {
    pub fn new(prefs: Arc<dyn PreferenceStore>) -> Self {
        Self { prefs }
    }

    /// Records that the user changed `showReviews` on this device.
    pub async fn set_show_reviews(&self, restaurant_id: &str, value: bool) -> PrefResult<()> {
        self.prefs
            .set(&show_reviews_key(restaurant_id), &encode_show_reviews(value))
            .await?;
        info!(
            "event=override_set module=service status=ok restaurant_id={} value={}",
            restaurant_id, value
        );
        Ok(())
    }

    /// Reads the stored override for one restaurant.
    pub async fn show_reviews_override(&self, restaurant_id: &str) -> PrefResult<ShowReviewsOverride> {
        let raw = self.prefs.get(&show_reviews_key(restaurant_id)).await?;
        Ok(ShowReviewsOverride::parse(raw.as_deref()))
    }

    /// Drops the override so the server value applies again.
    pub async fn clear_show_reviews(&self, restaurant_id: &str) -> PrefResult<()> {
        self.prefs.remove(&show_reviews_key(restaurant_id)).await
    }
}
