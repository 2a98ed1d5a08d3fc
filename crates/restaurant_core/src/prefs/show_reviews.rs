//! `showReviews` override key and value codec.
//!
//! # Invariants
//! - Keys are `restaurant-showReviews-<id>`.
//! - Values are JSON booleans; `null` counts as absent, anything else is invalid.

/// Prefix shared by every `showReviews` override key.
pub const SHOW_REVIEWS_KEY_PREFIX: &str = "restaurant-showReviews-";

/// Parsed state of one stored override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowReviewsOverride {
    /// User changed the preference on-device.
    Present(bool),
    /// No override stored.
    Absent,
    /// Stored value is not a JSON boolean.
    Invalid(String),
}

impl ShowReviewsOverride {
    /// Parses a raw value as returned by the local store.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Absent;
        };
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::Bool(value)) => Self::Present(value),
            Ok(serde_json::Value::Null) => Self::Absent,
            Ok(other) => Self::Invalid(format!("expected boolean, got `{other}`")),
            Err(err) => Self::Invalid(err.to_string()),
        }
    }

    /// Resolves the effective preference against the server-stored value.
    ///
    /// `Present(false)` wins over a stored `true`; only a present override
    /// replaces the stored value.
    pub fn resolve(&self, stored: bool) -> bool {
        match self {
            Self::Present(value) => *value,
            Self::Absent | Self::Invalid(_) => stored,
        }
    }
}

/// Returns the local store key for the restaurant `id`.
pub fn show_reviews_key(id: &str) -> String {
    format!("{SHOW_REVIEWS_KEY_PREFIX}{id}")
}

/// Serializes a preference the way overrides are persisted.
pub fn encode_show_reviews(value: bool) -> String {
    serde_json::Value::Bool(value).to_string()
}
