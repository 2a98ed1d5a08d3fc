//! Restaurant record model.
//!
//! # Responsibility
//! - Decode remote field maps into an explicit `Restaurant` shape.
//! - Carry both the server-stored and the effective `showReviews` value.
//!
//! # Invariants
//! - `notes` defaults to `""` and `images` to empty when absent.
//! - `show_reviews` equals `stored_show_reviews` until an override is applied.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier assigned by the remote document store.
pub type RestaurantId = String;

pub const FIELD_NAME: &str = "name";
pub const FIELD_NOTES: &str = "notes";
pub const FIELD_IMAGES: &str = "images";
pub const FIELD_SHOW_REVIEWS: &str = "showReviews";

/// One user-owned restaurant as rendered by the home screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub notes: String,
    /// Image references in display order; the first one is the thumbnail.
    pub images: Vec<String>,
    /// Value persisted by the remote store.
    pub stored_show_reviews: bool,
    /// Effective value after local override resolution.
    pub show_reviews: bool,
}

impl Restaurant {
    /// Decodes one remote document.
    ///
    /// Fields with an unexpected JSON type are treated as missing.
    pub fn from_document(id: impl Into<RestaurantId>, fields: &Map<String, Value>) -> Self {
        let name = string_field(fields, FIELD_NAME);
        let notes = string_field(fields, FIELD_NOTES);
        let images = fields
            .get(FIELD_IMAGES)
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        let stored_show_reviews = fields
            .get(FIELD_SHOW_REVIEWS)
            .and_then(Value::as_bool)
            .unwrap_or(false);

        Self {
            id: id.into(),
            name,
            notes,
            images,
            stored_show_reviews,
            show_reviews: stored_show_reviews,
        }
    }

    /// Returns the thumbnail reference, if the record has any image.
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Returns a copy carrying `effective` as the resolved preference.
    pub fn with_show_reviews(mut self, effective: bool) -> Self {
        self.show_reviews = effective;
        self
    }

    /// Encodes the record back into a remote field map.
    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert(FIELD_NAME.to_string(), Value::from(self.name.as_str()));
        fields.insert(FIELD_NOTES.to_string(), Value::from(self.notes.as_str()));
        fields.insert(
            FIELD_IMAGES.to_string(),
            Value::from(self.images.clone()),
        );
        fields.insert(
            FIELD_SHOW_REVIEWS.to_string(),
            Value::from(self.stored_show_reviews),
        );
        fields
    }
}

fn string_field(fields: &Map<String, Value>, key: &str) -> String {
    fields
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
