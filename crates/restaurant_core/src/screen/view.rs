//! Render model for the home screen.

use super::state::ScreenState;
use crate::model::restaurant::Restaurant;

pub const SCREEN_TITLE: &str = "My Restaurants";
pub const EDIT_BUTTON_LABEL: &str = "Edit";
pub const DONE_BUTTON_LABEL: &str = "Done";
pub const ADD_BUTTON_LABEL: &str = "+";
pub const NO_IMAGE_LABEL: &str = "No Image";
const NOTES_PREVIEW_LINES: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Thumbnail {
    Image(String),
    Placeholder(&'static str),
}

/// One list row, keyed by restaurant id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantRow {
    pub id: String,
    pub name: String,
    pub notes_preview: String,
    pub thumbnail: Thumbnail,
    pub show_edit_button: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeView {
    pub title: &'static str,
    pub edit_button_label: &'static str,
    pub add_button_label: &'static str,
    pub rows: Vec<RestaurantRow>,
    /// `Some("Edit <name>")` while the modal is open.
    pub modal_title: Option<String>,
}

pub fn build_view(state: &ScreenState, restaurants: &[Restaurant]) -> HomeView {
    let editing = state.is_editing();
    let rows = restaurants
        .iter()
        .map(|restaurant| RestaurantRow {
            id: restaurant.id.clone(),
            name: restaurant.name.clone(),
            notes_preview: notes_preview(&restaurant.notes),
            thumbnail: restaurant
                .thumbnail()
                .map_or(Thumbnail::Placeholder(NO_IMAGE_LABEL), |uri| {
                    Thumbnail::Image(uri.to_string())
                }),
            show_edit_button: editing,
        })
        .collect();

    HomeView {
        title: SCREEN_TITLE,
        edit_button_label: if editing {
            DONE_BUTTON_LABEL
        } else {
            EDIT_BUTTON_LABEL
        },
        add_button_label: ADD_BUTTON_LABEL,
        rows,
        modal_title: state
            .selected()
            .map(|restaurant| format!("Edit {}", restaurant.name)),
    }
}

/// Keeps the first two lines of `notes`.
pub fn notes_preview(notes: &str) -> String {
    notes
        .lines()
        .take(NOTES_PREVIEW_LINES)
        .collect::<Vec<_>>()
        .join("\n")
}
