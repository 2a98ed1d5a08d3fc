//! Presentational state machine of the home screen.
//!
//! `EditMode` and `ModalState` are orthogonal: toggling edit mode leaves an
//! open modal alone, and the modal keeps the record captured when it opened.

use crate::model::restaurant::Restaurant;
use crate::ui::Route;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditMode {
    #[default]
    Viewing,
    Editing,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Closed,
    Open(Restaurant),
}

/// Buttons offered by the edit modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    EditDetails,
    Delete,
    Cancel,
}

/// Side effect requested by a modal action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalIntent {
    Navigate(Route),
    Delete(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenState {
    mode: EditMode,
    modal: ModalState,
}

impl ScreenState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode == EditMode::Editing
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    /// Record bound to the open modal.
    pub fn selected(&self) -> Option<&Restaurant> {
        match &self.modal {
            ModalState::Open(restaurant) => Some(restaurant),
            ModalState::Closed => None,
        }
    }

    /// Flips between viewing and editing and returns the new mode.
    pub fn toggle_edit_mode(&mut self) -> EditMode {
        self.mode = match self.mode {
            EditMode::Viewing => EditMode::Editing,
            EditMode::Editing => EditMode::Viewing,
        };
        self.mode
    }

    /// Opens the modal for `restaurant`. Ignored unless editing.
    pub fn open_modal(&mut self, restaurant: Restaurant) -> bool {
        if !self.is_editing() {
            return false;
        }
        self.modal = ModalState::Open(restaurant);
        true
    }

    /// Applies a modal button press: closes the modal and returns the
    /// requested side effect. No-op while the modal is closed.
    pub fn apply_modal_action(&mut self, action: ModalAction) -> Option<ModalIntent> {
        let ModalState::Open(restaurant) = std::mem::take(&mut self.modal) else {
            return None;
        };
        match action {
            ModalAction::EditDetails => Some(ModalIntent::Navigate(Route::EditRestaurant {
                restaurant,
            })),
            ModalAction::Delete => Some(ModalIntent::Delete(restaurant.id)),
            ModalAction::Cancel => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EditMode, ModalAction, ModalIntent, ModalState, ScreenState};
    use crate::model::restaurant::Restaurant;
    use crate::ui::Route;

    fn restaurant(id: &str) -> Restaurant {
        Restaurant::from_document(id, &serde_json::Map::new())
    }

    #[test]
    fn toggle_switches_between_modes() {
        let mut state = ScreenState::new();
        assert_eq!(state.mode(), EditMode::Viewing);
        assert_eq!(state.toggle_edit_mode(), EditMode::Editing);
        assert_eq!(state.toggle_edit_mode(), EditMode::Viewing);
    }

    #[test]
    fn modal_opens_only_while_editing() {
        let mut state = ScreenState::new();
        assert!(!state.open_modal(restaurant("a")));
        assert_eq!(state.modal(), &ModalState::Closed);

        state.toggle_edit_mode();
        assert!(state.open_modal(restaurant("a")));
        assert_eq!(state.selected().map(|r| r.id.as_str()), Some("a"));
    }

    #[test]
    fn every_modal_action_closes_the_modal() {
        for action in [ModalAction::EditDetails, ModalAction::Delete, ModalAction::Cancel] {
            let mut state = ScreenState::new();
            state.toggle_edit_mode();
            state.open_modal(restaurant("a"));
            let intent = state.apply_modal_action(action);
            assert_eq!(state.modal(), &ModalState::Closed);
            match action {
                ModalAction::EditDetails => assert_eq!(
                    intent,
                    Some(ModalIntent::Navigate(Route::EditRestaurant {
                        restaurant: restaurant("a")
                    }))
                ),
                ModalAction::Delete => assert_eq!(intent, Some(ModalIntent::Delete("a".into()))),
                ModalAction::Cancel => assert_eq!(intent, None),
            }
        }
    }

    #[test]
    fn leaving_edit_mode_keeps_modal_open() {
        let mut state = ScreenState::new();
        state.toggle_edit_mode();
        state.open_modal(restaurant("a"));
        state.toggle_edit_mode();
        assert!(state.selected().is_some());
        assert_eq!(state.apply_modal_action(ModalAction::Cancel), None);
        assert_eq!(state.apply_modal_action(ModalAction::Delete), None);
    }
}
