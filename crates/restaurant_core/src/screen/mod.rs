//! Home screen controller, state machine and render model.
//!
//! # Responsibility
//! - Own per-instance screen state (edit mode, modal selection).
//! - Tie the live list subscription to the screen lifecycle.
//! - Project the current list into rows a UI layer renders.
//!
//! # Invariants
//! - State lives in the screen instance; nothing is process-wide.
//! - Every modal action closes the modal.

mod home;
mod state;
mod view;

pub use home::{HomeScreen, ScreenError};
pub use state::{EditMode, ModalAction, ModalIntent, ModalState, ScreenState};
pub use view::{
    build_view, notes_preview, HomeView, RestaurantRow, Thumbnail, ADD_BUTTON_LABEL,
    DONE_BUTTON_LABEL, EDIT_BUTTON_LABEL, NO_IMAGE_LABEL, SCREEN_TITLE,
};
