//! Home screen controller.
//!
//! # Responsibility
//! - Start the live list on mount and release it on unmount.
//! - Route user gestures to navigation, modal state and the delete use-case.
//!
//! # Invariants
//! - At most one live subscription per screen instance.
//! - Deleting never edits the displayed list directly.

use super::state::{EditMode, ModalAction, ModalIntent, ScreenState};
use super::view::{build_view, HomeView};
use crate::config::CoreConfig;
use crate::model::restaurant::Restaurant;
use crate::prefs::PreferenceStore;
use crate::remote::{RemoteError, RemoteStore};
use crate::service::delete_service::{DeleteCoordinator, DeleteError, DeleteReport};
use crate::sync::live_list::{LiveListSynchronizer, LiveRestaurantList, RestaurantListState};
use crate::ui::{Navigator, Notifier, Route};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

#[derive(Debug)]
pub enum ScreenError {
    /// Subscription could not be opened on mount.
    Subscribe(RemoteError),
    /// Gesture referenced a record that is not in the current list.
    RestaurantNotFound(String),
    Delete(DeleteError),
}

impl Display for ScreenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Subscribe(err) => write!(f, "cannot subscribe to restaurants: {err}"),
            Self::RestaurantNotFound(id) => write!(f, "restaurant not in list: {id}"),
            Self::Delete(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ScreenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Subscribe(err) => Some(err),
            Self::Delete(err) => Some(err),
            Self::RestaurantNotFound(_) => None,
        }
    }
}

impl From<DeleteError> for ScreenError {
    fn from(value: DeleteError) -> Self {
        Self::Delete(value)
    }
}

/// One mounted "My Restaurants" screen.
pub struct HomeScreen {
    synchronizer: LiveListSynchronizer,
    deleter: DeleteCoordinator,
    navigator: Arc<dyn Navigator>,
    state: ScreenState,
    live: Option<LiveRestaurantList>,
}

impl HomeScreen {
    pub fn new(
        config: &CoreConfig,
        remote: Arc<dyn RemoteStore>,
        prefs: Arc<dyn PreferenceStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            synchronizer: LiveListSynchronizer::new(
                Arc::clone(&remote),
                Arc::clone(&prefs),
                config.collection.as_str(),
            ),
            deleter: DeleteCoordinator::new(remote, prefs, notifier, config.collection.as_str()),
            navigator,
            state: ScreenState::new(),
            live: None,
        }
    }

    /// Subscribes to the collection. Mounting twice keeps the first feed.
    pub async fn mount(&mut self) -> Result<(), ScreenError> {
        if self.live.is_some() {
            return Ok(());
        }
        let live = self
            .synchronizer
            .start()
            .await
            .map_err(ScreenError::Subscribe)?;
        info!(
            "event=screen_mount module=screen status=ok collection={}",
            self.synchronizer.collection()
        );
        self.live = Some(live);
        Ok(())
    }

    /// Cancels the live list and waits for the subscription to be released.
    pub async fn unmount(&mut self) {
        if let Some(live) = self.live.take() {
            live.cancel().await;
            info!(
                "event=screen_unmount module=screen status=ok collection={}",
                self.synchronizer.collection()
            );
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.live.is_some()
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    /// Latest published list; empty before mount.
    pub fn list_state(&self) -> RestaurantListState {
        self.live
            .as_ref()
            .map(LiveRestaurantList::current)
            .unwrap_or_default()
    }

    pub fn restaurants(&self) -> Vec<Restaurant> {
        self.list_state().restaurants
    }

    /// Waits until the list reflects snapshot `generation` or a later one.
    pub async fn wait_for_generation(&mut self, generation: u64) -> Option<RestaurantListState> {
        match self.live.as_mut() {
            Some(live) => live.wait_for_generation(generation).await,
            None => None,
        }
    }

    /// Waits for the next list publication.
    pub async fn next_list(&mut self) -> Option<RestaurantListState> {
        let live = self.live.as_mut()?;
        if live.changed().await {
            Some(live.current())
        } else {
            None
        }
    }

    pub fn view(&self) -> HomeView {
        build_view(&self.state, &self.restaurants())
    }

    pub fn toggle_edit_mode(&mut self) -> EditMode {
        self.state.toggle_edit_mode()
    }

    /// Row tap: opens the restaurant detail screen.
    pub fn open_restaurant(&self, restaurant_id: &str) -> Result<(), ScreenError> {
        let restaurant = self.find(restaurant_id)?;
        self.navigator.navigate(Route::RestaurantList { restaurant });
        Ok(())
    }

    /// Floating add button.
    pub fn add_restaurant(&self) {
        self.navigator.navigate(Route::AddRestaurant);
    }

    /// Row edit button: opens the modal. Returns `false` outside edit mode.
    pub fn request_edit(&mut self, restaurant_id: &str) -> Result<bool, ScreenError> {
        if !self.state.is_editing() {
            return Ok(false);
        }
        let restaurant = self.find(restaurant_id)?;
        Ok(self.state.open_modal(restaurant))
    }

    /// Runs one modal button; the modal is closed afterwards in every case.
    ///
    /// Returns the delete report for `ModalAction::Delete`.
    pub async fn modal_action(
        &mut self,
        action: ModalAction,
    ) -> Result<Option<DeleteReport>, ScreenError> {
        match self.state.apply_modal_action(action) {
            Some(ModalIntent::Navigate(route)) => {
                self.navigator.navigate(route);
                Ok(None)
            }
            Some(ModalIntent::Delete(restaurant_id)) => {
                let report = self.deleter.delete_restaurant(&restaurant_id).await?;
                Ok(Some(report))
            }
            None => Ok(None),
        }
    }

    fn find(&self, restaurant_id: &str) -> Result<Restaurant, ScreenError> {
        self.live
            .as_ref()
            .and_then(|live| {
                live.current()
                    .restaurants
                    .into_iter()
                    .find(|restaurant| restaurant.id == restaurant_id)
            })
            .ok_or_else(|| ScreenError::RestaurantNotFound(restaurant_id.to_string()))
    }
}
