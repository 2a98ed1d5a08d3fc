//! Core logic for the "My Restaurants" home screen.
//! Owns list synchronization, override resolution and the delete use-case;
//! platform UI and stores plug in through traits.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod prefs;
pub mod remote;
pub mod screen;
pub mod service;
pub mod sync;
pub mod ui;

pub use config::{load_config, ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::restaurant::{Restaurant, RestaurantId};
pub use prefs::show_reviews::{show_reviews_key, ShowReviewsOverride};
pub use prefs::{MemoryPreferenceStore, PrefError, PreferenceStore, SqlitePreferenceStore};
pub use remote::{
    CollectionSnapshot, DocumentSnapshot, MemoryRemoteStore, RemoteError, RemoteStore,
    Subscription,
};
pub use screen::{EditMode, HomeScreen, HomeView, ModalAction, ScreenError, ScreenState};
pub use service::delete_service::{DeleteCoordinator, DeleteError, DeleteReport};
pub use service::preference_service::PreferenceService;
pub use sync::live_list::{LiveListSynchronizer, LiveRestaurantList, RestaurantListState};
pub use ui::{LogNavigator, LogNotifier, Navigator, Notifier, Route};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
