use crate::model::restaurant::Restaurant;
use log::info;

/// Screens the home screen can navigate to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Detail screen for one restaurant.
    RestaurantList { restaurant: Restaurant },
    /// Creation form; takes no parameters.
    AddRestaurant,
    /// Edit form for one restaurant.
    EditRestaurant { restaurant: Restaurant },
}

impl Route {
    /// Screen name registered with the platform navigator.
    pub fn screen_name(&self) -> &'static str {
        match self {
            Self::RestaurantList { .. } => "RestaurantList",
            Self::AddRestaurant => "AddRestaurant",
            Self::EditRestaurant { .. } => "EditRestaurant",
        }
    }

    /// Record passed as the navigation parameter, if any.
    pub fn restaurant(&self) -> Option<&Restaurant> {
        match self {
            Self::RestaurantList { restaurant } | Self::EditRestaurant { restaurant } => {
                Some(restaurant)
            }
            Self::AddRestaurant => None,
        }
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that only records the intent in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, route: Route) {
        info!(
            "event=navigate module=ui status=ok screen={} restaurant_id={}",
            route.screen_name(),
            route.restaurant().map_or("-", |restaurant| restaurant.id.as_str())
        );
    }
}
