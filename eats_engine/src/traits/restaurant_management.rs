use thiserror::Error;

use crate::{
    db_types::{MenuItem, MenuItemUpdate, NewMenuItem, NewRestaurant, Restaurant, RestaurantUpdate},
    restaurant_objects::RestaurantQuery,
};

#[derive(Debug, Clone, Error)]
pub enum RestaurantApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Restaurant {0} does not exist")]
    RestaurantNotFound(i64),
    #[error("Menu item {0} does not exist")]
    MenuItemNotFound(i64),
    #[error("User {0} already owns a restaurant")]
    RestaurantAlreadyExists(i64),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    ValidationError(String),
}

impl From<sqlx::Error> for RestaurantApiError {
    fn from(e: sqlx::Error) -> Self {
        RestaurantApiError::DatabaseError(e.to_string())
    }
}

/// Restaurants and their menus. Each owner has at most one restaurant.
#[allow(async_fn_in_trait)]
pub trait RestaurantManagement {
    async fn create_restaurant(&self, owner_id: i64, restaurant: NewRestaurant)
        -> Result<Restaurant, RestaurantApiError>;

    async fn update_restaurant(&self, id: i64, update: RestaurantUpdate) -> Result<Restaurant, RestaurantApiError>;

    async fn fetch_restaurant(&self, id: i64) -> Result<Option<Restaurant>, RestaurantApiError>;

    async fn fetch_restaurant_for_owner(&self, owner_id: i64) -> Result<Option<Restaurant>, RestaurantApiError>;

    async fn search_restaurants(&self, query: RestaurantQuery) -> Result<Vec<Restaurant>, RestaurantApiError>;

    /// The current menu for the restaurant, in the order the items were added.
    async fn fetch_menu(&self, restaurant_id: i64) -> Result<Vec<MenuItem>, RestaurantApiError>;

    async fn fetch_menu_item(&self, id: i64) -> Result<Option<MenuItem>, RestaurantApiError>;

    async fn add_menu_item(&self, restaurant_id: i64, item: NewMenuItem) -> Result<MenuItem, RestaurantApiError>;

    async fn update_menu_item(&self, id: i64, update: MenuItemUpdate) -> Result<MenuItem, RestaurantApiError>;
}
