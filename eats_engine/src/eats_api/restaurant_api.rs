use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{MenuItem, MenuItemUpdate, NewMenuItem, NewRestaurant, Restaurant, RestaurantUpdate},
    restaurant_objects::{RestaurantQuery, RestaurantWithMenu},
    traits::{RestaurantApiError, RestaurantManagement},
};

/// Restaurant and menu management. Administrators manage their own restaurant, everything else is public.
pub struct RestaurantApi<B> {
    db: B,
}

impl<B: Debug> Debug for RestaurantApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RestaurantApi ({:?})", self.db)
    }
}

impl<B> RestaurantApi<B>
where B: RestaurantManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn create_restaurant(
        &self,
        owner_id: i64,
        restaurant: NewRestaurant,
    ) -> Result<Restaurant, RestaurantApiError> {
        validate_restaurant_fields(
            Some(&restaurant.name),
            Some(&restaurant.city),
            Some(&restaurant.country),
            Some(restaurant.delivery_time),
        )?;
        if self.db.fetch_restaurant_for_owner(owner_id).await?.is_some() {
            return Err(RestaurantApiError::RestaurantAlreadyExists(owner_id));
        }
        let restaurant = self.db.create_restaurant(owner_id, restaurant).await?;
        info!("🍽️ Restaurant #{} ({}) created for user #{owner_id}", restaurant.id, restaurant.name);
        Ok(restaurant)
    }

    pub async fn update_my_restaurant(
        &self,
        owner_id: i64,
        update: RestaurantUpdate,
    ) -> Result<Restaurant, RestaurantApiError> {
        let restaurant = self.restaurant_for_owner(owner_id).await?;
        if update.is_empty() {
            return Ok(restaurant);
        }
        validate_restaurant_fields(
            update.name.as_ref(),
            update.city.as_ref(),
            update.country.as_ref(),
            update.delivery_time,
        )?;
        let restaurant = self.db.update_restaurant(restaurant.id, update).await?;
        debug!("🍽️ Restaurant #{} updated", restaurant.id);
        Ok(restaurant)
    }

    /// The caller's own restaurant, with its menu.
    pub async fn my_restaurant(&self, owner_id: i64) -> Result<RestaurantWithMenu, RestaurantApiError> {
        let restaurant = self.restaurant_for_owner(owner_id).await?;
        let menus = self.db.fetch_menu(restaurant.id).await?;
        Ok(RestaurantWithMenu { restaurant, menus })
    }

    pub async fn restaurant_with_menu(&self, id: i64) -> Result<RestaurantWithMenu, RestaurantApiError> {
        let restaurant = self.db.fetch_restaurant(id).await?.ok_or(RestaurantApiError::RestaurantNotFound(id))?;
        let menus = self.db.fetch_menu(restaurant.id).await?;
        Ok(RestaurantWithMenu { restaurant, menus })
    }

    pub async fn search(&self, query: RestaurantQuery) -> Result<Vec<Restaurant>, RestaurantApiError> {
        let result = self.db.search_restaurants(query).await?;
        trace!("🍽️ Restaurant search returned {} results", result.len());
        Ok(result)
    }

    /// Adds an item to the caller's own restaurant menu.
    pub async fn add_menu_item(&self, owner_id: i64, item: NewMenuItem) -> Result<MenuItem, RestaurantApiError> {
        validate_menu_fields(Some(&item.name), Some(item.price.to_minor_units()))?;
        let restaurant = self.restaurant_for_owner(owner_id).await?;
        let item = self.db.add_menu_item(restaurant.id, item).await?;
        info!("🍽️ Menu item #{} ({}, {}) added to restaurant #{}", item.id, item.name, item.price, restaurant.id);
        Ok(item)
    }

    /// Edits an item on the caller's own restaurant menu. Existing orders keep the price they were placed at.
    pub async fn update_menu_item(
        &self,
        owner_id: i64,
        item_id: i64,
        update: MenuItemUpdate,
    ) -> Result<MenuItem, RestaurantApiError> {
        validate_menu_fields(update.name.as_ref(), update.price.map(|p| p.to_minor_units()))?;
        let restaurant = self.restaurant_for_owner(owner_id).await?;
        let item = self.db.fetch_menu_item(item_id).await?.ok_or(RestaurantApiError::MenuItemNotFound(item_id))?;
        if item.restaurant_id != restaurant.id {
            return Err(RestaurantApiError::Forbidden(format!("Menu item {item_id} belongs to another restaurant")));
        }
        if update.is_empty() {
            return Ok(item);
        }
        let item = self.db.update_menu_item(item_id, update).await?;
        debug!("🍽️ Menu item #{item_id} updated");
        Ok(item)
    }

    async fn restaurant_for_owner(&self, owner_id: i64) -> Result<Restaurant, RestaurantApiError> {
        self.db
            .fetch_restaurant_for_owner(owner_id)
            .await?
            .ok_or_else(|| RestaurantApiError::Forbidden(format!("User #{owner_id} does not own a restaurant")))
    }
}

fn validate_restaurant_fields(
    name: Option<&String>,
    city: Option<&String>,
    country: Option<&String>,
    delivery_time: Option<i64>,
) -> Result<(), RestaurantApiError> {
    for (field, value) in [("name", name), ("city", city), ("country", country)] {
        if value.is_some_and(|v| v.trim().is_empty()) {
            return Err(RestaurantApiError::ValidationError(format!("Restaurant {field} cannot be empty")));
        }
    }
    if delivery_time.is_some_and(|t| t <= 0) {
        return Err(RestaurantApiError::ValidationError("Delivery time must be a positive number of minutes".into()));
    }
    Ok(())
}

fn validate_menu_fields(name: Option<&String>, price_minor: Option<i64>) -> Result<(), RestaurantApiError> {
    if name.is_some_and(|n| n.trim().is_empty()) {
        return Err(RestaurantApiError::ValidationError("Menu item name cannot be empty".into()));
    }
    if price_minor.is_some_and(|p| p <= 0) {
        return Err(RestaurantApiError::ValidationError("Menu item price must be positive".into()));
    }
    Ok(())
}
