use anyhow::{anyhow, Result};
use eats_engine::{
    db_types::{MenuItem, OrderDetails, OrderId, OrderStatusType, Restaurant},
    restaurant_objects::RestaurantWithMenu,
};
use log::*;
use serde::{Deserialize, Serialize};

use crate::{client::EatsClient, storage::StateDir};

const RESTAURANT_STATE: &str = "restaurants";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestaurantState {
    search_results: Vec<Restaurant>,
    selected: Option<RestaurantWithMenu>,
    /// Administrators only
    my_restaurant: Option<RestaurantWithMenu>,
    /// Orders placed with `my_restaurant`
    restaurant_orders: Vec<OrderDetails>,
}

/// A cache of restaurant data: the last search, the restaurant the customer is ordering from and, for
/// administrators, their own restaurant and its orders.
pub struct RestaurantStore {
    dir: StateDir,
    state: RestaurantState,
}

impl RestaurantStore {
    pub fn load(dir: StateDir) -> Result<Self> {
        let state = dir.load(RESTAURANT_STATE)?;
        Ok(Self { dir, state })
    }

    pub fn search_results(&self) -> &[Restaurant] {
        &self.state.search_results
    }

    pub fn selected(&self) -> Option<&RestaurantWithMenu> {
        self.state.selected.as_ref()
    }

    pub fn my_restaurant(&self) -> Option<&RestaurantWithMenu> {
        self.state.my_restaurant.as_ref()
    }

    pub fn restaurant_orders(&self) -> &[OrderDetails] {
        &self.state.restaurant_orders
    }

    /// Looks the item up on the selected restaurant's menu.
    pub fn menu_item(&self, menu_id: i64) -> Result<&MenuItem> {
        let restaurant = self.selected().ok_or_else(|| anyhow!("Select a restaurant first"))?;
        restaurant.menus.iter().find(|m| m.id == menu_id).ok_or_else(|| {
            anyhow!("Menu item #{menu_id} is not on the menu of {}", restaurant.restaurant.name)
        })
    }

    pub async fn search(&mut self, client: &EatsClient, text: Option<&str>, cuisines: &[String]) -> Result<&[Restaurant]> {
        let results = client.search_restaurants(text, cuisines).await?;
        debug!("Restaurant search found {} restaurants", results.len());
        self.state.search_results = results;
        self.save()?;
        Ok(self.search_results())
    }

    pub async fn select(&mut self, client: &EatsClient, id: i64) -> Result<&RestaurantWithMenu> {
        let restaurant = client.restaurant(id).await?;
        self.state.selected = Some(restaurant);
        self.dir.save(RESTAURANT_STATE, &self.state)?;
        Ok(self.state.selected.as_ref().expect("just inserted"))
    }

    pub async fn fetch_my_restaurant(&mut self, client: &EatsClient) -> Result<&RestaurantWithMenu> {
        let restaurant = client.my_restaurant().await?;
        self.state.my_restaurant = Some(restaurant);
        self.dir.save(RESTAURANT_STATE, &self.state)?;
        Ok(self.state.my_restaurant.as_ref().expect("just inserted"))
    }

    pub async fn fetch_restaurant_orders(&mut self, client: &EatsClient) -> Result<&[OrderDetails]> {
        self.state.restaurant_orders = client.restaurant_orders().await?;
        self.save()?;
        Ok(self.restaurant_orders())
    }

    pub async fn update_order_status(
        &mut self,
        client: &EatsClient,
        order_id: &OrderId,
        status: OrderStatusType,
    ) -> Result<OrderStatusType> {
        let status = client.update_order_status(order_id, status).await?;
        self.apply_status(order_id, status)?;
        Ok(status)
    }

    /// Updates the cached copy of an order after the server accepted a status change.
    fn apply_status(&mut self, order_id: &OrderId, status: OrderStatusType) -> Result<()> {
        if let Some(details) = self.state.restaurant_orders.iter_mut().find(|o| &o.order.order_id == order_id) {
            details.order.status = status;
        }
        self.save()
    }

    fn save(&self) -> Result<()> {
        self.dir.save(RESTAURANT_STATE, &self.state)
    }
}
