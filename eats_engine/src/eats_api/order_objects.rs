use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    db_types::{DeliveryDetails, Order, OrderId, OrderStatusType},
    traits::{CheckoutSessionInfo, OrderFlowError},
};

/// Maximum number of units of a single item in one checkout.
pub const MAX_QUANTITY: i64 = 1000;

//--------------------------------------   OrderQueryFilter    ---------------------------------------------------------
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderQueryFilter {
    pub order_id: Option<OrderId>,
    pub user_id: Option<i64>,
    pub restaurant_id: Option<i64>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub status: Option<Vec<OrderStatusType>>,
}

impl OrderQueryFilter {
    pub fn with_order_id(mut self, order_id: OrderId) -> Self {
        self.order_id = Some(order_id);
        self
    }

    pub fn with_user_id(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_restaurant_id(mut self, restaurant_id: i64) -> Self {
        self.restaurant_id = Some(restaurant_id);
        self
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    pub fn with_status(mut self, status: OrderStatusType) -> Self {
        self.status.get_or_insert_with(Vec::new).push(status);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.order_id.is_none() &&
            self.user_id.is_none() &&
            self.restaurant_id.is_none() &&
            self.status.is_none() &&
            self.since.is_none() &&
            self.until.is_none()
    }
}

impl Display for OrderQueryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "No filters.")?;
            return Ok(());
        }
        if let Some(order_id) = &self.order_id {
            write!(f, "order_id: {order_id}. ")?;
        }
        if let Some(user_id) = &self.user_id {
            write!(f, "user_id: {user_id}. ")?;
        }
        if let Some(restaurant_id) = &self.restaurant_id {
            write!(f, "restaurant_id: {restaurant_id}. ")?;
        }
        if let Some(since) = &self.since {
            write!(f, "since {since}. ")?;
        }
        if let Some(until) = &self.until {
            write!(f, "until {until}. ")?;
        }
        if let Some(statuses) = &self.status {
            let statuses = statuses.iter().map(|s| s.to_string()).collect::<Vec<String>>().join(",");
            write!(f, "statuses: [{statuses}]. ")?;
        }
        Ok(())
    }
}

//--------------------------------------      Checkout         ---------------------------------------------------------
/// A line in the customer's cart. Only the menu item id and quantity are trusted. Names, images and prices are always
/// taken from the restaurant's current menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub menu_id: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutOrder {
    pub restaurant_id: i64,
    pub cart_items: Vec<CartLine>,
    pub delivery_details: DeliveryDetails,
}

impl CheckoutOrder {
    /// Checks the parts of a checkout request that don't need the database.
    pub fn validate(&self) -> Result<(), OrderFlowError> {
        if self.cart_items.is_empty() {
            return Err(OrderFlowError::ValidationError("The cart is empty".into()));
        }
        if let Some(line) = self.cart_items.iter().find(|l| l.quantity < 1 || l.quantity > MAX_QUANTITY) {
            return Err(OrderFlowError::ValidationError(format!(
                "Invalid quantity {} for menu item {}. Quantities must be between 1 and {MAX_QUANTITY}",
                line.quantity, line.menu_id
            )));
        }
        if let Some(field) = self.delivery_details.missing_field() {
            return Err(OrderFlowError::ValidationError(format!("Delivery {field} is required")));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutResult {
    /// The pending order that was saved.
    pub order: Order,
    pub session: CheckoutSessionInfo,
}
