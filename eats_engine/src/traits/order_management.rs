use eats_common::Pkr;
use thiserror::Error;

use crate::{
    db_types::{NewOrder, Order, OrderDetails, OrderId, OrderStatusType},
    order_objects::OrderQueryFilter,
    traits::{CheckoutGatewayError, RestaurantApiError},
};

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("We have an internal database engine (configuration/uptime etc.) : {0}")]
    DatabaseError(String),
    #[error("Restaurant {0} does not exist")]
    RestaurantNotFound(i64),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("Cannot insert order, since it already exists with id {0}")]
    OrderAlreadyExists(OrderId),
    #[error("{0}")]
    ValidationError(String),
    #[error("Could not create a checkout session. {0}")]
    GatewayError(#[from] CheckoutGatewayError),
    #[error("Cannot change order status from {from} to {to}")]
    ForbiddenStatusChange { from: OrderStatusType, to: OrderStatusType },
    #[error("{0}")]
    Forbidden(String),
}

impl From<sqlx::Error> for OrderFlowError {
    fn from(e: sqlx::Error) -> Self {
        OrderFlowError::DatabaseError(e.to_string())
    }
}

impl From<RestaurantApiError> for OrderFlowError {
    fn from(e: RestaurantApiError) -> Self {
        match e {
            RestaurantApiError::RestaurantNotFound(id) => OrderFlowError::RestaurantNotFound(id),
            RestaurantApiError::Forbidden(s) => OrderFlowError::Forbidden(s),
            RestaurantApiError::ValidationError(s) => OrderFlowError::ValidationError(s),
            e => OrderFlowError::DatabaseError(e.to_string()),
        }
    }
}

/// Storage for orders and their line items.
///
/// Orders are never deleted. Once inserted, only the status and total amount may change.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Saves a new pending order with a zero total, along with its line items, in a single transaction.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderFlowError>;

    /// Fetches the order (with line items) for the given public order id.
    async fn fetch_order_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderFlowError>;

    /// All orders placed by the user, oldest first, with the restaurant and user names attached.
    async fn fetch_order_details_for_user(&self, user_id: i64) -> Result<Vec<OrderDetails>, OrderFlowError>;

    /// All orders placed against the restaurant, oldest first, with the restaurant and user names attached.
    async fn fetch_order_details_for_restaurant(&self, restaurant_id: i64)
        -> Result<Vec<OrderDetails>, OrderFlowError>;

    /// Orders (with line items) matching the filter, in ascending `created_at` order.
    async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, OrderFlowError>;

    /// Overwrites the total amount (if given) and marks a pending order as confirmed. Orders that have already moved
    /// further down the delivery pipeline keep their status. Applying the same values twice has the same result as
    /// applying them once.
    async fn confirm_order(&self, order_id: &OrderId, total: Option<Pkr>) -> Result<Order, OrderFlowError>;

    /// Sets the order status. The total amount is never touched.
    async fn update_order_status(&self, order_id: &OrderId, status: OrderStatusType)
        -> Result<Order, OrderFlowError>;
}
