use std::{collections::HashMap, fmt::Debug};

use eats_common::Pkr;
use log::*;

use crate::{
    db_types::{NewOrder, Order, OrderDetails, OrderId, OrderItem, OrderStatusType},
    events::{EventProducers, OrderConfirmedEvent, OrderStatusChangedEvent},
    order_objects::{CheckoutOrder, CheckoutResult, OrderQueryFilter},
    sales_report::{ReportPeriod, SalesSummary},
    traits::{CheckoutGateway, CheckoutRequest, GatewayLineItem, OrderFlowError, OrderManagement, RestaurantManagement},
};

/// `OrderFlowApi` is the primary API for the order lifecycle: checkout, payment confirmation, and the delivery
/// pipeline that restaurant administrators drive.
///
/// ```text
/// pending --(payment confirmed)--> confirmed --(admin)--> preparing --> outfordelivery --> delivered
/// ```
pub struct OrderFlowApi<B, G> {
    db: B,
    gateway: G,
    producers: EventProducers,
}

impl<B, G> Debug for OrderFlowApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B, G> OrderFlowApi<B, G> {
    pub fn new(db: B, gateway: G, producers: EventProducers) -> Self {
        Self { db, gateway, producers }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B, G> OrderFlowApi<B, G>
where
    B: OrderManagement + RestaurantManagement,
    G: CheckoutGateway,
{
    /// Creates a hosted checkout session for the cart, and saves a matching pending order.
    ///
    /// Every cart line is resolved against the restaurant's *current* menu, and the names, images and prices sent to
    /// the payment provider come from the menu, never from the client. If any line refers to an item that is not on
    /// the menu, the whole checkout fails before the payment provider is contacted.
    ///
    /// The order is only saved once the provider has accepted the session, so a gateway failure leaves nothing
    /// behind.
    pub async fn create_checkout_session(
        &self,
        user_id: i64,
        customer_email: Option<String>,
        checkout: CheckoutOrder,
    ) -> Result<CheckoutResult, OrderFlowError> {
        checkout.validate()?;
        let restaurant_id = checkout.restaurant_id;
        let restaurant =
            self.db.fetch_restaurant(restaurant_id).await?.ok_or(OrderFlowError::RestaurantNotFound(restaurant_id))?;
        let menu = self.db.fetch_menu(restaurant.id).await?;
        let menu_by_id = menu.iter().map(|m| (m.id, m)).collect::<HashMap<_, _>>();
        let items = checkout
            .cart_items
            .iter()
            .map(|line| {
                let item = menu_by_id
                    .get(&line.menu_id)
                    .ok_or_else(|| OrderFlowError::ValidationError(format!("menu item {} not found", line.menu_id)))?;
                Ok(OrderItem {
                    menu_id: item.id,
                    name: item.name.clone(),
                    image: item.image.clone(),
                    price: item.price,
                    quantity: line.quantity,
                })
            })
            .collect::<Result<Vec<OrderItem>, OrderFlowError>>()?;
        let new_order = NewOrder::new(user_id, restaurant.id, checkout.delivery_details, items);
        let request = CheckoutRequest {
            order_id: new_order.order_id.clone(),
            line_items: new_order.items.iter().map(line_item_for).collect(),
            images: menu.iter().map(|m| m.image.clone()).collect(),
            customer_email,
        };
        trace!("🔄️🛒️ Requesting checkout session for order {} ({})", new_order.order_id, new_order.items_total());
        let session = self.gateway.create_checkout_session(request).await.map_err(|e| {
            warn!("🔄️🛒️ Checkout session for order {} was not created. {e}", new_order.order_id);
            e
        })?;
        let order = self.db.insert_order(new_order).await?;
        info!("🔄️🛒️ Order {} is pending payment with checkout session {}", order.order_id, session.id);
        Ok(CheckoutResult { order, session })
    }

    /// Applies a payment completion event to the order.
    ///
    /// `amount_total` is the amount the provider charged, in minor units. When it is present it replaces the order
    /// total, and a pending order becomes `confirmed`. Orders are never created here, so an unknown order id is an
    /// error. Re-delivery of the same event re-applies the same values.
    pub async fn confirm_payment(
        &self,
        order_id: &OrderId,
        amount_total: Option<i64>,
    ) -> Result<Order, OrderFlowError> {
        trace!("🔄️✅️ Payment for order {order_id} is being confirmed");
        let existing = self.existing_order(order_id).await?;
        if existing.status != OrderStatusType::Pending && existing.status != OrderStatusType::Confirmed {
            // Late re-delivery after the kitchen has started. Record the amount, but keep the pipeline status.
            warn!(
                "🔄️✅️ Payment confirmation received for order {order_id}, which is already {}. Status is unchanged.",
                existing.status
            );
        }
        let total = amount_total.map(Pkr::from_minor_units);
        let order = self.db.confirm_order(order_id, total).await?;
        info!("🔄️✅️ Order {order_id} confirmed. Total charged: {}", order.total_amount);
        self.call_order_confirmed_hook(&order).await;
        Ok(order)
    }

    async fn call_order_confirmed_hook(&self, order: &Order) {
        for emitter in &self.producers.order_confirmed_producer {
            debug!("🔄️✅️ Notifying order confirmed hook subscribers");
            emitter.publish_event(OrderConfirmedEvent::new(order.clone())).await;
        }
    }

    /// Moves an order along the delivery pipeline. Only the owner of the restaurant the order was placed with may do
    /// this. The order total is never modified.
    ///
    /// | From \ To      | pending | confirmed | preparing | outfordelivery | delivered |
    /// |----------------|---------|-----------|-----------|----------------|-----------|
    /// | pending        | Err     | Err       | Err       | Err            | Err       |
    /// | confirmed      | Err     | Err       | Ok        | Ok             | Ok        |
    /// | preparing      | Err     | Err       | Err       | Ok             | Ok        |
    /// | outfordelivery | Err     | Err       | Ok        | Err            | Ok        |
    /// | delivered      | Err     | Err       | Ok        | Ok             | Err       |
    pub async fn modify_status_for_order(
        &self,
        owner_id: i64,
        order_id: &OrderId,
        new_status: OrderStatusType,
    ) -> Result<Order, OrderFlowError> {
        let order = self.existing_order(order_id).await?;
        let restaurant = self.db.fetch_restaurant_for_owner(owner_id).await?;
        if restaurant.map(|r| r.id) != Some(order.restaurant_id) {
            return Err(OrderFlowError::Forbidden(format!("Order {order_id} was not placed with your restaurant")));
        }
        let old_status = order.status;
        if !old_status.admin_can_transition_to(new_status) {
            return Err(OrderFlowError::ForbiddenStatusChange { from: old_status, to: new_status });
        }
        let order = self.db.update_order_status(order_id, new_status).await?;
        info!("🔄️🚚️ Order {order_id} moved from {old_status} to {new_status}");
        for emitter in &self.producers.status_changed_producer {
            emitter.publish_event(OrderStatusChangedEvent::new(old_status, order.clone())).await;
        }
        Ok(order)
    }

    /// Orders placed by the user, oldest first.
    pub async fn orders_for_user(&self, user_id: i64) -> Result<Vec<OrderDetails>, OrderFlowError> {
        let orders = self.db.fetch_order_details_for_user(user_id).await?;
        trace!("🔄️📦️ Fetched {} orders for user #{user_id}", orders.len());
        Ok(orders)
    }

    /// Orders placed against the restaurant owned by `owner_id`, oldest first.
    pub async fn orders_for_restaurant_owner(&self, owner_id: i64) -> Result<Vec<OrderDetails>, OrderFlowError> {
        let restaurant = self.db.fetch_restaurant_for_owner(owner_id).await?.ok_or_else(|| {
            OrderFlowError::Forbidden(format!("User #{owner_id} does not own a restaurant"))
        })?;
        let orders = self.db.fetch_order_details_for_restaurant(restaurant.id).await?;
        trace!("🔄️📦️ Fetched {} orders for restaurant #{}", orders.len(), restaurant.id);
        Ok(orders)
    }

    pub async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, OrderFlowError> {
        self.db.fetch_order_by_order_id(order_id).await
    }

    async fn existing_order(&self, order_id: &OrderId) -> Result<Order, OrderFlowError> {
        self.db.fetch_order_by_order_id(order_id).await?.ok_or_else(|| OrderFlowError::OrderNotFound(order_id.clone()))
    }

    /// The sales summary over every confirmed order.
    pub async fn sales_summary(&self, period: ReportPeriod) -> Result<SalesSummary, OrderFlowError> {
        let query = OrderQueryFilter::default().with_status(OrderStatusType::Confirmed);
        let orders = self.db.search_orders(query).await?;
        debug!("🔄️📊️ Building {period} sales summary over {} confirmed orders", orders.len());
        Ok(SalesSummary::from_orders(&orders, period))
    }
}

fn line_item_for(item: &OrderItem) -> GatewayLineItem {
    GatewayLineItem {
        name: item.name.clone(),
        image: item.image.clone(),
        unit_amount: item.price.to_minor_units(),
        quantity: item.quantity,
    }
}
