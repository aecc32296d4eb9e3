//! Order activity hooks.
//!
//! The order flow publishes an event when a payment is confirmed and whenever an administrator moves an order along
//! the delivery pipeline. The server subscribes to both and writes them to the `eats::orders` log target, which gives
//! operators an audit trail that is independent of the access log.
use eats_engine::events::{EventHandlers, EventHooks, OrderConfirmedEvent, OrderStatusChangedEvent};
use futures::FutureExt;
use log::*;

pub const ORDER_EVENT_BUFFER_SIZE: usize = 25;
const ORDER_LOG_TARGET: &str = "eats::orders";

pub fn create_order_event_handlers() -> EventHandlers {
    let mut hooks = EventHooks::default();
    hooks.on_order_confirmed(|ev: OrderConfirmedEvent| {
        async move {
            let order = ev.order;
            info!(
                target: ORDER_LOG_TARGET,
                "📦️ Order {} from user #{} at restaurant #{} was paid. Total: {}",
                order.order_id,
                order.user_id,
                order.restaurant_id,
                order.total_amount
            );
        }
        .boxed()
    });
    hooks.on_status_changed(|ev: OrderStatusChangedEvent| {
        async move {
            info!(
                target: ORDER_LOG_TARGET,
                "📦️ Order {} moved from {} to {}",
                ev.order.order_id,
                ev.old_status,
                ev.order.status
            );
        }
        .boxed()
    });
    EventHandlers::new(ORDER_EVENT_BUFFER_SIZE, hooks)
}
