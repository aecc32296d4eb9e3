//----------------------------------------------   Stripe webhook  ----------------------------------------------------
//! Stripe calls the webhook once a customer completes (or abandons) a hosted checkout.
//!
//! The raw body is verified against the `Stripe-Signature` header before anything else happens. Stripe retries any
//! delivery that does not get a 2xx response, so only failures that a retry could fix return 5xx.
use std::str::FromStr;

use actix_web::{web, HttpRequest, HttpResponse};
use eats_engine::{
    db_types::OrderId,
    traits::{CheckoutGateway, OrderFlowError, OrderManagement, RestaurantManagement},
    OrderFlowApi,
};
use log::*;
use serde_json::json;
use stripe_tools::{data_objects::EventType, webhook::construct_event, StripeConfig};

use crate::route;

pub const STRIPE_SIGNATURE_HEADER: &str = "Stripe-Signature";
pub const ORDER_ID_METADATA_KEY: &str = "orderId";

route!(stripe_webhook => Post "/order/webhook" impl <B: OrderManagement + RestaurantManagement, G: CheckoutGateway>);
pub async fn stripe_webhook<B, G>(
    req: HttpRequest,
    body: web::Bytes,
    config: web::Data<StripeConfig>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> HttpResponse
where
    B: OrderManagement + RestaurantManagement,
    G: CheckoutGateway,
{
    trace!("💳️ Received webhook request: {}", req.uri());
    let Some(signature) = req.headers().get(STRIPE_SIGNATURE_HEADER).and_then(|v| v.to_str().ok()) else {
        warn!("💳️ Webhook call without a signature was rejected");
        return HttpResponse::BadRequest().body("Missing Stripe signature");
    };
    let event = match construct_event(
        &body,
        signature,
        config.webhook_secret.reveal(),
        config.webhook_tolerance_secs,
    ) {
        Ok(event) => event,
        Err(e) => {
            warn!("💳️ Webhook call was rejected. {e}");
            return HttpResponse::BadRequest().body(format!("Webhook Error: {e}"));
        },
    };
    match event.kind() {
        EventType::CheckoutSessionCompleted => {
            let session = match event.checkout_session() {
                Ok(s) => s,
                Err(e) => {
                    warn!("💳️ {e}");
                    return HttpResponse::BadRequest().body(format!("Webhook Error: {e}"));
                },
            };
            let Some(order_id) = session.metadata_value(ORDER_ID_METADATA_KEY).and_then(|s| OrderId::from_str(s).ok())
            else {
                warn!("💳️ Checkout session {} has no order id in its metadata", session.id);
                return HttpResponse::BadRequest().body("Order ID missing");
            };
            match api.confirm_payment(&order_id, session.amount_total).await {
                Ok(order) => {
                    info!("💳️ Checkout session {} confirmed order {}", session.id, order.order_id);
                    HttpResponse::Ok().finish()
                },
                Err(OrderFlowError::OrderNotFound(id)) => {
                    warn!("💳️ Checkout session {} refers to order {id}, which does not exist", session.id);
                    HttpResponse::NotFound().json(json!({ "message": "Order not found" }))
                },
                Err(e) => {
                    error!("💳️ Could not confirm order {order_id} for checkout session {}. {e}", session.id);
                    HttpResponse::InternalServerError().json(json!({ "message": "Internal Server Error" }))
                },
            }
        },
        EventType::Other(kind) => {
            debug!("💳️ Ignoring {kind} event {}", event.id);
            HttpResponse::Ok().finish()
        },
    }
}
