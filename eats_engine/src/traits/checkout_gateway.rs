use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db_types::OrderId;

#[derive(Debug, Clone, Error)]
#[error("Payment gateway error: {0}")]
pub struct CheckoutGatewayError(pub String);

/// One line of a hosted checkout session. The unit amount is in minor units (paisa).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayLineItem {
    pub name: String,
    pub image: String,
    pub unit_amount: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    /// Embedded in the session metadata so that the completion event can be matched to the order.
    pub order_id: OrderId,
    pub line_items: Vec<GatewayLineItem>,
    /// Image references for every item on the restaurant's menu. Kept in the session metadata for receipts.
    pub images: Vec<String>,
    pub customer_email: Option<String>,
}

/// What the caller needs to send the customer to the hosted payment page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSessionInfo {
    pub id: String,
    pub url: Option<String>,
}

/// A payment provider that offers hosted checkout pages.
#[allow(async_fn_in_trait)]
pub trait CheckoutGateway {
    async fn create_checkout_session(&self, request: CheckoutRequest)
        -> Result<CheckoutSessionInfo, CheckoutGatewayError>;
}
