//! Stripe-backed [`CheckoutGateway`].
use eats_engine::traits::{CheckoutGateway, CheckoutGatewayError, CheckoutRequest, CheckoutSessionInfo};
use log::*;
use stripe_tools::{CheckoutLineItem, NewCheckoutSession, StripeApi, StripeApiError, StripeConfig};

use crate::stripe_routes::ORDER_ID_METADATA_KEY;

pub const IMAGES_METADATA_KEY: &str = "images";
/// Stripe rejects metadata values longer than this.
pub const MAX_METADATA_VALUE_LENGTH: usize = 500;

#[derive(Clone)]
pub struct StripeGateway {
    api: StripeApi,
}

impl StripeGateway {
    pub fn new(config: StripeConfig) -> Result<Self, StripeApiError> {
        let api = StripeApi::new(config)?;
        Ok(Self { api })
    }
}

impl CheckoutGateway for StripeGateway {
    async fn create_checkout_session(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSessionInfo, CheckoutGatewayError> {
        let session = new_checkout_session(&request, self.api.config())?;
        let result = self.api.create_checkout_session(&session).await.map_err(|e| {
            error!("💳️ Stripe did not create a checkout session for order {}. {e}", request.order_id);
            CheckoutGatewayError(e.to_string())
        })?;
        Ok(CheckoutSessionInfo { id: result.id, url: result.url })
    }
}

/// Builds the Stripe session for a checkout. Prices are in minor units already, and are sent as-is. The order id and
/// the restaurant's menu images travel in the session metadata.
pub fn new_checkout_session(
    request: &CheckoutRequest,
    config: &StripeConfig,
) -> Result<NewCheckoutSession, CheckoutGatewayError> {
    let line_items = request
        .line_items
        .iter()
        .map(|item| CheckoutLineItem {
            currency: config.currency.clone(),
            name: item.name.clone(),
            images: if item.image.is_empty() { vec![] } else { vec![item.image.clone()] },
            unit_amount: item.unit_amount,
            quantity: item.quantity,
        })
        .collect();
    let images = images_metadata(&request.images)?;
    let session = NewCheckoutSession {
        line_items,
        success_url: config.success_url.clone(),
        cancel_url: config.cancel_url.clone(),
        allowed_countries: config.allowed_countries.clone(),
        customer_email: request.customer_email.clone(),
        ..Default::default()
    }
    .with_metadata(ORDER_ID_METADATA_KEY, request.order_id.as_str())
    .with_metadata(IMAGES_METADATA_KEY, images);
    Ok(session)
}

/// The image references as a JSON array, keeping as many leading entries as fit in one metadata value.
fn images_metadata(images: &[String]) -> Result<String, CheckoutGatewayError> {
    let mut count = images.len();
    loop {
        let value = serde_json::to_string(&images[..count]).map_err(|e| CheckoutGatewayError(e.to_string()))?;
        if value.len() <= MAX_METADATA_VALUE_LENGTH {
            if count < images.len() {
                debug!("💳️ Only {count} of {} menu images fit in the checkout session metadata", images.len());
            }
            return Ok(value);
        }
        count -= 1;
    }
}
