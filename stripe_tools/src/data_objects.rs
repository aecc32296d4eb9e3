use std::{collections::BTreeMap, fmt::Display};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::StripeApiError;

pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";

//--------------------------------------   Checkout sessions  ---------------------------------------------------------

/// One entry in a checkout session. `unit_amount` is in minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutLineItem {
    pub currency: String,
    pub name: String,
    pub images: Vec<String>,
    pub unit_amount: i64,
    pub quantity: i64,
}

/// Request body for a new hosted checkout session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCheckoutSession {
    pub line_items: Vec<CheckoutLineItem>,
    pub success_url: String,
    pub cancel_url: String,
    pub allowed_countries: Vec<String>,
    pub metadata: BTreeMap<String, String>,
    pub customer_email: Option<String>,
}

impl NewCheckoutSession {
    pub fn with_metadata<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Encodes the session in the bracketed form notation Stripe's REST API expects.
    pub fn to_form_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("mode".to_string(), "payment".to_string()),
            ("payment_method_types[0]".to_string(), "card".to_string()),
            ("success_url".to_string(), self.success_url.clone()),
            ("cancel_url".to_string(), self.cancel_url.clone()),
        ];
        for (i, country) in self.allowed_countries.iter().enumerate() {
            params.push((format!("shipping_address_collection[allowed_countries][{i}]"), country.clone()));
        }
        for (i, item) in self.line_items.iter().enumerate() {
            let prefix = format!("line_items[{i}]");
            params.push((format!("{prefix}[price_data][currency]"), item.currency.clone()));
            params.push((format!("{prefix}[price_data][product_data][name]"), item.name.clone()));
            for (j, image) in item.images.iter().enumerate() {
                params.push((format!("{prefix}[price_data][product_data][images][{j}]"), image.clone()));
            }
            params.push((format!("{prefix}[price_data][unit_amount]"), item.unit_amount.to_string()));
            params.push((format!("{prefix}[quantity]"), item.quantity.to_string()));
        }
        for (key, value) in &self.metadata {
            params.push((format!("metadata[{key}]"), value.clone()));
        }
        if let Some(email) = &self.customer_email {
            params.push(("customer_email".to_string(), email.clone()));
        }
        params
    }
}

/// The subset of Stripe's checkout session object that we care about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    /// Total charged, in minor units. Null until the customer has completed the form.
    #[serde(default)]
    pub amount_total: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl CheckoutSession {
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}

//--------------------------------------       Events         ---------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventType {
    CheckoutSessionCompleted,
    Other(String),
}

impl From<&str> for EventType {
    fn from(value: &str) -> Self {
        match value {
            CHECKOUT_SESSION_COMPLETED => Self::CheckoutSessionCompleted,
            s => Self::Other(s.to_string()),
        }
    }
}

impl Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CheckoutSessionCompleted => write!(f, "{CHECKOUT_SESSION_COMPLETED}"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventData {
    pub object: Value,
}

/// A webhook event. The `data.object` payload depends on the event type, so it is kept as raw JSON until the
/// caller asks for a specific shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub livemode: bool,
    pub data: EventData,
}

impl StripeEvent {
    pub fn kind(&self) -> EventType {
        EventType::from(self.event_type.as_str())
    }

    pub fn checkout_session(&self) -> Result<CheckoutSession, StripeApiError> {
        serde_json::from_value(self.data.object.clone())
            .map_err(|e| StripeApiError::UnexpectedEventObject(format!("{} is not a checkout session. {e}", self.id)))
    }
}
