use std::env;

use eats_common::{helpers::parse_list, Secret, DEFAULT_CURRENCY_CODE};
use log::*;

pub const DEFAULT_STRIPE_API_URL: &str = "https://api.stripe.com";
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
pub const DEFAULT_ALLOWED_COUNTRIES: &str = "PK,US,CA,GB";
/// Stripe's own libraries reject events whose timestamp is more than five minutes old.
pub const DEFAULT_WEBHOOK_TOLERANCE_SECS: i64 = 300;

#[derive(Debug, Clone, Default)]
pub struct StripeConfig {
    pub api_url: String,
    pub secret_key: Secret<String>,
    pub webhook_secret: Secret<String>,
    /// Lower-case ISO currency code used for all line items.
    pub currency: String,
    /// Where Stripe sends the customer after a successful payment.
    pub success_url: String,
    /// Where Stripe sends the customer if they abandon the checkout page.
    pub cancel_url: String,
    pub allowed_countries: Vec<String>,
    pub webhook_tolerance_secs: i64,
}

impl StripeConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_url = env::var("EATS_STRIPE_API_URL").unwrap_or_else(|_| DEFAULT_STRIPE_API_URL.to_string());
        let secret_key = Secret::new(env::var("EATS_STRIPE_SECRET_KEY").unwrap_or_else(|_| {
            warn!("💳️ EATS_STRIPE_SECRET_KEY not set. Checkout sessions cannot be created.");
            String::default()
        }));
        let webhook_secret = Secret::new(env::var("EATS_STRIPE_WEBHOOK_SECRET").unwrap_or_else(|_| {
            warn!("💳️ EATS_STRIPE_WEBHOOK_SECRET not set. Every webhook call will fail signature verification.");
            String::default()
        }));
        let currency = env::var("EATS_CURRENCY")
            .map(|s| s.to_lowercase())
            .unwrap_or_else(|_| DEFAULT_CURRENCY_CODE.to_string());
        let frontend_url = env::var("EATS_FRONTEND_URL").unwrap_or_else(|_| {
            warn!("💳️ EATS_FRONTEND_URL not set, using {DEFAULT_FRONTEND_URL}");
            DEFAULT_FRONTEND_URL.to_string()
        });
        let allowed_countries = env::var("EATS_STRIPE_ALLOWED_COUNTRIES")
            .map(|s| parse_list(&s))
            .unwrap_or_else(|_| parse_list(DEFAULT_ALLOWED_COUNTRIES));
        let webhook_tolerance_secs = env::var("EATS_STRIPE_WEBHOOK_TOLERANCE")
            .ok()
            .and_then(|s| {
                s.parse::<i64>()
                    .map_err(|e| warn!("💳️ Invalid value for EATS_STRIPE_WEBHOOK_TOLERANCE. {e}"))
                    .ok()
            })
            .unwrap_or(DEFAULT_WEBHOOK_TOLERANCE_SECS);
        Self::with_frontend_url(&frontend_url, Self {
            api_url,
            secret_key,
            webhook_secret,
            currency,
            allowed_countries,
            webhook_tolerance_secs,
            ..Default::default()
        })
    }

    /// Fills in the success and cancel redirect urls relative to the web client's base url.
    pub fn with_frontend_url(frontend_url: &str, config: Self) -> Self {
        let base = frontend_url.trim_end_matches('/');
        Self { success_url: format!("{base}/order/status"), cancel_url: format!("{base}/cart"), ..config }
    }
}
