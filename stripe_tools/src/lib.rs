//! # Stripe tools
//!
//! A thin client for the parts of the Stripe API the EatsOnline server uses:
//!
//! * Creating hosted checkout sessions ([`StripeApi::create_checkout_session`]).
//! * Verifying and decoding webhook events ([`webhook::construct_event`]).
//!
//! Amounts in this crate are always in the currency's *minor* units, as Stripe expects them.
mod api;
mod config;
mod error;

pub mod data_objects;
pub mod helpers;
pub mod webhook;

pub use api::StripeApi;
pub use config::StripeConfig;
pub use data_objects::{CheckoutLineItem, CheckoutSession, EventType, NewCheckoutSession, StripeEvent};
pub use error::{SignatureError, StripeApiError};
