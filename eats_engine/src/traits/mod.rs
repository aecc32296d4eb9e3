//! # Backend contracts
//!
//! The engine APIs are generic over the traits in this module. [`crate::SqliteDatabase`] implements all the
//! storage traits, and the server provides a Stripe-backed [`CheckoutGateway`].
//!
//! * [`OrderManagement`] stores orders and their line items, and applies status changes.
//! * [`RestaurantManagement`] covers restaurants and their menus.
//! * [`AccountManagement`] covers user accounts and credentials.
//! * [`CheckoutGateway`] creates hosted checkout sessions with a payment provider.
mod account_management;
mod checkout_gateway;
mod order_management;
mod restaurant_management;

pub use account_management::{AccountApiError, AccountManagement};
pub use checkout_gateway::{
    CheckoutGateway,
    CheckoutGatewayError,
    CheckoutRequest,
    CheckoutSessionInfo,
    GatewayLineItem,
};
pub use order_management::{OrderFlowError, OrderManagement};
pub use restaurant_management::{RestaurantApiError, RestaurantManagement};
