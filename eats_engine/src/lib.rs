//! EatsOnline Engine
//!
//! The engine holds the business logic of the EatsOnline food ordering service: restaurants and their menus, user
//! accounts, checkout, payment confirmation, the delivery pipeline and sales reporting. It knows nothing about HTTP or
//! about any particular payment provider.
//!
//! The library is divided into three main sections:
//! 1. Storage contracts ([`mod@traits`]) and the SQLite backend that implements them ([`SqliteDatabase`]). The data
//!    types that cross the storage boundary are defined in [`mod@db_types`] and are public.
//! 2. The engine public API ([`OrderFlowApi`], [`RestaurantApi`], [`AuthApi`] and [`AccountApi`]). Each API is generic
//!    over the traits it needs, so any backend (or a mock) can stand in for the database.
//! 3. Events ([`mod@events`]). An `OrderConfirmedEvent` is emitted when payment for an order is confirmed, and an
//!    `OrderStatusChangedEvent` whenever a restaurant moves an order along the pipeline.
pub mod db_types;
pub mod events;
pub mod traits;

mod eats_api;

#[cfg(feature = "sqlite")]
mod sqlite;

pub use eats_api::{
    accounts_api::AccountApi,
    auth_api::{AuthApi, AuthApiError, SignupRequest, MIN_PASSWORD_LENGTH},
    order_flow_api::OrderFlowApi,
    order_objects,
    restaurant_api::RestaurantApi,
    restaurant_objects,
    sales_report,
};
#[cfg(feature = "sqlite")]
pub use sqlite::{db, SqliteDatabase};
