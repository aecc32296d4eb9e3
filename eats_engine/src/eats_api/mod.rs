//! # EatsOnline engine public API
//!
//! Each API is created by handing it a backend that implements the traits it needs. They can all share a single
//! [`crate::SqliteDatabase`], since it implements every storage trait and is cheap to clone.
//!
//! * [`order_flow_api`] handles checkout, payment confirmation, the delivery pipeline and sales reports.
//! * [`restaurant_api`] manages restaurants and menus.
//! * [`auth_api`] handles signup and login.
//! * [`accounts_api`] reads and updates user profiles.
//!
//! ```rust,ignore
//! let db = SqliteDatabase::new_with_url("sqlite://data/eats.db", 25).await?;
//! let api = RestaurantApi::new(db.clone());
//! let restaurant = api.restaurant_with_menu(1).await?;
//! ```
pub mod accounts_api;
pub mod auth_api;
pub mod order_flow_api;
pub mod order_objects;
pub mod restaurant_api;
pub mod restaurant_objects;
pub mod sales_report;
