//! Client-side state containers.
//!
//! Each store is an explicit object that the caller creates with `load` (hydrating it from its file in the
//! [`StateDir`](crate::storage::StateDir)) and passes to whatever needs it. Every change is written through to disk
//! straight away, so the next run of the client starts where this one left off.
//!
//! Network operations take the [`EatsClient`](crate::client::EatsClient) as an argument. The stores never hold a
//! client themselves.
mod cart;
mod orders;
mod restaurants;
mod session;

pub use cart::{CartItem, CartStore};
pub use orders::OrderStore;
pub use restaurants::RestaurantStore;
pub use session::{SessionState, SessionStore};
