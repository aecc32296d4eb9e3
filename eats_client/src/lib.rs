//! EatsOnline client
//!
//! A typed client for the EatsOnline REST API ([`client::EatsClient`]) and the client-side state stores that sit on
//! top of it ([`mod@stores`]): the session, the cart, restaurants and orders. The `eats` binary is a command-line
//! front end for both.
pub mod client;
pub mod config;
pub mod formatting;
pub mod storage;
pub mod stores;
