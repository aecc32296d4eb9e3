//! # EatsOnline server
//! This crate hosts the REST API for EatsOnline. It is responsible for:
//! * Signing users up and logging them in, with JWT access tokens.
//! * Restaurant and menu management for restaurant administrators.
//! * Creating Stripe checkout sessions for customers' carts.
//! * Receiving Stripe's payment webhook and confirming the matching order.
//! * Sales reports.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! Apart from `/health`, every route lives under `/api/v1`. See [routes](routes/index.html) and
//! [stripe_routes](stripe_routes/index.html).
pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod stripe_routes;

#[cfg(test)]
mod endpoint_tests;
