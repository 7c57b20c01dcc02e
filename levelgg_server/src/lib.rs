//! HTTP surface of the LevelGG tournament platform.
//!
//! [`api::create_router`] wires the library's managers to axum handlers;
//! `main.rs` only reads configuration and serves the router.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
