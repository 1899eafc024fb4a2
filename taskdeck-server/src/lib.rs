//! `Taskdeck` backend library.
//!
//! Exposes the in-memory persistence backend for use in tests and
//! embedding: an axum JSON API with bearer-token authentication over
//! per-owner task collections.

pub mod auth;
pub mod config;
pub mod server;
pub mod store;
