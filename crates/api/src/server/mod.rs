//! Axum HTTP(S) server, routing, and middleware.
//!
//! # Responsibilities
//! - Define the Axum router with all routes and shared middleware.
//! - Bind the listener and serve plain HTTP, or HTTPS when TLS material is configured.
//! - Stop accepting and drain connections on SIGINT/SIGTERM.

pub mod handlers;
pub mod listener;
pub mod middleware;
pub mod openapi;
pub mod router;
pub mod shutdown;
pub mod tls;
