//! `ocsp-demo-api` — the JSON backend behind the OCSP stapling demo.
//!
//! Exposes two routes, `GET /` and `GET /hello`, plus an OpenAPI document.
//! The binary in `main.rs` wires configuration, telemetry, and the listener
//! together; everything it uses lives here so integration tests can build
//! the same [`Router`](axum::Router).

pub mod config;
pub mod server;
pub mod telemetry;
