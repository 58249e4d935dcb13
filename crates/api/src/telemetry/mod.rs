//! Structured logging and optional OpenTelemetry span export.
//!
//! Logs are always emitted as JSON on stdout. When an OTLP endpoint is
//! configured, spans are additionally exported over OTLP/gRPC.
//!
//! Log level is configurable via `LOG_LEVEL` (default: `info`); `RUST_LOG`
//! overrides it when present.

pub mod init;

pub use init::{init_telemetry, shutdown_telemetry};
