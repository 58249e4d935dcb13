//! Common types and protocol definitions shared across the OCSP stapling demo crates.

pub mod protocol;
