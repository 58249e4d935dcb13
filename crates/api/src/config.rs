//! Configuration loading and validation for the API service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any variable is present but invalid.

use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    time::Duration,
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::server::middleware::REQUEST_TIMEOUT;

/// Validated service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// IP address the listener binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port the listener binds to. `0` picks an ephemeral port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Tracing log level (e.g. `"info"`, `"debug"`). `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Upper bound on the time spent serving a single request.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// How long to wait for open connections to finish after a shutdown signal.
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_secs: u64,

    /// PEM-encoded certificate chain. Serving HTTPS requires this and
    /// [`Config::tls_key_path`] together.
    #[serde(default)]
    pub tls_cert_path: Option<PathBuf>,

    /// PEM-encoded private key matching [`Config::tls_cert_path`].
    #[serde(default)]
    pub tls_key_path: Option<PathBuf>,

    /// OTLP/gRPC collector endpoint. Span export is disabled when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,
}

/// Certificate and key locations for the HTTPS listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8000
}
fn default_log_level() -> String {
    "info".into()
}
fn default_request_timeout() -> u64 {
    REQUEST_TIMEOUT.as_secs()
}
fn default_shutdown_grace() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            request_timeout_secs: default_request_timeout(),
            shutdown_grace_secs: default_shutdown_grace(),
            tls_cert_path: None,
            tls_key_path: None,
            otel_exporter_otlp_endpoint: None,
        }
    }
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Socket address the listener binds to.
    ///
    /// # Errors
    ///
    /// Returns an error if `host` is not an IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .trim()
            .parse()
            .with_context(|| format!("HOST must be an IP address, got {:?}", self.host))?;
        Ok((ip, self.port).into())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }

    /// TLS material locations, or `None` when the service should speak plain HTTP.
    pub fn tls(&self) -> Option<TlsPaths> {
        match (&self.tls_cert_path, &self.tls_key_path) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.clone(),
                key: key.clone(),
            }),
            _ => None,
        }
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        self.bind_addr()?;

        if self.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be > 0");
        }
        if self.shutdown_grace_secs == 0 {
            anyhow::bail!("SHUTDOWN_GRACE_SECS must be > 0");
        }
        match (&self.tls_cert_path, &self.tls_key_path) {
            (Some(_), None) => anyhow::bail!("TLS_CERT_PATH is set but TLS_KEY_PATH is not"),
            (None, Some(_)) => anyhow::bail!("TLS_KEY_PATH is set but TLS_CERT_PATH is not"),
            _ => {}
        }
        if let Some(endpoint) = &self.otel_exporter_otlp_endpoint {
            if endpoint.trim().is_empty() {
                anyhow::bail!("OTEL_EXPORTER_OTLP_ENDPOINT must not be empty when set");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_host(), "0.0.0.0");
        assert_eq!(default_port(), 8000);
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_request_timeout(), 30);
        assert_eq!(default_shutdown_grace(), 10);
    }

    #[test]
    fn default_config_is_valid_plain_http() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert!(cfg.tls().is_none());
        assert_eq!(cfg.bind_addr().unwrap(), "0.0.0.0:8000".parse().unwrap());
    }

    #[test]
    fn bind_addr_accepts_ipv6() {
        let cfg = Config {
            host: "::1".into(),
            port: 9443,
            ..Config::default()
        };
        assert_eq!(cfg.bind_addr().unwrap(), "[::1]:9443".parse().unwrap());
    }

    #[test]
    fn validate_rejects_hostname() {
        let cfg = Config {
            host: "localhost".into(),
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let cfg = Config {
            request_timeout_secs: 0,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_grace() {
        let cfg = Config {
            shutdown_grace_secs: 0,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_lone_cert_path() {
        let cfg = Config {
            tls_cert_path: Some("/etc/tls/tls.crt".into()),
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_lone_key_path() {
        let cfg = Config {
            tls_key_path: Some("/etc/tls/tls.key".into()),
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn tls_paths_when_both_set() {
        let cfg = Config {
            tls_cert_path: Some("/etc/tls/tls.crt".into()),
            tls_key_path: Some("/etc/tls/tls.key".into()),
            ..Config::default()
        };
        assert!(cfg.validate().is_ok());
        let tls = cfg.tls().unwrap();
        assert_eq!(tls.cert, PathBuf::from("/etc/tls/tls.crt"));
        assert_eq!(tls.key, PathBuf::from("/etc/tls/tls.key"));
    }

    #[test]
    fn validate_rejects_blank_otlp_endpoint() {
        let cfg = Config {
            otel_exporter_otlp_endpoint: Some("  ".into()),
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }
}
