//! Request and response types exchanged with API clients.
//!
//! Every response body the service produces is one of these types serialised
//! as JSON.

use serde::{Deserialize, Serialize};

/// Human-readable title the API publishes about itself.
pub const SERVICE_TITLE: &str = "OCSP Stapling Demo API";

/// Fixed `msg` value returned by the health-check route.
pub const WELCOME_MESSAGE: &str = "OCSP Stapling Demo backend is alive";

/// Name greeted by `GET /hello` when the caller does not supply one.
pub const DEFAULT_NAME: &str = "world";

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Always `"ok"` while the process is reachable.
    pub status: String,
    /// Fixed welcome text.
    pub msg: String,
}

impl StatusResponse {
    /// The one status body the service ever returns.
    pub fn alive() -> Self {
        Self {
            status: "ok".into(),
            msg: WELCOME_MESSAGE.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Echo
// ---------------------------------------------------------------------------

/// Query string accepted by `GET /hello`.
///
/// A missing `name` falls back to [`DEFAULT_NAME`]; an empty `name=` is kept
/// as the empty string. When `name` is repeated the last occurrence wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelloQuery {
    #[serde(default = "default_name")]
    pub name: String,
}

impl Default for HelloQuery {
    fn default() -> Self {
        Self {
            name: default_name(),
        }
    }
}

impl HelloQuery {
    /// Build from decoded query pairs, keeping the last `name` value.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        pairs
            .into_iter()
            .filter(|(key, _)| key == "name")
            .last()
            .map(|(_, name)| Self { name })
            .unwrap_or_default()
    }
}

fn default_name() -> String {
    DEFAULT_NAME.into()
}

/// Response body for `GET /hello`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelloResponse {
    pub message: String,
}

impl HelloResponse {
    /// Build the greeting for `name`, verbatim.
    pub fn greet(name: &str) -> Self {
        Self {
            message: format!("Hello, {name}!"),
        }
    }
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Error body returned by the fallback route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable description safe to expose to callers.
    pub detail: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a message.
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }

    /// The body sent for unmatched paths.
    pub fn not_found() -> Self {
        Self::new("Not Found")
    }

    /// The body sent when a known path is requested with the wrong method.
    pub fn method_not_allowed() -> Self {
        Self::new("Method Not Allowed")
    }
}
