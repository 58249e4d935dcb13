//! TLS server configuration using rustls with PEM material from disk.
//!
//! The listener only terminates TLS. Certificate status (OCSP) is neither
//! fetched nor stapled here.

use std::{fs, io::BufReader, path::Path, sync::Arc};

use rustls::{crypto::ring, ServerConfig};
use thiserror::Error;

use crate::config::TlsPaths;

/// Errors raised while loading TLS material.
#[derive(Debug, Error)]
pub enum TlsError {
    /// A certificate or key file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The certificate PEM was malformed or contained no certificates.
    #[error("invalid TLS certificate chain: {0}")]
    Certificate(String),

    /// The key PEM was malformed or contained no private key.
    #[error("invalid TLS private key: {0}")]
    PrivateKey(String),

    /// rustls refused the certificate/key pair.
    #[error("rustls rejected the configuration: {0}")]
    Rustls(#[from] rustls::Error),
}

/// Read the certificate chain and key named by `paths` and build a server config.
pub fn load_server_config(paths: &TlsPaths) -> Result<Arc<ServerConfig>, TlsError> {
    let cert_pem = read(&paths.cert)?;
    let key_pem = read(&paths.key)?;
    build_server_config(&cert_pem, &key_pem)
}

/// Build a [`rustls::ServerConfig`] from PEM-encoded certificate and private key bytes.
///
/// HTTP/2 and HTTP/1.1 are both offered through ALPN.
///
/// # Errors
///
/// Returns an error if the certificate or key cannot be parsed, or if rustls
/// rejects the configuration.
pub fn build_server_config(cert_pem: &[u8], key_pem: &[u8]) -> Result<Arc<ServerConfig>, TlsError> {
    let certs = rustls_pemfile::certs(&mut BufReader::new(cert_pem))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| TlsError::Certificate(e.to_string()))?;
    if certs.is_empty() {
        return Err(TlsError::Certificate("no certificates found in PEM data".into()));
    }

    let key = rustls_pemfile::private_key(&mut BufReader::new(key_pem))
        .map_err(|e| TlsError::PrivateKey(e.to_string()))?
        .ok_or_else(|| TlsError::PrivateKey("no private key found in PEM data".into()))?;

    let mut config = ServerConfig::builder_with_provider(Arc::new(ring::default_provider()))
        .with_safe_default_protocol_versions()?
        .with_no_client_auth()
        .with_single_cert(certs, key)?;
    config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

    Ok(Arc::new(config))
}

fn read(path: &Path) -> Result<Vec<u8>, TlsError> {
    fs::read(path).map_err(|source| TlsError::Read {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_cert_pem() {
        let result = build_server_config(b"", b"");
        assert!(matches!(result, Err(TlsError::Certificate(_))));
    }

    #[test]
    fn rejects_garbage_pem() {
        let result = build_server_config(b"not a pem", b"also not a pem");
        assert!(result.is_err());
    }

    const CERT_PEM: &[u8] = include_bytes!("../../tests/fixtures/localhost.crt");
    const KEY_PEM: &[u8] = include_bytes!("../../tests/fixtures/localhost.key");

    #[test]
    fn builds_config_from_valid_pem() {
        let config = build_server_config(CERT_PEM, KEY_PEM).unwrap();
        assert_eq!(
            config.alpn_protocols,
            vec![b"h2".to_vec(), b"http/1.1".to_vec()]
        );
    }

    #[test]
    fn loads_config_from_files() {
        let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
        let paths = TlsPaths {
            cert: fixtures.join("localhost.crt"),
            key: fixtures.join("localhost.key"),
        };
        assert!(load_server_config(&paths).is_ok());
    }

    #[test]
    fn rejects_cert_without_key() {
        let result = build_server_config(CERT_PEM, b"");
        assert!(matches!(result, Err(TlsError::PrivateKey(_))));
    }

    #[test]
    fn missing_file_names_path() {
        let paths = TlsPaths {
            cert: "/nonexistent/tls.crt".into(),
            key: "/nonexistent/tls.key".into(),
        };
        let err = load_server_config(&paths).unwrap_err();
        assert!(matches!(err, TlsError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/tls.crt"));
    }
}
