//! TLS on both sides of the gateway.
//!
//! Inbound: optional rustls listener certificates.
//! Outbound: rustls over [`BackendConnector`] so `https://` backends work.

use std::path::Path;

use axum_server::tls_rustls::RustlsConfig;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};

use crate::config::schema::TlsConfig;
use crate::net::connector::BackendConnector;

/// Load the listener's certificate and key.
pub async fn load_tls_config(config: &TlsConfig) -> Result<RustlsConfig, std::io::Error> {
    let cert_path = Path::new(&config.cert_path);
    let key_path = Path::new(&config.key_path);

    if !cert_path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Certificate file not found: {:?}", cert_path),
        ));
    }
    if !key_path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Private key file not found: {:?}", key_path),
        ));
    }

    RustlsConfig::from_pem_file(cert_path, key_path).await
}

/// Wrap the backend connector with TLS, trusting the webpki root set.
/// Plain `http://` targets pass straight through.
pub fn https_connector(connector: BackendConnector) -> HttpsConnector<BackendConnector> {
    HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .wrap_connector(connector)
}
