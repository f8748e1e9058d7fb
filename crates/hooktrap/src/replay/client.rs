//! Outbound HTTP client creation.

use bytes::Bytes;
use http_body_util::Full;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::time::Duration;
use tracing::info;

/// Type alias for the HTTP client used for replays.
pub type HttpClient = Client<
    hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>,
    Full<Bytes>,
>;

/// Create the shared replay client with connection pooling.
///
/// Replays are user-triggered one-shots, so the pool is kept small;
/// TLS uses native roots with no verification escape hatch.
pub fn create_http_client(connect_timeout: Duration) -> HttpClient {
    // The dependency graph enables both the ring and aws-lc-rs rustls
    // providers; one must be installed as the process default before
    // any ClientConfig is built. Repeat installs are a no-op.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let mut http_connector = hyper_util::client::legacy::connect::HttpConnector::new();
    http_connector.set_connect_timeout(Some(connect_timeout));
    http_connector.enforce_http(false); // Allow both HTTP and HTTPS

    let https_connector = hyper_rustls::HttpsConnectorBuilder::new()
        .with_native_roots()
        .expect("Failed to load native root certificates")
        .https_or_http()
        .enable_http1()
        .wrap_connector(http_connector);

    let client = Client::builder(TokioExecutor::new())
        .pool_idle_timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(2)
        .build(https_connector);

    info!(
        "Replay client configured (HTTP/1.1, connect timeout {}s)",
        connect_timeout.as_secs()
    );

    client
}
