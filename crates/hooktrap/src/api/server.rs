//! Dashboard API server.

use crate::api::router::route_request;
use crate::context::RelayContext;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info};

/// Authenticated dashboard API server
pub struct ApiServer {
    addr: SocketAddr,
    ctx: Arc<RelayContext>,
}

impl ApiServer {
    pub fn new(addr: SocketAddr, ctx: Arc<RelayContext>) -> Self {
        Self { addr, ctx }
    }

    /// Bind and run the API server.
    pub async fn run(self) -> Result<(), anyhow::Error> {
        let listener = TcpListener::bind(self.addr).await?;
        info!("Dashboard API listening on http://{}", self.addr);
        serve(listener, self.ctx).await
    }
}

/// Serve the API on an already-bound listener. Split out so tests can
/// bind port 0 and learn the assigned address first.
pub async fn serve(listener: TcpListener, ctx: Arc<RelayContext>) -> Result<(), anyhow::Error> {
    loop {
        let (stream, _) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let ctx = Arc::clone(&ctx);

        tokio::spawn(async move {
            let service = service_fn(move |req| {
                let ctx = Arc::clone(&ctx);
                async move { route_request(req, ctx).await }
            });

            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                debug!("API connection error: {}", e);
            }
        });
    }
}
