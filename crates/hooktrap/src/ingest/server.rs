//! Public webhook ingest server.

use crate::context::RelayContext;
use crate::ingest::handler::handle_webhook;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info};

/// Unauthenticated ingest server for webhook senders
pub struct IngestServer {
    addr: SocketAddr,
    ctx: Arc<RelayContext>,
}

impl IngestServer {
    pub fn new(addr: SocketAddr, ctx: Arc<RelayContext>) -> Self {
        Self { addr, ctx }
    }

    /// Bind and run the ingest server.
    pub async fn run(self) -> Result<(), anyhow::Error> {
        let listener = TcpListener::bind(self.addr).await?;
        info!("Webhook ingest listening on http://{}", self.addr);
        serve(listener, self.ctx).await
    }
}

/// Serve ingest on an already-bound listener.
pub async fn serve(listener: TcpListener, ctx: Arc<RelayContext>) -> Result<(), anyhow::Error> {
    loop {
        let (stream, _) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let ctx = Arc::clone(&ctx);

        tokio::spawn(async move {
            let service = service_fn(move |req| {
                let ctx = Arc::clone(&ctx);
                async move { handle_webhook(req, ctx).await }
            });

            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                debug!("Ingest connection error: {}", e);
            }
        });
    }
}
