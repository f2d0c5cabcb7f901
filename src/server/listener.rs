use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerConfig;
use crate::handler::Handler;
use crate::http::connection::Connection;

/// Accepts connections forever, serving each one on its own task.
pub async fn run<H: Handler>(cfg: &ServerConfig, handler: Arc<H>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    serve(listener, cfg, handler).await
}

/// Accept loop over an already-bound listener.
pub async fn serve<H: Handler>(
    listener: TcpListener,
    cfg: &ServerConfig,
    handler: Arc<H>,
) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::error!(error = %e, "Failed to accept connection");
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let mut conn = Connection::new(socket, handler.clone(), cfg);
        tokio::spawn(async move {
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {:#}", peer, e);
            }
        });
    }
}
