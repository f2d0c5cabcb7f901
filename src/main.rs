use std::sync::Arc;

use rawhttp::config::Config;
use rawhttp::handler::DefaultHandler;
use rawhttp::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    let handler = Arc::new(DefaultHandler::from_config(&cfg.handler));

    tokio::select! {
        res = server::listener::run(&cfg.server, handler) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
