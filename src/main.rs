use anyhow::Result;
use clap::Parser;
use prodex::config::Config;
use prodex::server::HttpServer;
use tokio::sync::broadcast;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Normalized product extraction API.
#[derive(Debug, Parser)]
#[command(name = "prodex", version, about)]
struct Args {
    /// Listen address (overrides LISTEN_ADDR).
    #[arg(long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = Config::from_env();
    if let Some(listen) = args.listen {
        config.listen_addr = listen;
    }

    info!(
        render_api = %config.render_api_url,
        listen = %config.listen_addr,
        "starting prodex"
    );

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(());
        }
    });

    HttpServer::new(config).run(shutdown_rx).await
}
