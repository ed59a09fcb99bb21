use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mock_server::Build;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let builds: Vec<Build> = match std::env::var("FIXTURES") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path).with_context(|| format!("failed to read fixtures from {path}"))?;
            serde_json::from_str(&raw).with_context(|| format!("failed to parse fixtures in {path}"))?
        }
        Err(_) => Vec::new(),
    };

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, builds = builds.len(), "listening");
    mock_server::run(listener, builds).await?;
    Ok(())
}
