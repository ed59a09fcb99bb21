use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use logkeeper_core::{
    CancellationToken, LogkeeperClient, LogkeeperClientOptions, UreqTransport,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Fetch build and test metadata from a logkeeper server.
#[derive(Parser, Debug)]
#[command(name = "logkeeper", version, about)]
struct Cli {
    /// Base URL of the logkeeper server.
    #[arg(long, env = "LOGKEEPER_BASE_URL")]
    base_url: String,

    /// Overall timeout for a request, in seconds.
    #[arg(long, env = "LOGKEEPER_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a build's metadata, including its tests.
    Build { build_id: String },
    /// Print the metadata of one test within a build.
    Test { build_id: String, test_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let transport = match cli.timeout_secs {
        Some(secs) => UreqTransport::with_timeout(Duration::from_secs(secs)),
        None => UreqTransport::new(),
    };
    let client = LogkeeperClient::with_transport(
        LogkeeperClientOptions {
            base_url: cli.base_url,
        },
        Arc::new(transport),
    );

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupted, cancelling request");
            on_ctrl_c.cancel();
        }
    });

    let output = match cli.command {
        Command::Build { build_id } => {
            let build = client
                .fetch_build_metadata(&cancel, &build_id)
                .await
                .with_context(|| format!("failed to fetch build {build_id}"))?;
            serde_json::to_string_pretty(&build)?
        }
        Command::Test { build_id, test_id } => {
            let test = client
                .fetch_test_metadata(&cancel, &build_id, &test_id)
                .await
                .with_context(|| format!("failed to fetch test {test_id} of build {build_id}"))?;
            serde_json::to_string_pretty(&test)?
        }
    };
    println!("{output}");
    Ok(())
}
