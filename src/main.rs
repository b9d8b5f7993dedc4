use anyhow::Context;
use clap::Parser;
use gitops_harness::cli::Cli;
use gitops_harness::config::Settings;
use gitops_harness::k8s::HarnessClient;
use gitops_harness::server::{self, AppState};
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting gitops-harness v{}", gitops_harness::VERSION);

    if let Err(e) = run(Settings::from(cli)).await {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run(settings: Settings) -> anyhow::Result<()> {
    // without a cluster there is nothing to test
    let client = HarnessClient::try_default(&settings.namespace, settings.kube_timeout)
        .await
        .context("Failed to connect to the Kubernetes cluster")?;

    let listen = settings.listen;
    let state = AppState::new(client, settings).context("Failed to initialize server state")?;

    server::serve(listen, state).await.context("HTTP server failed")?;

    Ok(())
}
