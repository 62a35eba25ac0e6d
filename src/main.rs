//! Mempool Capture Probe
//!
//! Entry point. Connects to the node over WebSocket (two connections:
//! one for quotes/broadcast, one dedicated to the pending-transaction
//! subscription), then runs one orchestrated capture: listen for
//! router-bound swaps while submitting our own, and write the ranked
//! report when the window closes.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{info, Level};

use alloy::network::EthereumWallet;
use alloy::providers::{Provider, ProviderBuilder, WsConnect};
use alloy::signers::local::PrivateKeySigner;

use mempool_probe::config::load_config_from_file;
use mempool_probe::mempool::WsPendingFeed;
use mempool_probe::orchestrator::Orchestrator;
use mempool_probe::report::CaptureReport;
use mempool_probe::swap::RouterSwapSubmitter;

/// Mempool capture probe — records router-bound pending swaps while
/// generating its own test traffic.
#[derive(Parser)]
#[command(name = "mempool-probe")]
struct Args {
    /// Dotenv file with connection, wallet, and capture settings
    #[arg(long, env = "ENV_FILE", default_value = ".env")]
    env_file: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    let args = Args::parse();
    let config = load_config_from_file(&args.env_file)?;
    info!(
        "Configuration loaded from {} (chain_id: {})",
        args.env_file, config.chain_id
    );
    info!("Router: {}", config.router_address);
    info!(
        "Capture window: {} swaps / {}s | test traffic: {} swaps",
        config.max_capture_count, config.max_capture_seconds, config.swap_count
    );

    let signer: PrivateKeySigner = config.private_key.parse()?;
    let recipient = signer.address();
    info!("Wallet loaded: {}", recipient);
    let wallet = EthereumWallet::from(signer);

    // Two WS connections: quotes + broadcast on one, the pending-tx
    // subscription on a dedicated reader.
    info!("Connecting via WebSocket (RPC + subscription)...");
    let rpc_provider = ProviderBuilder::new()
        .wallet(wallet)
        .connect_ws(WsConnect::new(&config.ws_rpc_url))
        .await?;
    let sub_provider = ProviderBuilder::new()
        .connect_ws(WsConnect::new(&config.ws_rpc_url))
        .await?;

    let block = rpc_provider.get_block_number().await?;
    info!("Connected! Current block: {} (2 WS connections)", block);

    let feed = Arc::new(WsPendingFeed::new(sub_provider));
    let submitter = RouterSwapSubmitter::new(rpc_provider, &config, recipient);
    let orchestrator = Orchestrator::new(
        feed,
        submitter,
        config.capture_criteria(),
        config.swap_plan(),
    );

    let run = orchestrator.run().await?;

    let report = CaptureReport::from_run(run);
    report.log_summary();
    report.write_json(&config.output_file)?;
    info!("Report written to {}", config.output_file.display());

    Ok(())
}
