//! Configuration management
//! Load settings from a dotenv file

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::str::FromStr;

// Re-export ProbeConfig for external access
pub use crate::types::ProbeConfig;
use alloy::primitives::Address;

/// Load probe configuration from the given dotenv file.
/// Required keys fail loudly; tuning knobs fall back to the defaults
/// below.
pub fn load_config_from_file(env_file: &str) -> Result<ProbeConfig> {
    dotenv::from_filename(env_file).ok();

    let config = ProbeConfig {
        ws_rpc_url: required("WS_RPC_URL")?,
        chain_id: required("CHAIN_ID")?.parse().context("CHAIN_ID not a number")?,
        private_key: required("PRIVATE_KEY")?,

        router_address: parse_address("ROUTER_ADDRESS")?,
        weth_token: parse_address("WETH_TOKEN")?,
        usdc_token: parse_address("USDC_TOKEN")?,

        max_capture_count: parse_or("MAX_CAPTURE_COUNT", 20)?,
        max_capture_seconds: parse_or("MAX_CAPTURE_SECONDS", 60)?,

        swap_count: parse_or("SWAP_COUNT", 3)?,
        swap_pause_ms: parse_or("SWAP_PAUSE_MS", 500)?,
        slippage_bps: parse_or("SLIPPAGE_BPS", 100)?,
        priority_tip_gwei: parse_or("PRIORITY_TIP_GWEI", 2)?,
        swap_deadline_secs: parse_or("SWAP_DEADLINE_SECS", 900)?,

        require_known_selector: parse_or("REQUIRE_KNOWN_SELECTOR", false)?,

        output_file: PathBuf::from(
            std::env::var("OUTPUT_FILE").unwrap_or_else(|_| "output/swaps.json".to_string()),
        ),
    };

    anyhow::ensure!(
        config.slippage_bps < 10_000,
        "SLIPPAGE_BPS must be below 10000 (100%)"
    );

    Ok(config)
}

fn required(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("{} not set", key))
}

fn parse_address(key: &str) -> Result<Address> {
    let raw = required(key)?;
    Address::from_str(raw.trim()).with_context(|| format!("{} is not a valid address: {}", key, raw))
}

fn parse_or<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} could not be parsed: {}", key, raw)),
        Err(_) => Ok(default),
    }
}
