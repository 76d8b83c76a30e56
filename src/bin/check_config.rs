//! Validate a launch configuration and report what a run would use
//!
//! Shared preamble of every launch script, runnable on its own: loads the
//! JSON config, validates it, loads the fee payer keypair and resolves the
//! quote token, so an operator can catch config mistakes before a live run.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::signer::Signer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pool_launcher::config::{self, LaunchConfig};
use pool_launcher::wallet;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to JSON configuration file
    #[arg(short, long, default_value = "config.json")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let config = LaunchConfig::from_file(&args.config)
        .with_context(|| format!("Invalid configuration: {}", args.config))?;

    info!(keypair = %config.keypair_file_path, "Using keypair file path");
    let keypair = wallet::keypair_from_file(&config.keypair_file_path)?;

    info!(rpc_url = %config.rpc_url, "Using RPC URL");
    info!(dry_run = config.dry_run, "Dry run");
    info!(payer = %keypair.pubkey(), "Using payer to execute commands");
    info!(
        compute_unit_price = config.compute_unit_price_micro_lamports,
        "Priority fee (micro-lamports per CU)"
    );

    if config.quote_symbol.is_some() || config.quote_mint.is_some() {
        let rpc = Arc::new(RpcClient::new_with_commitment(
            config.rpc_url.clone(),
            CommitmentConfig::confirmed(),
        ));
        let quote = config::quote_mint(
            config.quote_symbol.as_deref(),
            config.quote_mint.as_deref(),
        )?;
        let decimals = config::quote_decimals(
            &rpc,
            config.quote_symbol.as_deref(),
            config.quote_mint.as_deref(),
        )
        .await?;
        info!(quote_mint = %quote, decimals = decimals, "Using quote token");
    }

    if let Some(base_mint) = &config.base_mint {
        info!(base_mint = %base_mint, "Using base token mint");
    }
    if let Some(vault) = &config.alpha_vault {
        info!(
            vault_type = %vault.alpha_vault_type,
            pool_type = %vault.pool_type,
            "Alpha vault configured"
        );
    }

    info!("Configuration OK");
    Ok(())
}
