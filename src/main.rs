//! price-pusher - CLI for submitting price feed updates
//!
//! One invocation submits one signed `update_price` transaction: the price
//! string is scaled exactly by the configured exponent, packed into the
//! fixed instruction payload, and delivered with bounded retry under
//! blockhash expiry.

#![deny(unused_imports)]
#![deny(unused_mut)]
#![warn(unused_must_use)]

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use price_pusher::pusher::explorer_tx_url;
use price_pusher::{Config, FeedRegistry, PricePusher, WalletManager};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Feed symbol to update (e.g. BTC/USD)
    #[arg(short, long, required_unless_present = "list_feeds")]
    symbol: Option<String>,

    /// New price as a decimal display value (e.g. 123.45)
    #[arg(short, long, required_unless_present = "list_feeds")]
    price: Option<String>,

    /// List registered feed symbols and exit
    #[arg(long)]
    list_feeds: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose)?;

    let config = load_config(&args.config)?;

    info!("Loading feed registry from: {}", config.feeds.registry_path);
    let registry = FeedRegistry::from_file(&config.feeds.registry_path)?;
    if registry.is_empty() {
        anyhow::bail!(
            "Feed registry '{}' is empty; provision feed accounts first",
            config.feeds.registry_path
        );
    }

    if args.list_feeds {
        for symbol in registry.symbols() {
            println!("{symbol}");
        }
        return Ok(());
    }

    // required_unless_present guarantees these are set past this point
    let symbol = args.symbol.context("missing --symbol")?;
    let price = args.price.context("missing --price")?;

    info!("Initializing wallet from: {}", config.wallet.keypair_path);
    let wallet =
        WalletManager::from_file(&config.wallet.keypair_path).context("Failed to load wallet")?;
    info!("Fee payer: {}", wallet.pubkey());

    info!(
        endpoint = %config.rpc.endpoint,
        commitment = %config.submission.commitment,
        max_attempts = config.submission.max_attempts,
        "Connecting"
    );
    let pusher = PricePusher::from_config(&config, wallet, registry)?;

    match pusher.request_price_update(&symbol, &price).await {
        Ok(signature) => {
            info!(
                symbol = %symbol,
                price = %price,
                signature = %signature,
                "Price update confirmed"
            );
            println!("{}", explorer_tx_url(&signature, &config.rpc.endpoint));
            Ok(())
        }
        Err(err) => Err(anyhow::anyhow!(err).context(format!("Price update for {symbol} failed"))),
    }
}

/// Initialize logging subsystem
fn init_logging(verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        "price_pusher=debug,info"
    } else {
        "price_pusher=info,warn,error"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    Ok(())
}

/// Load configuration from file with fallback to defaults
fn load_config(path: &str) -> Result<Config> {
    if std::path::Path::new(path).exists() {
        Config::from_file_with_env(path)
            .with_context(|| format!("Failed to load config from {}", path))
    } else {
        warn!("Config file '{}' not found, using defaults", path);
        Ok(Config::default())
    }
}
