//! Symbol to feed-account registry
//!
//! Loaded from a JSON object mapping feed symbols to base58 account
//! addresses, e.g. `{"BTC/USD": "7f1k...", "ETH/USD": "9aQx..."}`.

use anyhow::{Context, Result};
use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;
use std::str::FromStr;

/// Read-only lookup from feed symbol to on-chain feed account.
#[derive(Debug, Clone, Default)]
pub struct FeedRegistry {
    feeds: HashMap<String, Pubkey>,
}

impl FeedRegistry {
    /// Load the registry from a JSON file of symbol → base58 address.
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read feed registry: {}", path))?;
        let raw: HashMap<String, String> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse feed registry JSON: {}", path))?;

        let mut feeds = HashMap::with_capacity(raw.len());
        for (symbol, address) in raw {
            let pubkey = Pubkey::from_str(&address).with_context(|| {
                format!("Invalid feed address for symbol '{}': {}", symbol, address)
            })?;
            feeds.insert(symbol, pubkey);
        }
        Ok(Self { feeds })
    }

    pub fn from_map(feeds: HashMap<String, Pubkey>) -> Self {
        Self { feeds }
    }

    /// Look up the feed account for a symbol.
    pub fn lookup(&self, symbol: &str) -> Option<Pubkey> {
        self.feeds.get(symbol).copied()
    }

    /// All registered symbols, sorted for stable display.
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.feeds.keys().map(String::as_str).collect();
        symbols.sort_unstable();
        symbols
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }
}
