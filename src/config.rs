//! Configuration module for the price pusher
//!
//! This module handles all configuration loading from TOML files,
//! environment variables, and provides structured configuration types.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::time::Duration;

use crate::submitter::RetryPolicy;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// RPC endpoint configuration
    pub rpc: RpcConfig,

    /// Wallet configuration
    pub wallet: WalletConfig,

    /// Price feed configuration
    pub feeds: FeedsConfig,

    /// Submission and retry configuration
    #[serde(default)]
    pub submission: SubmissionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// RPC endpoint URL
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_rpc_timeout")]
    pub timeout_secs: u64,

    /// Confirmation poll interval in milliseconds
    #[serde(default = "default_poll_interval")]
    pub confirmation_poll_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Path to keypair file
    pub keypair_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedsConfig {
    /// Price feed program ID (base58)
    pub program_id: String,

    /// Path to the symbol → feed account registry JSON
    pub registry_path: String,

    /// Price exponent; display values are scaled by 10^|exponent|
    #[serde(default = "default_exponent")]
    pub exponent: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionConfig {
    /// Max submission attempts per update
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay between attempts in milliseconds
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,

    /// Commitment level: processed, confirmed, or finalized
    #[serde(default = "default_commitment")]
    pub commitment: String,

    /// Priority fee in micro-lamports (0 = no priority fee directive)
    #[serde(default = "default_priority_fee")]
    pub priority_fee_microlamports: u64,

    /// Compute unit limit (0 = no limit directive)
    #[serde(default = "default_cu_limit")]
    pub compute_unit_limit: u32,
}

// Default value functions
fn default_rpc_timeout() -> u64 { 30 }
fn default_poll_interval() -> u64 { 500 }
fn default_exponent() -> i32 { -8 }
fn default_max_attempts() -> u32 { 3 }
fn default_retry_delay() -> u64 { 2000 }
fn default_commitment() -> String { "confirmed".to_string() }
fn default_priority_fee() -> u64 { 10_000 }
fn default_cu_limit() -> u32 { 200_000 }

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay(),
            commitment: default_commitment(),
            priority_fee_microlamports: default_priority_fee(),
            compute_unit_limit: default_cu_limit(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn from_file_with_env(path: &str) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_file(path)
    }

    /// Parse the configured feed program ID
    pub fn program_id(&self) -> anyhow::Result<Pubkey> {
        Pubkey::from_str(&self.feeds.program_id)
            .with_context(|| format!("Invalid feed program ID: {}", self.feeds.program_id))
    }

    /// Parse the configured commitment level
    pub fn commitment(&self) -> anyhow::Result<CommitmentConfig> {
        CommitmentConfig::from_str(&self.submission.commitment)
            .map_err(|_| anyhow::anyhow!("Invalid commitment level: {}", self.submission.commitment))
    }

    /// Build the retry policy the submission engine runs under
    pub fn retry_policy(&self) -> anyhow::Result<RetryPolicy> {
        Ok(RetryPolicy {
            max_attempts: self.submission.max_attempts.max(1),
            retry_delay: Duration::from_millis(self.submission.retry_delay_ms),
            commitment: self.commitment()?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc: RpcConfig {
                endpoint: "http://127.0.0.1:8900".to_string(),
                timeout_secs: default_rpc_timeout(),
                confirmation_poll_ms: default_poll_interval(),
            },
            wallet: WalletConfig {
                keypair_path: "~/.config/solana/id.json".to_string(),
            },
            feeds: FeedsConfig {
                program_id: Pubkey::default().to_string(),
                registry_path: "feeds.json".to_string(),
                exponent: default_exponent(),
            },
            submission: SubmissionConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.submission.max_attempts, 3);
        assert_eq!(config.submission.retry_delay_ms, 2000);
        assert_eq!(config.submission.priority_fee_microlamports, 10_000);
        assert_eq!(config.submission.compute_unit_limit, 200_000);
        assert_eq!(config.feeds.exponent, -8);
        assert_eq!(config.commitment().unwrap(), CommitmentConfig::confirmed());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_str = r#"
            [rpc]
            endpoint = "https://api.devnet.solana.com"

            [wallet]
            keypair_path = "/tmp/payer.json"

            [feeds]
            program_id = "11111111111111111111111111111111"
            registry_path = "/tmp/feeds.json"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.rpc.endpoint, "https://api.devnet.solana.com");
        assert_eq!(config.rpc.timeout_secs, 30);
        assert_eq!(config.feeds.exponent, -8);
        assert_eq!(config.submission.max_attempts, 3);
    }

    #[test]
    fn test_retry_policy_floor() {
        let mut config = Config::default();
        config.submission.max_attempts = 0;
        assert_eq!(config.retry_policy().unwrap().max_attempts, 1);
    }

    #[test]
    fn test_invalid_commitment_rejected() {
        let mut config = Config::default();
        config.submission.commitment = "instant".to_string();
        assert!(config.commitment().is_err());
    }
}
