use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use alloy::{primitives::Address, signers::local::PrivateKeySigner};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::contract::JWT_VERIFIER_ADDRESS;

pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

pub const BASE_SEPOLIA_RPC: &str = "https://sepolia.base.org";
pub const BASE_SEPOLIA_CHAIN_ID: u64 = 84532;

pub const DEFAULT_GAS_LIMIT: u64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_address: String,
    pub rpc_url: String,
    pub chain_id: u64,
    pub contract_address: Address,
    pub gas_limit: u64,
    /// Zero waits for the receipt indefinitely.
    pub receipt_timeout_secs: u64,
    /// Arkworks-serialized Groth16 verifying key. When set, proofs are checked
    /// locally before any gas is spent.
    pub verification_key_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: "127.0.0.1:3000".to_string(),
            rpc_url: BASE_SEPOLIA_RPC.to_string(),
            chain_id: BASE_SEPOLIA_CHAIN_ID,
            contract_address: JWT_VERIFIER_ADDRESS,
            gas_limit: DEFAULT_GAS_LIMIT,
            receipt_timeout_secs: 120,
            verification_key_path: None,
        }
    }
}

impl ServerConfig {
    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        debug!("Reading server config from {}", path.as_ref().display());
        let toml_str = fs::read_to_string(path.as_ref())?;

        Ok(toml::from_str(&toml_str)?)
    }

    pub fn receipt_timeout(&self) -> Option<Duration> {
        (self.receipt_timeout_secs > 0).then(|| Duration::from_secs(self.receipt_timeout_secs))
    }
}

/// Loads the signing key from `PRIVATE_KEY`, reading `.env` first if present.
pub fn load_signer() -> anyhow::Result<PrivateKeySigner> {
    dotenvy::dotenv().ok();

    let key = std::env::var(PRIVATE_KEY_ENV)
        .map_err(|_| anyhow::anyhow!("{PRIVATE_KEY_ENV} environment variable is not set"))?;

    parse_signer(&key)
}

/// Accepts a hex private key with or without the `0x` prefix.
pub fn parse_signer(key: &str) -> anyhow::Result<PrivateKeySigner> {
    let key = key.trim();
    let key = key.strip_prefix("0x").unwrap_or(key);

    key.parse::<PrivateKeySigner>()
        .map_err(|e| anyhow::anyhow!("invalid {PRIVATE_KEY_ENV}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    // First development account of anvil/hardhat.
    const DEV_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ADDRESS: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

    #[test]
    fn parses_keys_with_and_without_prefix() {
        assert_eq!(parse_signer(DEV_KEY).unwrap().address(), DEV_ADDRESS);
        assert_eq!(
            parse_signer(&format!("0x{DEV_KEY}\n")).unwrap().address(),
            DEV_ADDRESS
        );
    }

    #[test]
    fn rejects_malformed_keys() {
        assert!(parse_signer("").is_err());
        assert!(parse_signer("0x1234").is_err());
        assert!(parse_signer("not a key").is_err());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            listen_address = "0.0.0.0:8080"
            gas_limit = 2000000
            verification_key_path = "keys/jwt_vk.bin"
            "#,
        )
        .unwrap();

        assert_eq!(config.listen_address, "0.0.0.0:8080");
        assert_eq!(config.gas_limit, 2_000_000);
        assert_eq!(config.chain_id, BASE_SEPOLIA_CHAIN_ID);
        assert_eq!(config.contract_address, JWT_VERIFIER_ADDRESS);
        assert_eq!(
            config.verification_key_path,
            Some(PathBuf::from("keys/jwt_vk.bin"))
        );
    }

    #[test]
    fn zero_timeout_disables_receipt_deadline() {
        let config = ServerConfig {
            receipt_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.receipt_timeout(), None);
        assert_eq!(
            ServerConfig::default().receipt_timeout(),
            Some(Duration::from_secs(120))
        );
    }
}
