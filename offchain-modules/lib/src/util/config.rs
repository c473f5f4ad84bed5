use crate::util::scripts::{Network, NetworkScripts};
use acp_sdk::constants::DEFAULT_FEE_RATE;
use anyhow::{anyhow, Result};
use config::{Config, Environment, File};
use serde_derive::{Deserialize, Serialize};
use shellexpand::tilde;

pub const DEFAULT_CKB_RPC_URL: &str = "https://testnet.ckb.dev/rpc";
pub const DEFAULT_CKB_INDEXER_URL: &str = "https://testnet.ckb.dev/indexer";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AcpConfig {
    pub is_mainnet: bool,
    pub ckb_rpc_url: String,
    pub ckb_indexer_url: String,
    /// shannons per 1000 bytes
    pub fee_rate: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ckb_secp256k1_private_key: Option<String>,
}

impl Default for AcpConfig {
    fn default() -> Self {
        AcpConfig {
            is_mainnet: false,
            ckb_rpc_url: DEFAULT_CKB_RPC_URL.to_string(),
            ckb_indexer_url: DEFAULT_CKB_INDEXER_URL.to_string(),
            fee_rate: DEFAULT_FEE_RATE,
            ckb_secp256k1_private_key: None,
        }
    }
}

impl AcpConfig {
    /// Defaults, then the toml file at `config_path` if it exists, then
    /// the process environment (`IS_MAINNET`, `CKB_RPC_URL`, ...).
    pub fn new(config_path: Option<&str>) -> Result<Self> {
        Self::load(config_path, Environment::default())
    }

    fn load(config_path: Option<&str>, environment: Environment) -> Result<Self> {
        let defaults = AcpConfig::default();
        let mut builder = Config::builder()
            .set_default("is_mainnet", defaults.is_mainnet)?
            .set_default("ckb_rpc_url", defaults.ckb_rpc_url)?
            .set_default("ckb_indexer_url", defaults.ckb_indexer_url)?
            .set_default("fee_rate", defaults.fee_rate as i64)?;
        if let Some(config_path) = config_path {
            let config_path = tilde(config_path).into_owned();
            builder = builder.add_source(File::with_name(&config_path).required(false));
        }
        let config = builder
            .add_source(environment)
            .build()
            .map_err(|e| anyhow!("failed to load config: {}", e))?;
        let config: AcpConfig = config
            .try_deserialize()
            .map_err(|e| anyhow!("invalid config: {}", e))?;
        log::debug!(
            "network: {:?}, ckb rpc: {}, indexer: {}, fee rate: {}",
            config.network(),
            config.ckb_rpc_url,
            config.ckb_indexer_url,
            config.fee_rate
        );
        Ok(config)
    }

    pub fn network(&self) -> Network {
        Network::from_is_mainnet(self.is_mainnet)
    }

    pub fn network_scripts(&self) -> NetworkScripts {
        NetworkScripts::new(self.network())
    }

    pub fn write(&self, config_path: &str) -> Result<()> {
        let config_path = tilde(config_path).into_owned();
        let s = toml::to_string_pretty(self).map_err(|e| anyhow!("toml serde error: {}", e))?;
        if let Some(parent_path) = std::path::Path::new(&config_path).parent() {
            std::fs::create_dir_all(parent_path)
                .map_err(|e| anyhow!("fail to create config path. err: {}", e))?;
        }
        std::fs::write(&config_path, &s).map_err(|e| anyhow!("fail to write config. err: {}", e))
    }
}
