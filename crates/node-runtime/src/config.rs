//! # Node Configuration
//!
//! Unified configuration for every subsystem and the runtime itself.
//!
//! ## Sources (later wins)
//!
//! 1. Built-in defaults
//! 2. JSON file named by `QC_CONFIG`
//! 3. `QC_*` environment overrides

use qc_02_block_log::BlockLogConfig;
use qc_08_consensus::ConsensusConfig;
use qc_17_block_production::ProductionConfig;
use serde::Deserialize;
use shared_types::{Address, Amount};
use std::path::Path;
use thiserror::Error;

/// Environment variable naming the JSON config file.
pub const CONFIG_PATH_ENV: &str = "QC_CONFIG";

/// Complete node configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Consensus engine configuration.
    pub consensus: ConsensusConfig,
    /// Block log configuration.
    pub block_log: BlockLogConfig,
    /// Finalization driver configuration.
    pub production: ProductionConfig,
    /// Number of validators this node runs locally.
    pub validators: usize,
    /// Initial allocation and owner account.
    pub genesis: GenesisConfig,
    /// Fallback tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones.
    pub json_logs: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            consensus: ConsensusConfig::default(),
            block_log: BlockLogConfig::default(),
            production: ProductionConfig::default(),
            validators: 4,
            genesis: GenesisConfig::default(),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// Genesis allocation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GenesisConfig {
    /// Owner address as 40 hex characters; granted the `Owner` role.
    pub owner: String,
    /// Native-asset supply minted to the owner, in whole coins.
    pub supply: u64,
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            owner: "00000000000000000000000000000000000000a1".to_string(),
            supply: 1_000_000,
        }
    }
}

impl GenesisConfig {
    /// Parsed owner address.
    pub fn owner_address(&self) -> Result<Address, ConfigError> {
        let bytes = hex::decode(self.owner.trim_start_matches("0x"))
            .map_err(|_| ConfigError::InvalidValue("genesis.owner", self.owner.clone()))?;
        Address::try_from(bytes.as_slice())
            .map_err(|_| ConfigError::InvalidValue("genesis.owner", self.owner.clone()))
    }

    /// Supply in base units (`NATIVE_DECIMALS` fractional digits).
    pub fn supply_base_units(&self) -> Amount {
        Amount::from(self.supply).saturating_mul(10u128.pow(shared_types::NATIVE_DECIMALS))
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Config file is not valid JSON for `NodeConfig`.
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    /// An override or field could not be parsed.
    #[error("Invalid value for {0}: {1:?}")]
    InvalidValue(&'static str, String),

    /// Configuration parsed but cannot run.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl NodeConfig {
    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Defaults, then `QC_CONFIG`, then environment overrides, then validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `QC_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("QC_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(raw) = lookup("QC_TICK_MS") {
            self.production.tick_interval_ms = parse_override("QC_TICK_MS", &raw)?;
        }
        if let Some(raw) = lookup("QC_PROPOSAL_TIMEOUT_SECS") {
            self.consensus.proposal_timeout_secs =
                parse_override("QC_PROPOSAL_TIMEOUT_SECS", &raw)?;
        }
        if let Some(raw) = lookup("QC_VALIDATORS") {
            self.validators = parse_override("QC_VALIDATORS", &raw)?;
        }
        if let Some(raw) = lookup("QC_JSON_LOGS") {
            self.json_logs = parse_override("QC_JSON_LOGS", &raw)?;
        }
        Ok(())
    }

    /// Reject configurations the node cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let min = self.consensus.effective_min_validators();
        if self.validators < min {
            return Err(ConfigError::Invalid(format!(
                "{} validators configured, at least {} required",
                self.validators, min
            )));
        }
        if self.consensus.max_payload_bytes == 0 {
            return Err(ConfigError::Invalid(
                "consensus.max_payload_bytes must be positive".into(),
            ));
        }
        if self.consensus.proposal_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "consensus.proposal_timeout_secs must be positive".into(),
            ));
        }
        if self.block_log.max_block_bytes == 0 {
            return Err(ConfigError::Invalid(
                "block_log.max_block_bytes must be positive".into(),
            ));
        }
        self.production
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.genesis.owner_address()?;
        Ok(())
    }
}

fn parse_override<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(key, raw.to_string()))
}
