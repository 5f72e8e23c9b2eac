use std::fmt;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::validation::ConfigValidator;
use crate::errors::StoreError;
use crate::store::{KvStore, MemStore};

/// Prefix of environment variables layered over the config file,
/// e.g. `COMMITTEE__LIMITS__MAX_TITLE_LENGTH=200`
pub const ENV_PREFIX: &str = "COMMITTEE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration:\n{0}")]
    Invalid(String),
}

/// Chain-wide limits used when validating committees and proposals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolLimits {
    pub max_committee_description_length: usize,
    pub max_title_length: usize,
    pub max_description_length: usize,
    /// Staking denom; token committees may not tally in it
    pub bond_denom: String,
}

impl Default for ProtocolLimits {
    fn default() -> Self {
        Self {
            max_committee_description_length: 512,
            max_title_length: 140,
            max_description_length: 5000,
            bond_denom: "ustake".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Sled,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Memory => write!(f, "memory"),
            StoreBackend::Sled => write!(f, "sled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Database directory, required by the sled backend
    pub path: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            path: None,
        }
    }
}

impl StoreConfig {
    /// Open the configured backend
    pub fn open(&self) -> Result<Box<dyn KvStore>, StoreError> {
        match self.backend {
            StoreBackend::Memory => Ok(Box::new(MemStore::new())),
            #[cfg(feature = "sled-store")]
            StoreBackend::Sled => {
                let path = self.path.as_ref().ok_or_else(|| {
                    StoreError::Backend("sled backend requires a path".to_string())
                })?;
                debug!("Opening sled store at {}", path.display());
                Ok(Box::new(crate::store::SledStore::open(path)?))
            }
            #[cfg(not(feature = "sled-store"))]
            StoreBackend::Sled => Err(StoreError::Backend(
                "sled backend not compiled in; enable the sled-store feature".to_string(),
            )),
        }
    }
}

/// Top level configuration of a committee node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitteeConfig {
    pub limits: ProtocolLimits,
    pub log_level: String,
    pub store: StoreConfig,
}

impl Default for CommitteeConfig {
    fn default() -> Self {
        Self {
            limits: ProtocolLimits::default(),
            log_level: "info".to_string(),
            store: StoreConfig::default(),
        }
    }
}

impl CommitteeConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: CommitteeConfig = toml::from_str(s)?;
        Ok(cfg)
    }

    /// Load from a TOML file with `COMMITTEE__*` environment overrides on top.
    /// Missing fields fall back to their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("Loading committee configuration from {}", path.display());

        let cfg = config::Config::builder()
            .add_source(config::File::from(path).format(config::FileFormat::Toml))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<CommitteeConfig>()?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply every rule of the default [`ConfigValidator`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        let result = ConfigValidator::new().validate(self);
        if result.is_valid {
            Ok(())
        } else {
            Err(ConfigError::Invalid(result.get_summary()))
        }
    }
}
