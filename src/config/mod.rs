// Configuration for the committee module
// Protocol limits, logging and storage settings, loaded from TOML

pub mod settings;
pub mod validation;

pub use settings::{
    CommitteeConfig, ConfigError, ProtocolLimits, StoreBackend, StoreConfig, ENV_PREFIX,
};
pub use validation::{ConfigValidationError, ConfigValidator, ValidationResult, ValidationRule};
