use std::collections::HashMap;

use log::{debug, error, warn};
use thiserror::Error;

use crate::config::settings::{CommitteeConfig, StoreBackend};
use crate::types::validate_denom;

/// Error type for configuration validation issues
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Missing required setting for: {0}")]
    MissingRequiredSetting(String),

    #[error("Value out of range: {0}")]
    ValueOutOfRange(String),
}

/// Result of configuration validation
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub is_valid: bool,

    pub errors: Vec<ConfigValidationError>,

    /// Valid but not recommended
    pub warnings: Vec<String>,

    pub suggested_fixes: HashMap<String, String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            ..Default::default()
        }
    }

    pub fn add_error(&mut self, error: ConfigValidationError) {
        self.is_valid = false;
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    pub fn add_suggested_fix(&mut self, setting: &str, suggestion: String) {
        self.suggested_fixes.insert(setting.to_string(), suggestion);
    }

    /// Human readable list of errors, warnings and fixes
    pub fn get_summary(&self) -> String {
        if self.is_valid && self.warnings.is_empty() {
            return "Configuration is valid with no warnings.".to_string();
        }

        let mut result = String::new();

        if !self.is_valid {
            result.push_str(&format!("Configuration has {} errors:\n", self.errors.len()));
            for (i, error) in self.errors.iter().enumerate() {
                result.push_str(&format!("  {}. {}\n", i + 1, error));
            }
        } else {
            result.push_str("Configuration is valid but has warnings.\n");
        }

        if !self.warnings.is_empty() {
            result.push_str(&format!("\nWarnings ({}):\n", self.warnings.len()));
            for (i, warning) in self.warnings.iter().enumerate() {
                result.push_str(&format!("  {}. {}\n", i + 1, warning));
            }
        }

        if !self.suggested_fixes.is_empty() {
            result.push_str("\nSuggested fixes:\n");
            let mut fixes: Vec<_> = self.suggested_fixes.iter().collect();
            fixes.sort();
            for (setting, suggestion) in fixes {
                result.push_str(&format!("  - {}: {}\n", setting, suggestion));
            }
        }

        result
    }
}

/// One check applied to a [`CommitteeConfig`]
pub trait ValidationRule {
    fn name(&self) -> &str;

    fn validate(&self, config: &CommitteeConfig) -> Result<(), ConfigValidationError>;

    fn description(&self) -> &str;

    fn suggest_fix(&self, config: &CommitteeConfig) -> Option<HashMap<String, String>>;
}

/// Applies a set of rules to a configuration
pub struct ConfigValidator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidator {
    /// Validator with the default rules
    pub fn new() -> Self {
        let mut validator = Self { rules: Vec::new() };

        validator.add_rule(Box::new(TextLimitsRule));
        validator.add_rule(Box::new(BondDenomRule));
        validator.add_rule(Box::new(LogLevelRule));
        validator.add_rule(Box::new(StoreBackendRule));

        validator
    }

    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    pub fn validate(&self, config: &CommitteeConfig) -> ValidationResult {
        let mut result = ValidationResult::new();

        for rule in &self.rules {
            match rule.validate(config) {
                Ok(()) => {
                    debug!("Validation rule '{}' passed", rule.name());
                }
                Err(err) => {
                    error!("Validation rule '{}' failed: {}", rule.name(), err);
                    result.add_error(err);

                    if let Some(fixes) = rule.suggest_fix(config) {
                        for (setting, suggestion) in fixes {
                            result.add_suggested_fix(&setting, suggestion);
                        }
                    }
                }
            }
        }

        if config.store.backend == StoreBackend::Memory {
            warn!("Committee state is kept in memory and will not survive a restart");
            result.add_warning(
                "The memory store backend does not persist state across restarts.".to_string(),
            );
        }

        result
    }
}

/// Title and description limits must leave room for some text
struct TextLimitsRule;

impl ValidationRule for TextLimitsRule {
    fn name(&self) -> &str {
        "TextLimits"
    }

    fn validate(&self, config: &CommitteeConfig) -> Result<(), ConfigValidationError> {
        let limits = &config.limits;
        if limits.max_title_length == 0 {
            return Err(ConfigValidationError::ValueOutOfRange(
                "max_title_length must be at least 1".to_string(),
            ));
        }
        if limits.max_description_length == 0 {
            return Err(ConfigValidationError::ValueOutOfRange(
                "max_description_length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn description(&self) -> &str {
        "Validates that proposal text limits are non-zero"
    }

    fn suggest_fix(&self, config: &CommitteeConfig) -> Option<HashMap<String, String>> {
        let mut fixes = HashMap::new();
        if config.limits.max_title_length == 0 {
            fixes.insert(
                "limits.max_title_length".to_string(),
                "Set the title limit to 140".to_string(),
            );
        }
        if config.limits.max_description_length == 0 {
            fixes.insert(
                "limits.max_description_length".to_string(),
                "Set the description limit to 5000".to_string(),
            );
        }
        if fixes.is_empty() {
            None
        } else {
            Some(fixes)
        }
    }
}

/// The staking denom must itself be a well formed denom
struct BondDenomRule;

impl ValidationRule for BondDenomRule {
    fn name(&self) -> &str {
        "BondDenom"
    }

    fn validate(&self, config: &CommitteeConfig) -> Result<(), ConfigValidationError> {
        validate_denom(&config.limits.bond_denom)
            .map_err(|e| ConfigValidationError::InvalidValue(e.to_string()))
    }

    fn description(&self) -> &str {
        "Validates the staking denom"
    }

    fn suggest_fix(&self, _config: &CommitteeConfig) -> Option<HashMap<String, String>> {
        let mut fixes = HashMap::new();
        fixes.insert(
            "limits.bond_denom".to_string(),
            "Use a denom of 3 to 128 characters starting with a letter".to_string(),
        );
        Some(fixes)
    }
}

struct LogLevelRule;

impl ValidationRule for LogLevelRule {
    fn name(&self) -> &str {
        "LogLevel"
    }

    fn validate(&self, config: &CommitteeConfig) -> Result<(), ConfigValidationError> {
        config
            .log_level
            .parse::<log::LevelFilter>()
            .map(|_| ())
            .map_err(|_| {
                ConfigValidationError::InvalidValue(format!(
                    "unknown log level '{}'",
                    config.log_level
                ))
            })
    }

    fn description(&self) -> &str {
        "Validates that the log level is one of off, error, warn, info, debug, trace"
    }

    fn suggest_fix(&self, _config: &CommitteeConfig) -> Option<HashMap<String, String>> {
        let mut fixes = HashMap::new();
        fixes.insert("log_level".to_string(), "Use \"info\"".to_string());
        Some(fixes)
    }
}

/// The sled backend needs a directory
struct StoreBackendRule;

impl ValidationRule for StoreBackendRule {
    fn name(&self) -> &str {
        "StoreBackend"
    }

    fn validate(&self, config: &CommitteeConfig) -> Result<(), ConfigValidationError> {
        if config.store.backend == StoreBackend::Sled && config.store.path.is_none() {
            return Err(ConfigValidationError::MissingRequiredSetting(
                "store.path is required by the sled backend".to_string(),
            ));
        }
        Ok(())
    }

    fn description(&self) -> &str {
        "Validates that the sled backend has a database path"
    }

    fn suggest_fix(&self, _config: &CommitteeConfig) -> Option<HashMap<String, String>> {
        let mut fixes = HashMap::new();
        fixes.insert(
            "store.path".to_string(),
            "Set a directory for the sled database".to_string(),
        );
        Some(fixes)
    }
}
