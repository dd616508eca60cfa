//! Layered shop configuration.
//!
//! Precedence, lowest first: built-in defaults, the YAML file named by
//! `BAKERY_CONFIG`, then `BAKERY_*` environment variables (`__` separates
//! nested keys, e.g. `BAKERY_PRICING__BASE_PRICE=9000`).

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::StatusPolicy;
use crate::pricing::PricingTable;

pub const CONFIG_PATH_VAR: &str = "BAKERY_CONFIG";
pub const ENV_PREFIX: &str = "BAKERY_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read configuration: {0}")]
    Figment(#[from] figment::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    /// Mailbox size of every resource actor.
    pub channel_buffer: usize,
    /// Prefix of URLs handed out by the blob store.
    pub storage_base_url: String,
    pub status_policy: StatusPolicy,
    /// Used when `RUST_LOG` is not set.
    pub log_filter: String,
    pub pricing: PricingTable,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            channel_buffer: 32,
            storage_base_url: "memory://bakery-shop".to_string(),
            status_policy: StatusPolicy::default(),
            log_filter: "info".to_string(),
            pricing: PricingTable::default(),
        }
    }
}

impl ShopConfig {
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(ShopConfig::default()));
        if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]).split("__"))
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: ShopConfig = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_buffer == 0 {
            return Err(ConfigError::Invalid("channel_buffer must be at least 1".into()));
        }
        if self.storage_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_base_url is empty".into()));
        }
        if self.pricing.base_price < 0 {
            return Err(ConfigError::Invalid("pricing.base_price is negative".into()));
        }
        if let Some((size, _)) = self
            .pricing
            .size_multipliers
            .iter()
            .find(|(_, m)| !m.is_finite() || **m <= 0.0)
        {
            return Err(ConfigError::Invalid(format!("size multiplier for {:?} must be positive", size)));
        }
        let surcharges = [
            ("flavors", &self.pricing.flavors),
            ("frostings", &self.pricing.frostings),
            ("fillings", &self.pricing.fillings),
            ("decorations", &self.pricing.decorations),
        ];
        for (table, entries) in surcharges {
            if let Some((key, amount)) = entries.iter().find(|(_, amount)| **amount < 0) {
                return Err(ConfigError::Invalid(format!(
                    "pricing.{}.{} is negative ({})",
                    table, key, amount
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Figment {
        Figment::from(Serialized::defaults(ShopConfig::default()))
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ShopConfig::from_figment(defaults()).unwrap();
        assert_eq!(config, ShopConfig::default());
        assert_eq!(config.pricing.base_price, 8000);
        assert_eq!(config.status_policy, StatusPolicy::Unrestricted);
    }

    #[test]
    fn test_yaml_overrides_nested_pricing() {
        let yaml = r#"
status_policy: lifecycle
pricing:
  base_price: 9000
  flavors:
    pistachio: 900
"#;
        let config = ShopConfig::from_figment(defaults().merge(Yaml::string(yaml))).unwrap();
        assert_eq!(config.status_policy, StatusPolicy::Lifecycle);
        assert_eq!(config.pricing.base_price, 9000);
        assert_eq!(config.pricing.flavors.get("pistachio"), Some(&900));
        // Maps merge key by key.
        assert_eq!(config.pricing.flavors.get("chocolate"), Some(&500));
        assert_eq!(config.channel_buffer, 32);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let zero = defaults().merge(Serialized::default("channel_buffer", 0));
        assert!(matches!(ShopConfig::from_figment(zero), Err(ConfigError::Invalid(_))));

        let bad_policy = defaults().merge(Serialized::default("status_policy", "strict"));
        assert!(matches!(ShopConfig::from_figment(bad_policy), Err(ConfigError::Figment(_))));

        let yaml = "pricing:\n  size_multipliers:\n    6-inch: 0.0\n";
        let free_cake = defaults().merge(Yaml::string(yaml));
        assert!(matches!(ShopConfig::from_figment(free_cake), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_nan_multiplier_is_rejected() {
        let yaml = "pricing:\n  size_multipliers:\n    6-inch: .nan\n";
        let result = ShopConfig::from_figment(defaults().merge(Yaml::string(yaml)));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_negative_surcharge_is_rejected() {
        let yaml = "pricing:\n  frostings:\n    fondant: -1200\n";
        match ShopConfig::from_figment(defaults().merge(Yaml::string(yaml))) {
            Err(ConfigError::Invalid(msg)) => assert!(msg.contains("pricing.frostings.fondant")),
            other => panic!("Expected an invalid config, got {:?}", other),
        }
    }
}
