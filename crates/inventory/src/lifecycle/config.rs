//! # Configuration
//!
//! Layered with figment: built-in defaults, then `inventory.toml` in the working directory
//! (optional), then `INVENTORY_`-prefixed environment variables.
//!
//! ```toml
//! store_buffer = 64
//! log_filter = "inventory=debug,service_proxy=info"
//! ```

use super::LifecycleError;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Channel capacity of each store actor. Must be at least 1.
    pub store_buffer: usize,
    /// Tracing filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            store_buffer: 32,
            log_filter: "info".to_string(),
        }
    }
}

impl SystemConfig {
    pub const FILE: &'static str = "inventory.toml";
    pub const ENV_PREFIX: &'static str = "INVENTORY_";

    /// Load from the standard sources and validate.
    pub fn load() -> Result<Self, LifecycleError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(Self::FILE))
            .merge(Env::prefixed(Self::ENV_PREFIX))
    }

    pub fn validate(&self) -> Result<(), LifecycleError> {
        if self.store_buffer == 0 {
            return Err(LifecycleError::InvalidConfig(
                "store_buffer must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_apply_without_sources() {
        Jail::expect_with(|_jail| {
            let config = SystemConfig::load().unwrap();
            assert_eq!(config, SystemConfig::default());
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                SystemConfig::FILE,
                r#"
                store_buffer = 8
                log_filter = "debug"
                "#,
            )?;
            jail.set_env("INVENTORY_STORE_BUFFER", "4");

            let config = SystemConfig::load().unwrap();
            assert_eq!(config.store_buffer, 4);
            assert_eq!(config.log_filter, "debug");
            Ok(())
        });
    }

    #[test]
    fn zero_buffer_is_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("INVENTORY_STORE_BUFFER", "0");
            assert!(matches!(
                SystemConfig::load(),
                Err(LifecycleError::InvalidConfig(_))
            ));
            Ok(())
        });
    }
}
