//! Selection configuration loading
//!
//! Sources, later ones overriding earlier ones:
//! 1. built-in defaults
//! 2. an optional `constellation.{toml,json,yaml}` file
//! 3. `CONSTELLATION__*` environment variables (a `.env` file is honoured),
//!    e.g. `CONSTELLATION__PRIORITY__URGENCY=0.5` or
//!    `CONSTELLATION__MAX_ACTIVE=4`

use constellation_common::ConfigError;
use tracing::debug;

use crate::SelectionConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "CONSTELLATION";

/// Default configuration file stem
pub const DEFAULT_CONFIG_FILE: &str = "constellation";

impl SelectionConfig {
    /// Load configuration from the default file and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration from `file_stem` and the environment
    pub fn load_from(file_stem: &str) -> Result<Self, ConfigError> {
        // Try to load .env file
        let _ = dotenvy::dotenv();

        let settings = config::Config::builder()
            .add_source(config::File::with_name(file_stem).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        let cfg: SelectionConfig = settings
            .try_deserialize()
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        cfg.validate()?;
        debug!(?cfg, "Loaded selection configuration");
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_applies_environment_overrides() {
        std::env::set_var("CONSTELLATION__MAX_ACTIVE", "4");
        std::env::set_var("CONSTELLATION__PRIORITY__URGENCY", "0.6");

        let cfg = SelectionConfig::load_from("does-not-exist").unwrap();
        assert_eq!(cfg.max_active, 4);
        assert!((cfg.priority.urgency - 0.6).abs() < 1e-9);
        // Untouched fields keep their defaults
        assert!((cfg.priority.capacity - 0.35).abs() < 1e-9);
        assert_eq!(cfg.max_per_category, crate::DEFAULT_MAX_PER_CATEGORY);

        std::env::remove_var("CONSTELLATION__MAX_ACTIVE");
        std::env::remove_var("CONSTELLATION__PRIORITY__URGENCY");
    }
}
