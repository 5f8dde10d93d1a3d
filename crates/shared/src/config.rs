//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Ledger defaults applied when seeding an entity.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

/// Ledger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Display name of the seeded entity.
    #[serde(default = "default_entity_name")]
    pub entity_name: String,
    /// ISO 4217 code of the entity's reporting currency.
    #[serde(default = "default_reporting_currency")]
    pub reporting_currency: String,
    /// Decimal places of the reporting currency.
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
}

fn default_entity_name() -> String {
    "Folio Demo Ltd".to_string()
}

fn default_reporting_currency() -> String {
    "USD".to_string()
}

fn default_decimal_places() -> u32 {
    2
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            entity_name: default_entity_name(),
            reporting_currency: default_reporting_currency(),
            decimal_places: default_decimal_places(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "folio=info,seeder=info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("FOLIO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_sources() {
        temp_env::with_vars_unset(
            ["FOLIO__LEDGER__REPORTING_CURRENCY", "FOLIO__LOG__FILTER"],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.ledger.reporting_currency, "USD");
                assert_eq!(config.ledger.decimal_places, 2);
                assert_eq!(config.log.filter, "folio=info,seeder=info");
            },
        );
    }

    #[test]
    fn test_environment_overrides() {
        temp_env::with_vars(
            [
                ("FOLIO__LEDGER__REPORTING_CURRENCY", Some("KES")),
                ("FOLIO__LOG__FILTER", Some("folio=debug")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.ledger.reporting_currency, "KES");
                assert_eq!(config.log.filter, "folio=debug");
                assert_eq!(config.ledger.entity_name, "Folio Demo Ltd");
            },
        );
    }
}
