//! Configuration for the autoclose worker

use core_config::{FromEnv, env_or_default, limits::LimitsConfig};
use database::postgres::PostgresConfig;
use eyre::Result;

/// Default sweep interval when a fresh job is registered (15 minutes)
const DEFAULT_INTERVAL_SECS: u64 = 900;

#[derive(Debug, Clone)]
pub struct Config {
    pub database: PostgresConfig,
    pub limits: LimitsConfig,
    /// Interval used when the job has no persisted entry yet
    pub autoclose_interval_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let database = PostgresConfig::from_env()?;
        let limits = LimitsConfig::from_env()?;

        let autoclose_interval_secs = env_or_default(
            "AUTOCLOSE_INTERVAL_SECS",
            &DEFAULT_INTERVAL_SECS.to_string(),
        )
        .parse()
        .map_err(|e| eyre::eyre!("Failed to parse AUTOCLOSE_INTERVAL_SECS: {}", e))?;

        Ok(Self {
            database,
            limits,
            autoclose_interval_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_defaults_to_fifteen_minutes() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgresql://localhost/testdb")),
                ("AUTOCLOSE_INTERVAL_SECS", None::<&str>),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.autoclose_interval_secs, 900);
            },
        );
    }

    #[test]
    fn test_interval_override() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgresql://localhost/testdb")),
                ("AUTOCLOSE_INTERVAL_SECS", Some("60")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.autoclose_interval_secs, 60);
            },
        );
    }

    #[test]
    fn test_invalid_interval_fails() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgresql://localhost/testdb")),
                ("AUTOCLOSE_INTERVAL_SECS", Some("soon")),
            ],
            || {
                assert!(Config::from_env().is_err());
            },
        );
    }
}
