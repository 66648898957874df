use core_config::{AppInfo, FromEnv, app_info, limits::LimitsConfig, server::ServerConfig};

// Import the database config from the database library
use database::postgres::PostgresConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `core_config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub limits: LimitsConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // Required - will fail if DATABASE_URL not set
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let limits = LimitsConfig::from_env()?; // Uses defaults: MAX_PROJECTS=10, MAX_TASKS=100

        Ok(Self {
            app: app_info!(),
            database,
            server,
            limits,
            environment,
        })
    }
}
