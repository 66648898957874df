use crate::{env_or_default, ConfigError, FromEnv};

/// Business-rule ceilings for the todo services.
///
/// Read once at startup and injected into the service constructors; the
/// services never consult the environment themselves.
#[derive(Clone, Copy, Debug)]
pub struct LimitsConfig {
    /// Maximum number of projects that may exist at once
    pub max_projects: usize,
    /// Maximum number of tasks per project
    pub max_tasks: usize,
}

impl FromEnv for LimitsConfig {
    /// Reads from environment variables with sensible defaults:
    /// - MAX_PROJECTS: defaults to 10
    /// - MAX_TASKS: defaults to 100 (per project)
    fn from_env() -> Result<Self, ConfigError> {
        let max_projects = env_or_default("MAX_PROJECTS", "10").parse().map_err(|e| {
            ConfigError::ParseError {
                key: "MAX_PROJECTS".to_string(),
                details: format!("{}", e),
            }
        })?;

        let max_tasks = env_or_default("MAX_TASKS", "100").parse().map_err(|e| {
            ConfigError::ParseError {
                key: "MAX_TASKS".to_string(),
                details: format!("{}", e),
            }
        })?;

        Ok(Self {
            max_projects,
            max_tasks,
        })
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_projects: 10,
            max_tasks: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_config_defaults() {
        temp_env::with_vars(
            [("MAX_PROJECTS", None::<&str>), ("MAX_TASKS", None::<&str>)],
            || {
                let config = LimitsConfig::from_env().unwrap();
                assert_eq!(config.max_projects, 10);
                assert_eq!(config.max_tasks, 100);
            },
        );
    }

    #[test]
    fn test_limits_config_custom_values() {
        temp_env::with_vars(
            [("MAX_PROJECTS", Some("3")), ("MAX_TASKS", Some("25"))],
            || {
                let config = LimitsConfig::from_env().unwrap();
                assert_eq!(config.max_projects, 3);
                assert_eq!(config.max_tasks, 25);
            },
        );
    }

    #[test]
    fn test_limits_config_invalid_value() {
        temp_env::with_var("MAX_PROJECTS", Some("lots"), || {
            let result = LimitsConfig::from_env();
            assert!(result.is_err());
            let err = result.unwrap_err();
            assert!(err.to_string().contains("MAX_PROJECTS"));
        });
    }
}
