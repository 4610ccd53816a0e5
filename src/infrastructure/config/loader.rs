use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::domain::models::config::Config;
use crate::infrastructure::logging::parse_log_level;

/// Service definition read when no `--config` is given.
pub const DEFAULT_SERVICE_FILE: &str = "serverless.yml";

/// Prefix for environment overrides, e.g. `MIGRATIONS_LOGGING__LEVEL=debug`.
pub const ENV_PREFIX: &str = "MIGRATIONS_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Migrations path cannot be empty")]
    EmptyMigrationsPath,

    #[error("Log directory cannot be empty")]
    EmptyLogDirectory,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. Service definition file (`serverless.yml` unless overridden, optional)
    /// 3. Environment variables (MIGRATIONS_* prefix, `__` separates nested keys)
    pub fn load(service_file: Option<&Path>) -> Result<Config> {
        let path = service_file.unwrap_or_else(|| Path::new(DEFAULT_SERVICE_FILE));

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if parse_log_level(&config.logging.level).is_err() {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        if config
            .custom
            .migrations_path
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(ConfigError::EmptyMigrationsPath);
        }

        if config
            .logging
            .dir
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(ConfigError::EmptyLogDirectory);
        }

        Ok(())
    }
}

/// Process environment as UTF-8 pairs. Entries whose name or value is not
/// valid Unicode are skipped.
pub fn process_environment() -> Vec<(String, String)> {
    std::env::vars_os()
        .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, value)),
            (key, _) => {
                debug!(
                    variable = %key.unwrap_or_else(|k| k.to_string_lossy().into_owned()),
                    "skipping non-UTF-8 environment variable"
                );
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::logging::LogFormat;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    const LEVEL_OVERRIDE: &str = "MIGRATIONS_LOGGING__LEVEL";

    /// Loads with the level override unset; serialized against
    /// `test_env_override` through temp-env's lock.
    fn load_clean(path: &Path) -> Result<Config> {
        temp_env::with_var_unset(LEVEL_OVERRIDE, || ConfigLoader::load(Some(path)))
    }

    fn service_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert!(config.provider.environment.is_empty());
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_missing_service_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_clean(&dir.path().join("serverless.yml")).unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_service_file() {
        let file = service_file(
            "service: orders\nprovider:\n  environment:\n    DB_DIALECT: mysql\n    DB_PORT: 3306\ncustom:\n  migrationsPath: db/migrations\nlogging:\n  level: debug\n  format: json\n",
        );

        let config = load_clean(file.path()).unwrap();

        assert_eq!(config.provider.environment.get("DB_DIALECT").unwrap(), "mysql");
        assert_eq!(config.provider.environment.get("DB_PORT").unwrap(), "3306");
        assert_eq!(
            config.custom.migrations_path,
            Some(PathBuf::from("db/migrations"))
        );
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_env_override() {
        let file = service_file("logging:\n  level: warn\n");

        temp_env::with_var(LEVEL_OVERRIDE, Some("trace"), || {
            let config = ConfigLoader::load(Some(file.path())).unwrap();
            assert_eq!(config.logging.level, "trace", "Environment should win");
        });
    }

    #[test]
    fn test_load_rejects_invalid_log_level() {
        let file = service_file("logging:\n  level: loud\n");

        let err = load_clean(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid log level: loud"));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "invalid".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "invalid"),
            _ => panic!("Expected InvalidLogLevel error"),
        }
    }

    #[test]
    fn test_validate_empty_paths() {
        let mut config = Config::default();
        config.custom.migrations_path = Some(PathBuf::new());
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyMigrationsPath)
        ));

        let mut config = Config::default();
        config.logging.dir = Some(PathBuf::new());
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyLogDirectory)
        ));
    }

    #[test]
    fn test_hierarchical_merging() {
        let base_file = service_file("logging:\n  level: info\n  format: json\n");
        let override_file = service_file("logging:\n  level: debug\n");

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(base_file.path()))
            .merge(Yaml::file(override_file.path()))
            .extract()
            .unwrap();

        assert_eq!(config.logging.level, "debug", "Override should win for nested fields");
        assert_eq!(
            config.logging.format,
            LogFormat::Json,
            "Base value should persist when not overridden"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_process_environment_skips_non_unicode_values() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let invalid = OsStr::from_bytes(b"db\xff\xfehost");
        let environment = temp_env::with_vars(
            [
                ("SCRATCH_TEST_BAD_VALUE", Some(invalid)),
                ("SCRATCH_TEST_GOOD_VALUE", Some(OsStr::new("ok"))),
            ],
            process_environment,
        );

        assert!(!environment
            .iter()
            .any(|(key, _)| key == "SCRATCH_TEST_BAD_VALUE"));
        assert!(environment
            .iter()
            .any(|(key, value)| key == "SCRATCH_TEST_GOOD_VALUE" && value == "ok"));
    }
}
