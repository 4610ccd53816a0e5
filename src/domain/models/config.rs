use regex::{Captures, Regex};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::warn;

use crate::infrastructure::logging::LogConfig;

/// Default directory holding migration files.
pub const DEFAULT_MIGRATIONS_PATH: &str = "./migrations";

/// Settings read from the deployment service definition plus plugin
/// settings.
///
/// Only the parts of the service file this crate uses are modelled; every
/// other key is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Provider section of the service file
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Custom section of the service file
    #[serde(default)]
    pub custom: CustomConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LogConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Environment the service is deployed with. Numbers and booleans are
    /// kept in their string form; nested values are dropped.
    #[serde(default, deserialize_with = "scalar_map")]
    pub environment: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomConfig {
    #[serde(
        rename = "migrationsPath",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub migrations_path: Option<PathBuf>,
}

impl Config {
    /// Process environment overlaid with the service environment.
    ///
    /// Service values win, mirroring how the deployment tool exports them
    /// into the process before running plugin commands. `${env:NAME}`
    /// references are filled in from the process environment; a value that
    /// still holds an unresolved `${...}` reference is skipped so the process
    /// value stands.
    pub fn environment_snapshot<I>(&self, process_environment: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut environment: HashMap<String, String> = process_environment.into_iter().collect();
        let service: Vec<(String, String)> = self
            .provider
            .environment
            .iter()
            .filter_map(|(key, value)| match resolve_variables(value, &environment) {
                Some(resolved) => Some((key.clone(), resolved)),
                None => {
                    warn!(
                        variable = %key,
                        "service environment value has an unresolved variable reference, ignoring it"
                    );
                    None
                }
            })
            .collect();
        environment.extend(service);
        environment
    }

    /// Migrations directory: the explicit path, then the service's
    /// `custom.migrationsPath`, then `./migrations`.
    pub fn migrations_path(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.custom.migrations_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MIGRATIONS_PATH))
    }
}

static ENV_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{env:([A-Za-z_][A-Za-z0-9_]*)\}").expect("env reference pattern is valid")
});

/// Substitute `${env:NAME}` from `process`. `None` when a reference names an
/// unset variable or another `${...}` source remains.
fn resolve_variables(value: &str, process: &HashMap<String, String>) -> Option<String> {
    let mut missing = false;
    let resolved = ENV_REFERENCE.replace_all(value, |caps: &Captures<'_>| {
        process.get(&caps[1]).cloned().unwrap_or_else(|| {
            missing = true;
            String::new()
        })
    });
    if missing || resolved.contains("${") {
        return None;
    }
    Some(resolved.into_owned())
}

fn scalar_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<String, serde_json::Value> = BTreeMap::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| {
            let value = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((key, value))
        })
        .collect())
}
