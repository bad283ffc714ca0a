//! Layered configuration.
//!
//! Resolution order (lowest to highest priority):
//! 1. `sqlgate.yaml`
//! 2. `sqlgate-{profile}.yaml`
//! 3. `.env`, then `.env.{profile}` (loaded into the process environment,
//!    never overwriting variables that are already set)
//! 4. Environment variables: `DATASOURCE_HOST` overrides `datasource.host`
//!
//! String values may reference secrets with `${VAR}`, `${env:VAR}` or
//! `${file:/path}`; see [`SecretResolver`].
//!
//! Because of the environment-variable mapping, keys avoid underscores:
//!
//! ```yaml
//! datasource:
//!   driver: postgres
//!   host: localhost
//!   port: 5432
//!   user: app
//!   password: ${DB_PASSWORD}
//!   database: app
//!   params:
//!     sslmode: disable
//!   pool:
//!     maxopen: 20
//!     maxidle: 5
//!     maxlifetime: 1800
//! ```

mod loader;
pub mod secrets;
pub mod typed;
pub mod value;

use std::collections::HashMap;
use std::path::Path;

pub use secrets::{DefaultSecretResolver, SecretResolver};
pub use typed::ConfigProperties;
pub use value::{ConfigValue, FromConfigValue};

/// Environment variable selecting the active profile.
pub const PROFILE_ENV: &str = "SQLGATE_PROFILE";

/// Errors raised while loading or reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config key not found: {0}")]
    NotFound(String),

    #[error("config type mismatch for '{key}': expected {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    #[error("config load error: {0}")]
    Load(String),
}

/// Flattened key/value configuration with dot-separated keys.
#[derive(Debug, Clone)]
pub struct SqlgateConfig {
    values: HashMap<String, ConfigValue>,
    profile: String,
}

impl SqlgateConfig {
    /// Load configuration from the current working directory.
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        Self::load_from(Path::new("."), profile, &DefaultSecretResolver)
    }

    /// Load `sqlgate.yaml` and `sqlgate-{profile}.yaml` from `dir`, resolve
    /// placeholders with `resolver`, then overlay environment variables.
    pub fn load_from(
        dir: &Path,
        profile: &str,
        resolver: &dyn SecretResolver,
    ) -> Result<Self, ConfigError> {
        let active_profile = std::env::var(PROFILE_ENV).unwrap_or_else(|_| profile.to_string());
        let mut values = HashMap::new();

        loader::load_yaml_file(&dir.join("sqlgate.yaml"), &mut values)?;
        loader::load_yaml_file(&dir.join(format!("sqlgate-{active_profile}.yaml")), &mut values)?;

        let _ = dotenvy::from_path(dir.join(".env"));
        let _ = dotenvy::from_path(dir.join(format!(".env.{active_profile}")));

        resolve_string_values(&mut values, resolver)?;

        for (env_key, env_val) in std::env::vars() {
            let config_key = env_key.to_lowercase().replace('_', ".");
            values.insert(config_key, ConfigValue::String(env_val));
        }

        tracing::debug!(profile = %active_profile, keys = values.len(), "configuration loaded");
        Ok(SqlgateConfig {
            values,
            profile: active_profile,
        })
    }

    /// Create a config from a YAML string, without environment overlay.
    pub fn from_yaml_str(yaml: &str, profile: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        loader::load_yaml_str(yaml, &mut values)?;
        resolve_string_values(&mut values, &DefaultSecretResolver)?;
        Ok(SqlgateConfig {
            values,
            profile: profile.to_string(),
        })
    }

    pub fn empty() -> Self {
        SqlgateConfig {
            values: HashMap::new(),
            profile: "test".to_string(),
        }
    }

    pub fn set(&mut self, key: &str, value: ConfigValue) {
        self.values.insert(key.to_string(), value);
    }

    /// Get a typed value for the given dot-separated key.
    pub fn get<V: FromConfigValue>(&self, key: &str) -> Result<V, ConfigError> {
        let value = self
            .values
            .get(key)
            .ok_or_else(|| ConfigError::NotFound(key.to_string()))?;
        V::from_config_value(value, key)
    }

    /// Like [`get`](Self::get), but a missing key is `Ok(None)`.
    pub fn get_opt<V: FromConfigValue>(&self, key: &str) -> Result<Option<V>, ConfigError> {
        match self.values.get(key) {
            Some(value) => V::from_config_value(value, key).map(Some),
            None => Ok(None),
        }
    }

    pub fn get_or<V: FromConfigValue>(&self, key: &str, default: V) -> V {
        self.get(key).unwrap_or(default)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Direct children of `prefix` as strings (`prefix.x` → `x`).
    pub fn string_map(&self, prefix: &str) -> Result<HashMap<String, String>, ConfigError> {
        let lead = format!("{prefix}.");
        self.values
            .iter()
            .filter_map(|(key, value)| {
                let child = key.strip_prefix(&lead)?;
                (!child.contains('.')).then_some((key, child, value))
            })
            .map(|(key, child, value)| {
                Ok((child.to_string(), String::from_config_value(value, key)?))
            })
            .collect()
    }

    /// Build a typed section.
    pub fn section<C: ConfigProperties>(&self) -> Result<C, ConfigError> {
        C::from_config(self)
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }
}

fn resolve_string_values(
    values: &mut HashMap<String, ConfigValue>,
    resolver: &dyn SecretResolver,
) -> Result<(), ConfigError> {
    for value in values.values_mut() {
        if let ConfigValue::String(s) = value {
            if s.contains("${") {
                *s = secrets::resolve_placeholders(s, resolver)?;
            }
        }
    }
    Ok(())
}
