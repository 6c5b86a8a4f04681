use std::path::{Path, PathBuf};

use thiserror::Error;

use super::models::AppConfig;
use super::{pagechain_home, Env};

const CONFIG_FILENAME: &str = "config.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// `<home>/config.yaml`
pub fn default_config_path(env: &dyn Env) -> PathBuf {
    pagechain_home(env).join(CONFIG_FILENAME)
}

/// Load the config file over the defaults.
///
/// An explicit path must exist. Without one, a missing default file means
/// plain defaults.
pub fn load(env: &dyn Env, explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let p = default_config_path(env);
            if !p.exists() {
                return Ok(AppConfig::default());
            }
            p
        }
    };

    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }

    let over: serde_json::Value =
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;

    let base = serde_json::to_value(AppConfig::default()).unwrap_or_default();
    let merged = deep_merge(base, over);

    let config = serde_json::from_value(merged)
        .map_err(|source| ConfigError::Invalid { path: path.clone(), source })?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Values present in `over` replace those in `base`, objects merge key by
/// key, nulls keep the base.
fn deep_merge(base: serde_json::Value, over: serde_json::Value) -> serde_json::Value {
    use serde_json::Value;

    match (base, over) {
        (Value::Object(mut b), Value::Object(o)) => {
            for (key, over_val) in o {
                let base_val = b.remove(&key).unwrap_or(Value::Null);
                b.insert(key, deep_merge(base_val, over_val));
            }
            Value::Object(b)
        }
        (base, Value::Null) => base,
        (_, over) => over,
    }
}
