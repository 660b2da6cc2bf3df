use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use vigil_gate::GateConfig;
use vigil_gate::config::DEFAULT_MAX_RETRIES;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
pub const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VigilConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    #[serde(flatten)]
    pub gate: GateConfig,
    /// Alternate instrument registry, as JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<PathBuf>,
}

impl Default for VigilConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            gate: GateConfig::default(),
            registry: None,
        }
    }
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("vigil"))
}

pub fn default_config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Load from `explicit` if given (it must exist), else from the platform
/// config dir. A missing default file yields the defaults.
pub fn load_config(explicit: Option<&Path>) -> eyre::Result<VigilConfig> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let path = default_config_path()?;
            if !path.exists() {
                tracing::debug!(path = %path.display(), "no config file; using defaults");
                return Ok(VigilConfig::default());
            }
            path
        }
    };
    let contents = std::fs::read_to_string(&path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;
    let config = parse_config(&contents)?;
    tracing::info!(path = %path.display(), version = config.config_version, "config loaded");
    Ok(config)
}

/// Parse config JSON, running migrations before deserializing.
pub fn parse_config(contents: &str) -> eyre::Result<VigilConfig> {
    let json: serde_json::Value = serde_json::from_str(contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: VigilConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
/// Each migration is a pure transform on the raw JSON value.
pub fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update vigil."
        ));
    }

    // v0 → v1: retry budget became configurable
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.entry("max_retries")
            .or_insert(serde_json::Value::Number(DEFAULT_MAX_RETRIES.into()));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (added max_retries)");
    }

    Ok(json)
}
