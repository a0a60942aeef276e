//! Config file location and loading.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the ocrflow config directory.
/// Priority: `OCRFLOW_CONFIG_DIR` env > `~/.ocrflow/` > `./.ocrflow`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("OCRFLOW_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".ocrflow"),
        None => PathBuf::from(".ocrflow"),
    }
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Load the raw config tree from disk.
///
/// The tree is untyped so `${VAR}` references can be resolved before any
/// field is checked. A missing file is an empty tree (first run).
pub async fn load_config(path: &Path) -> Result<Value> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(empty());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let value = parse_config(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(value)
}

/// Parse YAML text into a raw tree; an empty document is an empty tree.
pub fn parse_config(raw: &str) -> Result<Value> {
    if raw.trim().is_empty() {
        return Ok(empty());
    }
    match serde_yaml::from_str::<Value>(raw)? {
        Value::Null => Ok(empty()),
        value @ Value::Object(_) => Ok(value),
        other => anyhow::bail!("config must be a mapping, got: {other}"),
    }
}

fn empty() -> Value {
    Value::Object(Map::new())
}
