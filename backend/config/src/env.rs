//! Environment variable substitution and overrides for config values.
//!
//! `${VAR_NAME}` references in string values are resolved at load time.
//! Only uppercase `[A-Z_][A-Z0-9_]*` names are matched; `$${VAR}` escapes to a
//! literal `${VAR}`.

use std::collections::HashMap;

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use tracing::debug;

use crate::schema::{IngestConfig, LoggingConfig, OcrflowConfig, RoutingConfig, SinkConfig};

/// `$${VAR}` (escaped) or `${VAR}` (reference).
static ENV_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(\$)?\{([A-Z_][A-Z0-9_]*)\}").unwrap());

pub const ENV_THRESHOLD_MB: &str = "OCRFLOW_THRESHOLD_MB";
pub const ENV_SINK: &str = "OCRFLOW_SINK";
pub const ENV_SINK_PATH: &str = "OCRFLOW_SINK_PATH";
pub const ENV_MANIFEST: &str = "OCRFLOW_MANIFEST";
pub const ENV_LOG_LEVEL: &str = "RUST_LOG";

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references across a config value tree.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute(value, env, "")
}

fn substitute(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| substitute(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                let child = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                out.insert(k.clone(), substitute(v, env, &child)?);
            }
            Ok(Value::Object(out))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let result = ENV_REF.replace_all(s, |caps: &Captures| {
        let name = &caps[2];
        if caps.get(1).is_some() {
            return format!("${{{name}}}");
        }
        match env.get(name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = missing {
        bail!(err);
    }
    Ok(result.into_owned())
}

/// Apply `OCRFLOW_*` (and `RUST_LOG`) overrides from `env`.
pub fn apply_env_overrides_with(
    mut config: OcrflowConfig,
    env: &HashMap<String, String>,
) -> Result<OcrflowConfig> {
    let get = |key: &str| env.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

    if let Some(raw) = get(ENV_THRESHOLD_MB) {
        let threshold: f64 = match raw.parse() {
            Ok(t) => t,
            Err(_) => bail!("{ENV_THRESHOLD_MB} must be a number, got '{raw}'"),
        };
        config
            .routing
            .get_or_insert_with(RoutingConfig::default)
            .threshold_mb = Some(threshold);
        debug!(threshold, "Threshold overridden from environment");
    }

    if let Some(raw) = get(ENV_SINK) {
        let kind = raw.parse().map_err(anyhow::Error::msg)?;
        config.sink.get_or_insert_with(SinkConfig::default).kind = Some(kind);
    }

    if let Some(path) = get(ENV_SINK_PATH) {
        config.sink.get_or_insert_with(SinkConfig::default).path = Some(path.to_string());
    }

    if let Some(path) = get(ENV_MANIFEST) {
        config.ingest.get_or_insert_with(IngestConfig::default).manifest = Some(path.to_string());
    }

    if let Some(level) = get(ENV_LOG_LEVEL) {
        config.logging.get_or_insert_with(LoggingConfig::default).level = Some(level.to_string());
    }

    Ok(config)
}
