//! `ocrflow-config` — runtime configuration for the OCR pipeline.
//!
//! Provides:
//! - Typed config schema (routing, engines, ingest, sink, logging)
//! - YAML loading with defaults for a missing file
//! - `${ENV_VAR}` substitution and `OCRFLOW_*` overrides
//! - Default value application
//! - Validation and redaction for safe display

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use defaults::apply_all_defaults;
pub use env::{apply_env_overrides_with, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config, parse_config};
pub use redact::{collect_redacted_paths, redact};
pub use schema::{
    EngineSlot, EnginesConfig, IngestConfig, LoggingConfig, OcrflowConfig, RoutingConfig,
    SinkConfig, SinkKind,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Load, substitute env vars, apply overrides and defaults, then validate.
///
/// This is the main entry point for loading a config at runtime.
pub async fn load_and_prepare(path: &Path) -> Result<(OcrflowConfig, ValidationReport)> {
    let raw = load_config(path).await?;
    prepare(raw, &std::env::vars().collect())
}

/// The processing pipeline behind [`load_and_prepare`], with an explicit env.
///
/// `raw` is the untyped tree from [`load_config`] or [`parse_config`];
/// references are resolved before it is deserialized.
pub fn prepare(
    raw: Value,
    env: &HashMap<String, String>,
) -> Result<(OcrflowConfig, ValidationReport)> {
    let value = resolve_env_vars_with(&raw, env).context("Failed to resolve env vars in config")?;
    let config: OcrflowConfig =
        serde_json::from_value(value).context("Failed to deserialize config")?;

    let config = apply_env_overrides_with(config, env)?;
    let config = apply_all_defaults(config);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }

    Ok((config, report))
}
