//! Config validation: deep schema checks with user-friendly error messages.

use ocrflow_core::EngineTier;
use thiserror::Error;

use crate::schema::{EngineSlot, OcrflowConfig};

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &OcrflowConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_routing(config, &mut report);
    validate_engines(config, &mut report);
    validate_sink(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_routing(config: &OcrflowConfig, report: &mut ValidationReport) {
    let threshold = config.threshold_mb();
    if !threshold.is_finite() || threshold <= 0.0 {
        report.error(
            "routing.thresholdMb",
            format!("threshold must be a positive number, got {threshold}"),
        );
    }
}

fn validate_engines(config: &OcrflowConfig, report: &mut ValidationReport) {
    check_slot(&config.light_engine(), EngineTier::Light, "engines.light", report);
    check_slot(&config.heavy_engine(), EngineTier::Heavy, "engines.heavy", report);
}

fn check_slot(slot: &EngineSlot, tier: EngineTier, path: &str, report: &mut ValidationReport) {
    if slot.timeout_secs() == 0 {
        report.error(format!("{path}.timeoutSecs"), "timeoutSecs must be >= 1");
    }
    if slot.kind.natural_tier() != tier {
        report.warn(
            format!("{path}.kind"),
            format!("'{}' is normally a {} engine", slot.kind, slot.kind.natural_tier()),
        );
    }
    if let Some(latency) = slot.simulated_latency_ms {
        if latency / 1000 >= slot.timeout_secs() {
            report.warn(
                format!("{path}.simulatedLatencyMs"),
                "simulated latency exceeds the timeout; every call will time out",
            );
        }
    }
}

fn validate_sink(config: &OcrflowConfig, report: &mut ValidationReport) {
    let kind = config.sink_kind();
    if kind.needs_path() && config.sink_path().map(str::trim).unwrap_or("").is_empty() {
        report.error("sink.path", format!("a path is required for the {kind:?} sink"));
    }
    if !is_identifier(config.sink_table()) {
        report.error(
            "sink.table",
            format!("'{}' is not a valid table name", config.sink_table()),
        );
    }
}

fn validate_logging(config: &OcrflowConfig, report: &mut ValidationReport) {
    let level = config.log_level();
    // RUST_LOG-style directives (`ocrflow=debug,info`) are passed through as-is.
    if !level.contains('=')
        && !matches!(
            level.to_ascii_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "error" | "off"
        )
    {
        report.warn("logging.level", format!("unknown log level '{level}'"));
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
