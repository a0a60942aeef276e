//! ocrflow configuration schema, typed for serde YAML/JSON deserialization.
//!
//! Every field is optional in the file; `defaults::apply_all_defaults` fills
//! the gaps and the accessor methods fall back to the same defaults.

use ocrflow_core::EngineKind;
use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::defaults::{
    DEFAULT_HEAVY_LATENCY_MS, DEFAULT_LIGHT_LATENCY_MS, DEFAULT_LOG_LEVEL, DEFAULT_SINK_TABLE,
    DEFAULT_THRESHOLD_MB, DEFAULT_TIMEOUT_SECS,
};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OcrflowConfig {
    /// Engine selection threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing: Option<RoutingConfig>,

    /// Light and heavy engine slots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engines: Option<EnginesConfig>,

    /// Where the batch comes from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingest: Option<IngestConfig>,

    /// Where log records go
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sink: Option<SinkConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

impl OcrflowConfig {
    pub fn threshold_mb(&self) -> f64 {
        self.routing
            .as_ref()
            .and_then(|r| r.threshold_mb)
            .unwrap_or(DEFAULT_THRESHOLD_MB)
    }

    pub fn light_engine(&self) -> EngineSlot {
        self.engines
            .as_ref()
            .and_then(|e| e.light.clone())
            .unwrap_or_else(EngineSlot::default_light)
    }

    pub fn heavy_engine(&self) -> EngineSlot {
        self.engines
            .as_ref()
            .and_then(|e| e.heavy.clone())
            .unwrap_or_else(EngineSlot::default_heavy)
    }

    pub fn manifest(&self) -> Option<&str> {
        self.ingest.as_ref().and_then(|i| i.manifest.as_deref())
    }

    pub fn sink_kind(&self) -> SinkKind {
        self.sink.as_ref().and_then(|s| s.kind).unwrap_or_default()
    }

    pub fn sink_path(&self) -> Option<&str> {
        self.sink.as_ref().and_then(|s| s.path.as_deref())
    }

    pub fn sink_table(&self) -> &str {
        self.sink
            .as_ref()
            .and_then(|s| s.table.as_deref())
            .unwrap_or(DEFAULT_SINK_TABLE)
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.dir.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoutingConfig {
    /// Documents whose signal is below this go to the light engine (MiB).
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "number_or_string"
    )]
    pub threshold_mb: Option<f64>,
}

// ---------------------------------------------------------------------------
// Engines
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnginesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light: Option<EngineSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heavy: Option<EngineSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EngineSlot {
    pub kind: EngineKind,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "number_or_string"
    )]
    pub timeout_secs: Option<u64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "number_or_string"
    )]
    pub simulated_latency_ms: Option<u64>,
}

impl EngineSlot {
    pub fn default_light() -> Self {
        Self {
            kind: EngineKind::Tesseract,
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            simulated_latency_ms: Some(DEFAULT_LIGHT_LATENCY_MS),
        }
    }

    pub fn default_heavy() -> Self {
        Self {
            kind: EngineKind::GcpOcr,
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            simulated_latency_ms: Some(DEFAULT_HEAVY_LATENCY_MS),
        }
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }
}

// ---------------------------------------------------------------------------
// Ingest
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IngestConfig {
    /// JSON/NDJSON manifest of documents; the demo batch is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<String>,
}

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    #[default]
    Stdout,
    Ndjson,
    Sqlite,
    Memory,
}

impl SinkKind {
    pub fn needs_path(&self) -> bool {
        matches!(self, Self::Ndjson | Self::Sqlite)
    }
}

impl std::str::FromStr for SinkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdout" => Ok(Self::Stdout),
            "ndjson" => Ok(Self::Ndjson),
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            other => Err(format!(
                "unknown sink '{other}'. Use 'stdout', 'ndjson', 'sqlite', or 'memory'"
            )),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SinkConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SinkKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for rolling JSON log files; console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

// ---------------------------------------------------------------------------
// Numeric fields
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString<T> {
    Number(T),
    String(String),
}

/// Numeric fields also accept strings, which is what `${VAR}` substitution
/// leaves behind (`thresholdMb: ${OCR_THRESHOLD}`).
fn number_or_string<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    match Option::<NumberOrString<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("expected a number, got '{s}': {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_yaml() {
        let yaml = r#"
routing:
  thresholdMb: 2.5
engines:
  light: { kind: tesseract, timeoutSecs: 10 }
  heavy: { kind: gcp_ocr, simulatedLatencyMs: 50 }
sink:
  kind: sqlite
  path: /var/lib/ocrflow/logs.db
logging:
  level: debug
"#;
        let cfg: OcrflowConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.threshold_mb(), 2.5);
        assert_eq!(cfg.light_engine().timeout_secs(), 10);
        assert_eq!(cfg.heavy_engine().kind, EngineKind::GcpOcr);
        assert_eq!(cfg.heavy_engine().simulated_latency_ms, Some(50));
        assert_eq!(cfg.sink_kind(), SinkKind::Sqlite);
        assert_eq!(cfg.sink_path(), Some("/var/lib/ocrflow/logs.db"));
        assert_eq!(cfg.sink_table(), DEFAULT_SINK_TABLE);
        assert_eq!(cfg.log_level(), "debug");
    }

    #[test]
    fn empty_config_falls_back_to_defaults() {
        let cfg = OcrflowConfig::default();
        assert_eq!(cfg.threshold_mb(), DEFAULT_THRESHOLD_MB);
        assert_eq!(cfg.light_engine().kind, EngineKind::Tesseract);
        assert_eq!(cfg.sink_kind(), SinkKind::Stdout);
        assert!(cfg.manifest().is_none());
    }

    #[test]
    fn numeric_fields_accept_numeric_strings() {
        let yaml = "routing:\n  thresholdMb: \"2.5\"\nengines:\n  heavy: { kind: gcp_ocr, timeoutSecs: \" 12 \" }\n";
        let cfg: OcrflowConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.threshold_mb(), 2.5);
        assert_eq!(cfg.heavy_engine().timeout_secs(), 12);

        let err = serde_yaml::from_str::<OcrflowConfig>("routing:\n  thresholdMb: lots\n")
            .unwrap_err()
            .to_string();
        assert!(err.contains("lots"), "{err}");
    }

    #[test]
    fn sink_kind_from_str() {
        assert_eq!("SQLite".parse::<SinkKind>().unwrap(), SinkKind::Sqlite);
        assert!("bigquery".parse::<SinkKind>().is_err());
    }
}
