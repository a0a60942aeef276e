//! Config defaults: applies default values to parsed config.

use crate::schema::{
    EngineSlot, EnginesConfig, LoggingConfig, OcrflowConfig, RoutingConfig, SinkConfig, SinkKind,
};

/// Signal threshold between the light and heavy tier, in MiB.
pub const DEFAULT_THRESHOLD_MB: f64 = 1.0;

/// Per-call deadline for either engine.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_LIGHT_LATENCY_MS: u64 = 0;

pub const DEFAULT_HEAVY_LATENCY_MS: u64 = 200;

pub const DEFAULT_SINK_TABLE: &str = "ocr_logs";

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: OcrflowConfig) -> OcrflowConfig {
    let config = apply_routing_defaults(config);
    let config = apply_engine_defaults(config);
    let config = apply_sink_defaults(config);
    apply_logging_defaults(config)
}

fn apply_routing_defaults(mut config: OcrflowConfig) -> OcrflowConfig {
    let routing = config.routing.get_or_insert_with(RoutingConfig::default);
    if routing.threshold_mb.is_none() {
        routing.threshold_mb = Some(DEFAULT_THRESHOLD_MB);
    }
    config
}

/// Fill both engine slots, then any missing timeout/latency within a slot.
fn apply_engine_defaults(mut config: OcrflowConfig) -> OcrflowConfig {
    let engines = config.engines.get_or_insert_with(EnginesConfig::default);
    let light = engines.light.get_or_insert_with(EngineSlot::default_light);
    fill_slot(light, DEFAULT_LIGHT_LATENCY_MS);
    let heavy = engines.heavy.get_or_insert_with(EngineSlot::default_heavy);
    fill_slot(heavy, DEFAULT_HEAVY_LATENCY_MS);
    config
}

fn fill_slot(slot: &mut EngineSlot, latency_ms: u64) {
    if slot.timeout_secs.is_none() {
        slot.timeout_secs = Some(DEFAULT_TIMEOUT_SECS);
    }
    if slot.simulated_latency_ms.is_none() {
        slot.simulated_latency_ms = Some(latency_ms);
    }
}

fn apply_sink_defaults(mut config: OcrflowConfig) -> OcrflowConfig {
    let sink = config.sink.get_or_insert_with(SinkConfig::default);
    if sink.kind.is_none() {
        sink.kind = Some(SinkKind::Stdout);
    }
    if sink.table.is_none() {
        sink.table = Some(DEFAULT_SINK_TABLE.to_string());
    }
    config
}

fn apply_logging_defaults(mut config: OcrflowConfig) -> OcrflowConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    config
}
