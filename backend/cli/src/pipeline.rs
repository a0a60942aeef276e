//! Wires engines, router, sink and source from the effective config.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use ocrflow_config::{EngineSlot, OcrflowConfig, SinkKind};
use ocrflow_core::{DocumentSource, EngineTier, LogSink};
use ocrflow_engines::{create_engine, EngineSpec};
use ocrflow_ingest::create_source;
use ocrflow_routing::OcrRouter;
use ocrflow_sink::{create_sink, SinkSpec};
use ocrflow_worker::Worker;
use tracing::info;

fn engine_spec(slot: &EngineSlot, tier: EngineTier) -> EngineSpec {
    EngineSpec {
        kind: slot.kind,
        tier,
        timeout: Duration::from_secs(slot.timeout_secs()),
        simulated_latency: slot.simulated_latency_ms.map(Duration::from_millis),
    }
}

pub fn build_router(config: &OcrflowConfig) -> OcrRouter {
    let light = create_engine(&engine_spec(&config.light_engine(), EngineTier::Light));
    let heavy = create_engine(&engine_spec(&config.heavy_engine(), EngineTier::Heavy));
    OcrRouter::new(light, heavy, config.threshold_mb())
}

fn sink_spec(config: &OcrflowConfig) -> Result<SinkSpec> {
    let kind = config.sink_kind();
    let path = config.sink_path().map(PathBuf::from);
    let spec = match (kind, path) {
        (SinkKind::Stdout, _) => SinkSpec::Stdout,
        (SinkKind::Memory, _) => SinkSpec::Memory,
        (SinkKind::Ndjson, Some(path)) => SinkSpec::Ndjson { path },
        (SinkKind::Sqlite, Some(path)) => SinkSpec::Sqlite {
            path,
            table: config.sink_table().to_string(),
        },
        (kind, None) => bail!("sink '{kind:?}' needs a path (--sink-path or sink.path)"),
    };
    Ok(spec)
}

pub fn build_sink(config: &OcrflowConfig) -> Result<Arc<dyn LogSink>> {
    let spec = sink_spec(config)?;
    let sink = create_sink(spec).context("Failed to open log sink")?;
    info!(sink = sink.name(), "Log sink ready");
    Ok(sink)
}

pub fn build_source(config: &OcrflowConfig) -> Arc<dyn DocumentSource> {
    create_source(config.manifest().map(PathBuf::from))
}

pub fn build_worker(config: &OcrflowConfig) -> Result<Worker> {
    Ok(Worker::new(
        build_source(config),
        build_router(config),
        build_sink(config)?,
    ))
}
