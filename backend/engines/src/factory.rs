use std::sync::Arc;
use std::time::Duration;

use ocrflow_core::{EngineKind, EngineTier, OcrEngine};

use crate::deadline::Deadline;
use crate::gcp::GcpOcrEngine;
use crate::tesseract::TesseractEngine;

/// Everything needed to build one engine slot.
#[derive(Debug, Clone)]
pub struct EngineSpec {
    pub kind: EngineKind,
    pub tier: EngineTier,
    pub timeout: Duration,
    /// Overrides the backend's built-in simulated latency.
    pub simulated_latency: Option<Duration>,
}

impl EngineSpec {
    pub fn new(kind: EngineKind, tier: EngineTier) -> Self {
        Self {
            kind,
            tier,
            timeout: Duration::from_secs(30),
            simulated_latency: None,
        }
    }
}

pub fn create_engine(spec: &EngineSpec) -> Arc<dyn OcrEngine> {
    match spec.kind {
        EngineKind::Tesseract => {
            let mut engine = TesseractEngine::new().with_tier(spec.tier);
            if let Some(latency) = spec.simulated_latency {
                engine = engine.with_latency(latency);
            }
            Arc::new(Deadline::new(engine, spec.timeout))
        }
        EngineKind::GcpOcr => {
            let mut engine = GcpOcrEngine::new().with_tier(spec.tier);
            if let Some(latency) = spec.simulated_latency {
                engine = engine.with_latency(latency);
            }
            Arc::new(Deadline::new(engine, spec.timeout))
        }
    }
}
