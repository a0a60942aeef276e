//! Heavy-tier engine standing in for GCP Vision / Document AI.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use ocrflow_core::{EngineKind, EngineTier, OcrEngine, OcrError, OcrOutcome};
use tracing::{info, warn};

use crate::content::ensure_readable;

/// Round-trip latency of the simulated cloud call.
pub const DEFAULT_GCP_LATENCY: Duration = Duration::from_millis(200);

pub struct GcpOcrEngine {
    tier: EngineTier,
    simulated_latency: Duration,
}

impl GcpOcrEngine {
    pub fn new() -> Self {
        Self {
            tier: EngineTier::Heavy,
            simulated_latency: DEFAULT_GCP_LATENCY,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.simulated_latency = latency;
        self
    }

    pub fn with_tier(mut self, tier: EngineTier) -> Self {
        self.tier = tier;
        self
    }

    async fn extract(&self, location: &str) -> Result<String, OcrError> {
        // A real client would upload the bytes for document_text_detection.
        ensure_readable(self.kind().as_str(), location).await?;
        tokio::time::sleep(self.simulated_latency).await;
        Ok(format!("[GCP OCR] Simulated OCR text from: {location}"))
    }
}

impl Default for GcpOcrEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OcrEngine for GcpOcrEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::GcpOcr
    }

    fn tier(&self) -> EngineTier {
        self.tier
    }

    async fn run(&self, location: &str) -> OcrOutcome {
        let start = Instant::now();
        info!("[OCR/GCP] Extracting {}", location);
        match self.extract(location).await {
            Ok(text) => OcrOutcome::success(self.kind(), text, start.elapsed()),
            Err(e) => {
                warn!(error = %e, "[OCR/GCP] Extraction failed");
                OcrOutcome::failure(self.kind(), e.to_string(), start.elapsed())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn runtime_includes_simulated_latency() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let location = file.path().to_str().unwrap();

        let engine = GcpOcrEngine::new().with_latency(Duration::from_millis(30));
        let outcome = engine.run(location).await;
        assert!(outcome.is_success(), "{:?}", outcome.error());
        assert_eq!(outcome.engine(), EngineKind::GcpOcr);
        assert!(outcome.runtime() >= Duration::from_millis(30));
        assert!(outcome.text().starts_with("[GCP OCR]"));
    }

    #[tokio::test]
    async fn directory_is_not_readable_content() {
        let dir = tempfile::tempdir().unwrap();
        let engine = GcpOcrEngine::new().with_latency(Duration::ZERO);
        let outcome = engine.run(dir.path().to_str().unwrap()).await;
        assert!(!outcome.is_success());
        assert!(outcome.error().unwrap().contains("not a regular file"));
    }
}
