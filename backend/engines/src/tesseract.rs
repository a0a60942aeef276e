//! Light-tier engine standing in for a local Tesseract install.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use ocrflow_core::{EngineKind, EngineTier, OcrEngine, OcrError, OcrOutcome};
use tracing::{info, warn};

use crate::content::ensure_readable;

pub struct TesseractEngine {
    tier: EngineTier,
    simulated_latency: Duration,
}

impl TesseractEngine {
    pub fn new() -> Self {
        Self {
            tier: EngineTier::Light,
            simulated_latency: Duration::ZERO,
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
        // A real backend would rasterize the page and call image_to_string.
        ensure_readable(self.kind().as_str(), location).await?;
        if !self.simulated_latency.is_zero() {
            tokio::time::sleep(self.simulated_latency).await;
        }
        Ok(format!("[Tesseract] Simulated OCR text from: {location}"))
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Tesseract
    }

    fn tier(&self) -> EngineTier {
        self.tier
    }

    async fn run(&self, location: &str) -> OcrOutcome {
        let start = Instant::now();
        info!("[OCR/Tesseract] Extracting {}", location);
        match self.extract(location).await {
            Ok(text) => OcrOutcome::success(self.kind(), text, start.elapsed()),
            Err(e) => {
                warn!(error = %e, "[OCR/Tesseract] Extraction failed");
                OcrOutcome::failure(self.kind(), e.to_string(), start.elapsed())
            }
        }
    }
}
