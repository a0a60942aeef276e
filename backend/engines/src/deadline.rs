//! Deadline wrapper
//!
//! Bounds an engine invocation with a timeout. An expired call becomes a
//! failure outcome attributed to the wrapped engine.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use ocrflow_core::{EngineKind, EngineTier, OcrEngine, OcrError, OcrOutcome};
use tracing::warn;

pub struct Deadline<E> {
    inner: E,
    limit: Duration,
}

impl<E: OcrEngine> Deadline<E> {
    pub fn new(inner: E, limit: Duration) -> Self {
        Self { inner, limit }
    }
}

#[async_trait]
impl<E: OcrEngine> OcrEngine for Deadline<E> {
    fn kind(&self) -> EngineKind {
        self.inner.kind()
    }

    fn tier(&self) -> EngineTier {
        self.inner.tier()
    }

    async fn run(&self, location: &str) -> OcrOutcome {
        let start = Instant::now();
        match tokio::time::timeout(self.limit, self.inner.run(location)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                let err = OcrError::Timeout(self.limit.as_secs_f64());
                warn!(
                    engine = %self.kind(),
                    location = %location,
                    "OCR call exceeded deadline"
                );
                OcrOutcome::failure(self.kind(), err.to_string(), start.elapsed())
            }
        }
    }
}
