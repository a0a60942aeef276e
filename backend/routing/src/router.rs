//! OCR router: measure, classify, run one engine, normalize into a log record.

use std::sync::Arc;

use ocrflow_core::{
    ClassificationError, ComplexitySignal, DocumentDescriptor, EngineKind, EngineTier,
    OcrEngine, OcrLogRecord,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::signal::FileSizeSignal;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Pick a tier for a complexity signal. The boundary belongs to `Heavy`.
pub fn classify(signal: f64, threshold: f64) -> EngineTier {
    if signal < threshold {
        EngineTier::Light
    } else {
        EngineTier::Heavy
    }
}

/// What the router would do with a document.
#[derive(Debug, Clone, Serialize)]
pub struct RouteDecision {
    pub signal: f64,
    pub threshold: f64,
    pub tier: EngineTier,
    pub engine: EngineKind,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct OcrRouter {
    light: Arc<dyn OcrEngine>,
    heavy: Arc<dyn OcrEngine>,
    signal: Arc<dyn ComplexitySignal>,
    threshold: f64,
}

impl OcrRouter {
    /// Router using the file-size signal.
    pub fn new(light: Arc<dyn OcrEngine>, heavy: Arc<dyn OcrEngine>, threshold: f64) -> Self {
        Self {
            light,
            heavy,
            signal: Arc::new(FileSizeSignal),
            threshold,
        }
    }

    pub fn with_signal(mut self, signal: Arc<dyn ComplexitySignal>) -> Self {
        self.signal = signal;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn engine_for(&self, tier: EngineTier) -> &Arc<dyn OcrEngine> {
        match tier {
            EngineTier::Light => &self.light,
            EngineTier::Heavy => &self.heavy,
        }
    }

    /// Measure and classify without running OCR.
    pub async fn decide(&self, location: &str) -> Result<RouteDecision, ClassificationError> {
        let signal = self.signal.measure(location).await?;
        let tier = classify(signal, self.threshold);
        let decision = RouteDecision {
            signal,
            threshold: self.threshold,
            tier,
            engine: self.engine_for(tier).kind(),
        };
        debug!(
            location = %location,
            signal = decision.signal,
            signal_name = self.signal.name(),
            tier = %decision.tier,
            "Classified document"
        );
        Ok(decision)
    }

    /// Route one document through exactly one engine.
    ///
    /// Never fails: an unmeasurable document becomes an unrouted failure
    /// record, and engine failures are carried in the record.
    pub async fn route(&self, doc: &DocumentDescriptor) -> OcrLogRecord {
        let decision = match self.decide(&doc.location).await {
            Ok(decision) => decision,
            Err(e) => {
                warn!(doc_id = %doc.doc_id, error = %e, "[Router] Could not classify document");
                return OcrLogRecord::unrouted(doc, e.to_string());
            }
        };

        info!(
            "[Router] {} ({:.3} MB) → {} engine {}",
            doc.doc_id, decision.signal, decision.tier, decision.engine
        );

        let outcome = self.engine_for(decision.tier).run(&doc.location).await;
        OcrLogRecord::from_outcome(doc, &outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ocrflow_core::{OcrOutcome, OcrStatus, UNROUTED_ENGINE};
    use ocrflow_engines::{Deadline, GcpOcrEngine, TesseractEngine};
    use std::time::Duration;

    struct FixedSignal(f64);

    #[async_trait]
    impl ComplexitySignal for FixedSignal {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn measure(&self, _location: &str) -> Result<f64, ClassificationError> {
            Ok(self.0)
        }
    }

    /// Engine that always fails, to check that failures are not retried elsewhere.
    struct BrokenEngine;

    #[async_trait]
    impl OcrEngine for BrokenEngine {
        fn kind(&self) -> EngineKind {
            EngineKind::GcpOcr
        }

        fn tier(&self) -> EngineTier {
            EngineTier::Heavy
        }

        async fn run(&self, _location: &str) -> OcrOutcome {
            OcrOutcome::failure(self.kind(), "backend unreachable", Duration::from_millis(3))
        }
    }

    fn router(threshold: f64) -> OcrRouter {
        OcrRouter::new(
            Arc::new(TesseractEngine::new()),
            Arc::new(GcpOcrEngine::new().with_latency(Duration::ZERO)),
            threshold,
        )
    }

    fn doc(location: &str) -> DocumentDescriptor {
        DocumentDescriptor::new(
            "doc-1",
            "invoice",
            "tenant_B",
            location,
            "2025-01-01T08:20:00Z",
        )
    }

    fn sized_file(bytes: u64) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        file.as_file().set_len(bytes).unwrap();
        file
    }

    #[test]
    fn classify_boundary_is_heavy() {
        assert_eq!(classify(0.999, 1.0), EngineTier::Light);
        assert_eq!(classify(1.0, 1.0), EngineTier::Heavy);
        assert_eq!(classify(1.001, 1.0), EngineTier::Heavy);
        assert_eq!(classify(0.0, 1.0), EngineTier::Light);
    }

    #[tokio::test]
    async fn small_document_goes_light() {
        let file = sized_file(512 * 1024);
        let record = router(1.0).route(&doc(file.path().to_str().unwrap())).await;

        assert_eq!(record.ocr_engine(), "tesseract");
        assert_eq!(record.status(), OcrStatus::Success);
        assert!(record.error_message().is_none());
        assert!(record.ocr_text().starts_with("[Tesseract]"));
    }

    #[tokio::test]
    async fn large_document_goes_heavy() {
        let file = sized_file((2.3 * 1024.0 * 1024.0) as u64);
        let record = router(1.0).route(&doc(file.path().to_str().unwrap())).await;

        assert_eq!(record.ocr_engine(), "gcp_ocr");
        assert_eq!(record.status(), OcrStatus::Success);
        assert!(record.error_message().is_none());
    }

    #[tokio::test]
    async fn injected_signal_drives_selection() {
        let file = sized_file(0);
        let location = file.path().to_str().unwrap();

        let light = router(1.0).with_signal(Arc::new(FixedSignal(0.5)));
        assert_eq!(light.route(&doc(location)).await.ocr_engine(), "tesseract");

        let heavy = router(1.0).with_signal(Arc::new(FixedSignal(2.3)));
        assert_eq!(heavy.route(&doc(location)).await.ocr_engine(), "gcp_ocr");
    }

    #[tokio::test]
    async fn unreachable_content_yields_failure_record() {
        let record = router(1.0).route(&doc("/no/such/doc.pdf")).await;

        assert_eq!(record.status(), OcrStatus::Failure);
        assert_eq!(record.ocr_engine(), UNROUTED_ENGINE);
        assert!(record.error_message().unwrap().contains("/no/such/doc.pdf"));
        assert_eq!(record.ocr_runtime_seconds(), 0.0);
        assert_eq!(record.doc_id(), "doc-1");
    }

    #[tokio::test]
    async fn engine_failure_is_recorded_without_fallback() {
        let router = OcrRouter::new(
            Arc::new(TesseractEngine::new()),
            Arc::new(BrokenEngine),
            1.0,
        )
        .with_signal(Arc::new(FixedSignal(5.0)));

        let record = router.route(&doc("/irrelevant.pdf")).await;
        assert_eq!(record.ocr_engine(), "gcp_ocr");
        assert_eq!(record.status(), OcrStatus::Failure);
        assert_eq!(record.error_message(), Some("backend unreachable"));
        assert_eq!(record.ocr_runtime_seconds(), 0.003);
    }

    #[tokio::test]
    async fn heavy_engine_past_its_deadline_yields_timeout_record() {
        let file = sized_file(10);
        let slow = GcpOcrEngine::new().with_latency(Duration::from_millis(500));
        let router = OcrRouter::new(
            Arc::new(TesseractEngine::new()),
            Arc::new(Deadline::new(slow, Duration::from_millis(20))),
            1.0,
        )
        .with_signal(Arc::new(FixedSignal(2.3)));

        let record = router.route(&doc(file.path().to_str().unwrap())).await;
        assert_eq!(record.ocr_engine(), "gcp_ocr");
        assert_eq!(record.status(), OcrStatus::Failure);
        assert!(record.error_message().unwrap().contains("timed out"));
        assert!(record.ocr_text().is_empty());
        assert!(record.ocr_runtime_seconds() < 0.5);
    }

    #[tokio::test]
    async fn decide_reports_without_running() {
        let file = sized_file(3 * 1024 * 1024);
        let decision = router(2.0).decide(file.path().to_str().unwrap()).await.unwrap();
        assert_eq!(decision.signal, 3.0);
        assert_eq!(decision.tier, EngineTier::Heavy);
        assert_eq!(decision.engine, EngineKind::GcpOcr);

        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["tier"], "heavy");
        assert_eq!(json["engine"], "gcp_ocr");
    }

    #[tokio::test]
    async fn runtime_is_non_negative_and_rounded() {
        let file = sized_file(10);
        let record = router(1.0).route(&doc(file.path().to_str().unwrap())).await;
        let secs = record.ocr_runtime_seconds();
        assert!(secs >= 0.0);
        assert_eq!((secs * 1000.0).round() / 1000.0, secs);
    }
}
