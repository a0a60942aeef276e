use async_trait::async_trait;

use crate::error::{ClassificationError, IngestError, SinkError};
use crate::types::{DocumentDescriptor, EngineKind, EngineTier, OcrLogRecord, OcrOutcome};

/// An OCR backend.
///
/// `run` never fails: unreachable backends and unreadable content come back
/// as an outcome with `OcrStatus::Failure` and a populated error.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Which backend this is (e.g. tesseract, gcp_ocr).
    fn kind(&self) -> EngineKind;

    /// The routing tier this engine serves.
    fn tier(&self) -> EngineTier;

    /// Extract text from the content at `location`.
    async fn run(&self, location: &str) -> OcrOutcome;
}

/// Measures how expensive a document is to OCR without decoding it.
///
/// Must be deterministic and monotonic in cost.
#[async_trait]
pub trait ComplexitySignal: Send + Sync {
    fn name(&self) -> &str;

    async fn measure(&self, location: &str) -> Result<f64, ClassificationError>;
}

/// Persists normalized log records.
#[async_trait]
pub trait LogSink: Send + Sync {
    fn name(&self) -> &str;

    async fn persist(&self, record: &OcrLogRecord) -> Result<(), SinkError>;
}

/// Supplies a finite batch of documents.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    fn name(&self) -> &str;

    async fn pull(&self) -> Result<Vec<DocumentDescriptor>, IngestError>;
}
