//! Shared types and collaborator traits for the ocrflow pipeline.

pub mod error;
pub mod location;
pub mod traits;
pub mod types;

pub use error::{ClassificationError, IngestError, LocationError, OcrError, SinkError};
pub use traits::{ComplexitySignal, DocumentSource, LogSink, OcrEngine};
pub use types::{
    round_millis, DocumentDescriptor, EngineKind, EngineTier, OcrLogRecord, OcrOutcome,
    OcrStatus, WarehouseRow, UNROUTED_ENGINE,
};
