//! OCR engine adapters.
//!
//! Both backends are simulated: they check that the content is readable,
//! fabricate the extracted text and report wall-clock timing.

mod content;
pub mod deadline;
pub mod factory;
pub mod gcp;
pub mod tesseract;

pub use deadline::Deadline;
pub use factory::{create_engine, EngineSpec};
pub use gcp::{GcpOcrEngine, DEFAULT_GCP_LATENCY};
pub use tesseract::TesseractEngine;
