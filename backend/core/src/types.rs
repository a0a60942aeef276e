use std::fmt;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel written to `ocr_engine` when no engine could be selected.
pub const UNROUTED_ENGINE: &str = "unrouted";

/// Identifying and locating metadata for one document to OCR.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentDescriptor {
    pub doc_id: String,
    pub doc_type: String,
    pub tenant_id: String,
    /// URI or path to the document content.
    #[serde(alias = "gcs_uri")]
    pub location: String,
    pub uploaded_at: String,
}

impl DocumentDescriptor {
    pub fn new(
        doc_id: impl Into<String>,
        doc_type: impl Into<String>,
        tenant_id: impl Into<String>,
        location: impl Into<String>,
        uploaded_at: impl Into<String>,
    ) -> Self {
        Self {
            doc_id: doc_id.into(),
            doc_type: doc_type.into(),
            tenant_id: tenant_id.into(),
            location: location.into(),
            uploaded_at: uploaded_at.into(),
        }
    }
}

/// Routing class of an OCR engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EngineTier {
    /// Fast and cheap.
    Light,
    /// Slower, more capable.
    Heavy,
}

impl fmt::Display for EngineTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Heavy => write!(f, "heavy"),
        }
    }
}

/// Which OCR backend executed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    Tesseract,
    GcpOcr,
}

impl EngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tesseract => "tesseract",
            Self::GcpOcr => "gcp_ocr",
        }
    }

    /// The tier this backend is normally deployed in.
    pub fn natural_tier(&self) -> EngineTier {
        match self {
            Self::Tesseract => EngineTier::Light,
            Self::GcpOcr => EngineTier::Heavy,
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OcrStatus {
    Success,
    Failure,
}

impl OcrStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

impl fmt::Display for OcrStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one text-extraction attempt.
///
/// Fields are private so that `error` is present exactly when the status is
/// `Failure`; build one with [`OcrOutcome::success`] or [`OcrOutcome::failure`].
#[derive(Debug, Clone, PartialEq)]
pub struct OcrOutcome {
    text: String,
    runtime: Duration,
    status: OcrStatus,
    engine: EngineKind,
    error: Option<String>,
}

impl OcrOutcome {
    pub fn success(engine: EngineKind, text: impl Into<String>, runtime: Duration) -> Self {
        Self {
            text: text.into(),
            runtime,
            status: OcrStatus::Success,
            engine,
            error: None,
        }
    }

    pub fn failure(engine: EngineKind, error: impl Into<String>, runtime: Duration) -> Self {
        Self {
            text: String::new(),
            runtime,
            status: OcrStatus::Failure,
            engine,
            error: Some(error.into()),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn runtime(&self) -> Duration {
        self.runtime
    }

    pub fn status(&self) -> OcrStatus {
        self.status
    }

    pub fn engine(&self) -> EngineKind {
        self.engine
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.status == OcrStatus::Success
    }
}

/// Persistence-ready summary of one document's processing.
///
/// Only built through [`OcrLogRecord::from_outcome`] and
/// [`OcrLogRecord::unrouted`], so `error_message` is set exactly when the
/// status is `Failure`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OcrLogRecord {
    doc_id: String,
    doc_type: String,
    tenant_id: String,
    ocr_engine: String,
    ocr_text: String,
    ocr_runtime_seconds: f64,
    status: OcrStatus,
    error_message: Option<String>,
    created_at: String,
}

impl OcrLogRecord {
    /// Flatten a descriptor and the outcome of the engine that ran on it.
    pub fn from_outcome(doc: &DocumentDescriptor, outcome: &OcrOutcome) -> Self {
        Self {
            doc_id: doc.doc_id.clone(),
            doc_type: doc.doc_type.clone(),
            tenant_id: doc.tenant_id.clone(),
            ocr_engine: outcome.engine().as_str().to_string(),
            ocr_text: outcome.text().to_string(),
            ocr_runtime_seconds: round_millis(outcome.runtime()),
            status: outcome.status(),
            error_message: outcome.error().map(str::to_string),
            created_at: utc_timestamp(),
        }
    }

    /// Failure record for a document no engine was selected for.
    pub fn unrouted(doc: &DocumentDescriptor, error: impl Into<String>) -> Self {
        Self {
            doc_id: doc.doc_id.clone(),
            doc_type: doc.doc_type.clone(),
            tenant_id: doc.tenant_id.clone(),
            ocr_engine: UNROUTED_ENGINE.to_string(),
            ocr_text: String::new(),
            ocr_runtime_seconds: 0.0,
            status: OcrStatus::Failure,
            error_message: Some(error.into()),
            created_at: utc_timestamp(),
        }
    }

    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Engine that ran, or [`UNROUTED_ENGINE`].
    pub fn ocr_engine(&self) -> &str {
        &self.ocr_engine
    }

    pub fn ocr_text(&self) -> &str {
        &self.ocr_text
    }

    pub fn ocr_runtime_seconds(&self) -> f64 {
        self.ocr_runtime_seconds
    }

    pub fn status(&self) -> OcrStatus {
        self.status
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    pub fn is_success(&self) -> bool {
        self.status == OcrStatus::Success
    }

    /// The row shape written to the warehouse table (no OCR text).
    pub fn warehouse_row(&self) -> WarehouseRow<'_> {
        WarehouseRow {
            doc_id: &self.doc_id,
            doc_type: &self.doc_type,
            tenant_id: &self.tenant_id,
            ocr_engine: &self.ocr_engine,
            ocr_runtime_seconds: self.ocr_runtime_seconds,
            status: self.status,
            error_message: self.error_message.as_deref(),
            created_at: &self.created_at,
        }
    }
}

/// Borrowed view of a record as stored in the `ocr_logs` table.
#[derive(Debug, Serialize)]
pub struct WarehouseRow<'a> {
    pub doc_id: &'a str,
    pub doc_type: &'a str,
    pub tenant_id: &'a str,
    pub ocr_engine: &'a str,
    pub ocr_runtime_seconds: f64,
    pub status: OcrStatus,
    pub error_message: Option<&'a str>,
    pub created_at: &'a str,
}

/// Seconds rounded to millisecond precision.
pub fn round_millis(runtime: Duration) -> f64 {
    (runtime.as_secs_f64() * 1000.0).round() / 1000.0
}

fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
