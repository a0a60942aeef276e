//! Structured logging for ocrflow.
//!
//! Handles log redaction, console and rolling JSON output, and pipeline event logging.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{EventLogEntry, EventLogger, PipelineEvent};
pub use logger::{LOG_FILE_PREFIX, init_logger};
pub use redact::redact_sensitive_data;
