//! Pipeline Event Logger
//!
//! Structured per-document and per-batch events, emitted through `tracing`
//! so they land in the JSON file log alongside everything else.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::redact::redact_sensitive_data;

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum PipelineEvent {
    DocumentRouted {
        doc_id: String,
        ocr_engine: String,
        status: String,
        runtime_seconds: f64,
        error_message: Option<String>,
    },
    SinkFailed {
        doc_id: String,
        sink: String,
        error_msg: String,
    },
    BatchFinished {
        processed: usize,
        succeeded: usize,
        failed: usize,
        sink_failures: usize,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub run_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: PipelineEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Redact free text in the event, then emit it as a structured trace event.
    pub fn log_event(run_id: &str, mut event: PipelineEvent) {
        match &mut event {
            PipelineEvent::DocumentRouted { error_message, .. } => {
                if let Some(msg) = error_message {
                    *msg = redact_sensitive_data(msg);
                }
            }
            PipelineEvent::SinkFailed { error_msg, .. } => {
                *error_msg = redact_sensitive_data(error_msg);
            }
            PipelineEvent::BatchFinished { .. } => {}
        }

        let is_failure = matches!(
            &event,
            PipelineEvent::SinkFailed { .. }
                | PipelineEvent::DocumentRouted { error_message: Some(_), .. }
        );

        let entry = EventLogEntry {
            run_id: run_id.into(),
            timestamp: Utc::now(),
            event,
        };

        let payload = serde_json::to_string(&entry).unwrap_or_else(|_| format!("{entry:?}"));
        if is_failure {
            warn!(target: "pipeline_events", event = %payload, "Pipeline event");
        } else {
            info!(target: "pipeline_events", event = %payload, "Pipeline event");
        }
    }
}
