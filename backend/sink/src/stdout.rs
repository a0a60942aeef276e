use async_trait::async_trait;
use ocrflow_core::{LogSink, OcrLogRecord, SinkError};
use tracing::info;

/// Mock-mode sink: prints each warehouse row as one JSON line on stdout.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LogSink for StdoutSink {
    fn name(&self) -> &str {
        "stdout"
    }

    async fn persist(&self, record: &OcrLogRecord) -> Result<(), SinkError> {
        let line = serde_json::to_string(&record.warehouse_row())?;
        println!("{line}");
        info!(doc_id = %record.doc_id(), "Logged OCR record");
        Ok(())
    }
}
