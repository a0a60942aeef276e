use async_trait::async_trait;
use ocrflow_core::{LogSink, OcrLogRecord, SinkError};
use tokio::sync::Mutex;

/// Keeps every persisted record in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<OcrLogRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn records(&self) -> Vec<OcrLogRecord> {
        self.records.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl LogSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    async fn persist(&self, record: &OcrLogRecord) -> Result<(), SinkError> {
        self.records.lock().await.push(record.clone());
        Ok(())
    }
}
