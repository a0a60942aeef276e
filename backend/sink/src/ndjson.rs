//! Append-only NDJSON log file sink.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ocrflow_core::{LogSink, OcrLogRecord, SinkError};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

pub struct NdjsonSink {
    path: PathBuf,
    // Serializes appends so lines never interleave.
    write_lock: Mutex<()>,
}

impl NdjsonSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LogSink for NdjsonSink {
    fn name(&self) -> &str {
        "ndjson"
    }

    async fn persist(&self, record: &OcrLogRecord) -> Result<(), SinkError> {
        let mut line = serde_json::to_string(&record.warehouse_row())?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        debug!(doc_id = %record.doc_id(), path = %self.path.display(), "Appended OCR log line");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocrflow_core::DocumentDescriptor;

    #[tokio::test]
    async fn appends_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let sink = NdjsonSink::new(dir.path().join("logs").join("ocr.ndjson"));

        for id in ["doc-a", "doc-b"] {
            let doc = DocumentDescriptor::new(id, "invoice", "tenant_A", "/x.pdf", "2025-01-01");
            sink.persist(&OcrLogRecord::unrouted(&doc, "missing")).await.unwrap();
        }

        let content = std::fs::read_to_string(sink.path()).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["doc_id"], "doc-a");
        assert_eq!(first["status"], "failure");
        assert_eq!(first["error_message"], "missing");
    }

    #[tokio::test]
    async fn unwritable_path_is_a_sink_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for append.
        let sink = NdjsonSink::new(dir.path());
        let doc = DocumentDescriptor::new("doc-a", "invoice", "tenant_A", "/x.pdf", "2025-01-01");
        let err = sink.persist(&OcrLogRecord::unrouted(&doc, "x")).await.unwrap_err();
        assert!(matches!(err, SinkError::Io(_)));
    }
}
