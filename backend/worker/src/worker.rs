use std::sync::Arc;

use ocrflow_core::{DocumentSource, IngestError, LogSink, OcrStatus};
use ocrflow_logging::{EventLogger, PipelineEvent};
use ocrflow_routing::OcrRouter;
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

/// What happened to one document in a batch.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub doc_id: String,
    pub ocr_engine: String,
    pub status: OcrStatus,
    pub error_message: Option<String>,
    /// Set when the sink failed; the record itself is unchanged.
    pub sink_error: Option<String>,
}

/// Outcome of one pass over a batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub run_id: Uuid,
    pub documents: Vec<DocumentReport>,
}

impl BatchSummary {
    pub fn processed(&self) -> usize {
        self.documents.len()
    }

    pub fn succeeded(&self) -> usize {
        self.documents
            .iter()
            .filter(|d| d.status == OcrStatus::Success)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.processed() - self.succeeded()
    }

    pub fn sink_failures(&self) -> usize {
        self.documents.iter().filter(|d| d.sink_error.is_some()).count()
    }
}

/// Drives source → router → sink, one document at a time.
pub struct Worker {
    source: Arc<dyn DocumentSource>,
    router: OcrRouter,
    sink: Arc<dyn LogSink>,
}

impl Worker {
    pub fn new(source: Arc<dyn DocumentSource>, router: OcrRouter, sink: Arc<dyn LogSink>) -> Self {
        Self {
            source,
            router,
            sink,
        }
    }

    /// Run one pass over the batch.
    ///
    /// Only a failing source aborts the pass; OCR and sink failures are
    /// reported per document.
    pub async fn run_once(&self) -> Result<BatchSummary, IngestError> {
        let run_id = Uuid::new_v4();
        info!(
            run_id = %run_id,
            source = self.source.name(),
            sink = self.sink.name(),
            threshold_mb = self.router.threshold(),
            "Starting OCR worker cycle"
        );

        let docs = self.source.pull().await.map_err(|e| {
            error!(run_id = %run_id, error = %e, "Failed to pull documents");
            e
        })?;

        let mut documents = Vec::with_capacity(docs.len());
        for doc in &docs {
            info!(doc_id = %doc.doc_id, "Processing document");
            let record = self.router.route(doc).await;

            EventLogger::log_event(
                &run_id.to_string(),
                PipelineEvent::DocumentRouted {
                    doc_id: record.doc_id().to_string(),
                    ocr_engine: record.ocr_engine().to_string(),
                    status: record.status().to_string(),
                    runtime_seconds: record.ocr_runtime_seconds(),
                    error_message: record.error_message().map(str::to_string),
                },
            );

            let sink_error = match self.sink.persist(&record).await {
                Ok(()) => None,
                Err(e) => {
                    warn!(doc_id = %record.doc_id(), error = %e, "Failed to log OCR record");
                    EventLogger::log_event(
                        &run_id.to_string(),
                        PipelineEvent::SinkFailed {
                            doc_id: record.doc_id().to_string(),
                            sink: self.sink.name().to_string(),
                            error_msg: e.to_string(),
                        },
                    );
                    Some(e.to_string())
                }
            };

            info!(
                doc_id = %record.doc_id(),
                ocr_engine = %record.ocr_engine(),
                status = %record.status(),
                "Finished document"
            );

            documents.push(DocumentReport {
                doc_id: record.doc_id().to_string(),
                ocr_engine: record.ocr_engine().to_string(),
                status: record.status(),
                error_message: record.error_message().map(str::to_string),
                sink_error,
            });
        }

        let summary = BatchSummary { run_id, documents };
        EventLogger::log_event(
            &run_id.to_string(),
            PipelineEvent::BatchFinished {
                processed: summary.processed(),
                succeeded: summary.succeeded(),
                failed: summary.failed(),
                sink_failures: summary.sink_failures(),
            },
        );
        info!(run_id = %run_id, processed = summary.processed(), "Worker cycle completed");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ocrflow_core::{DocumentDescriptor, OcrLogRecord, SinkError};
    use ocrflow_engines::{GcpOcrEngine, TesseractEngine};
    use ocrflow_ingest::StaticSource;
    use ocrflow_sink::MemorySink;
    use std::time::Duration;

    struct FailingSink;

    #[async_trait]
    impl LogSink for FailingSink {
        fn name(&self) -> &str {
            "failing"
        }

        async fn persist(&self, record: &OcrLogRecord) -> Result<(), SinkError> {
            Err(SinkError::Rejected {
                doc_id: record.doc_id().to_string(),
                message: "insert quota exceeded".into(),
            })
        }
    }

    struct BrokenSource;

    #[async_trait]
    impl DocumentSource for BrokenSource {
        fn name(&self) -> &str {
            "broken"
        }

        async fn pull(&self) -> Result<Vec<DocumentDescriptor>, IngestError> {
            Err(IngestError::Parse {
                line: 1,
                message: "not json".into(),
            })
        }
    }

    fn router() -> OcrRouter {
        OcrRouter::new(
            Arc::new(TesseractEngine::new()),
            Arc::new(GcpOcrEngine::new().with_latency(Duration::ZERO)),
            1.0,
        )
    }

    fn sized_file(dir: &tempfile::TempDir, name: &str, bytes: u64) -> String {
        let path = dir.path().join(name);
        let file = std::fs::File::create(&path).unwrap();
        file.set_len(bytes).unwrap();
        path.to_str().unwrap().to_string()
    }

    fn batch(dir: &tempfile::TempDir) -> StaticSource {
        StaticSource::new(vec![
            DocumentDescriptor::new(
                "doc-bank-001",
                "bank_statement",
                "tenant_A",
                sized_file(dir, "small.pdf", 100 * 1024),
                "2025-01-01T08:15:00Z",
            ),
            DocumentDescriptor::new(
                "doc-inv-002",
                "invoice",
                "tenant_B",
                sized_file(dir, "large.pdf", 3 * 1024 * 1024),
                "2025-01-01T08:20:00Z",
            ),
        ])
    }

    #[tokio::test]
    async fn persists_one_record_per_document_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(MemorySink::new());
        let worker = Worker::new(Arc::new(batch(&dir)), router(), sink.clone());

        let summary = worker.run_once().await.unwrap();
        assert_eq!(summary.processed(), 2);
        assert_eq!(summary.succeeded(), 2);
        assert_eq!(summary.sink_failures(), 0);

        let records = sink.records().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].doc_id(), "doc-bank-001");
        assert_eq!(records[0].ocr_engine(), "tesseract");
        assert_eq!(records[1].doc_id(), "doc-inv-002");
        assert_eq!(records[1].ocr_engine(), "gcp_ocr");
    }

    #[tokio::test]
    async fn failed_documents_do_not_stop_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let mut docs = vec![DocumentDescriptor::new(
            "doc-missing",
            "invoice",
            "tenant_A",
            "/no/such/file.pdf",
            "2025-01-01T08:00:00Z",
        )];
        docs.extend(batch(&dir).pull().await.unwrap());

        let sink = Arc::new(MemorySink::new());
        let worker = Worker::new(Arc::new(StaticSource::new(docs)), router(), sink.clone());
        let summary = worker.run_once().await.unwrap();

        assert_eq!(summary.processed(), 3);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.documents[0].status, OcrStatus::Failure);
        assert!(summary.documents[0].error_message.is_some());
        assert_eq!(sink.len().await, 3);
    }

    #[tokio::test]
    async fn sink_failures_are_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let worker = Worker::new(Arc::new(batch(&dir)), router(), Arc::new(FailingSink));

        let summary = worker.run_once().await.unwrap();
        assert_eq!(summary.processed(), 2);
        assert_eq!(summary.sink_failures(), 2);
        // The OCR outcome itself is untouched by the sink failure.
        assert_eq!(summary.succeeded(), 2);
        assert!(summary.documents[0]
            .sink_error
            .as_deref()
            .unwrap()
            .contains("quota"));
    }

    #[tokio::test]
    async fn ingest_failure_aborts_the_batch() {
        let sink = Arc::new(MemorySink::new());
        let worker = Worker::new(Arc::new(BrokenSource), router(), sink.clone());

        assert!(worker.run_once().await.is_err());
        assert!(sink.is_empty().await);
    }

    #[tokio::test]
    async fn empty_batch_is_fine() {
        let sink = Arc::new(MemorySink::new());
        let worker = Worker::new(Arc::new(StaticSource::new(vec![])), router(), sink.clone());

        let summary = worker.run_once().await.unwrap();
        assert_eq!(summary.processed(), 0);
        assert!(sink.is_empty().await);
    }
}
