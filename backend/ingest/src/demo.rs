use async_trait::async_trait;
use ocrflow_core::{DocumentDescriptor, DocumentSource, IngestError};
use tracing::info;

/// A fixed batch of descriptors, standing in for a subscription pull.
#[derive(Debug, Clone)]
pub struct StaticSource {
    docs: Vec<DocumentDescriptor>,
}

impl StaticSource {
    pub fn new(docs: Vec<DocumentDescriptor>) -> Self {
        Self { docs }
    }

    /// The built-in two-document demo batch.
    pub fn demo() -> Self {
        Self::new(vec![
            DocumentDescriptor::new(
                "doc-bank-001",
                "bank_statement",
                "tenant_A",
                "gs://basira-raw/bank_statements/2025-01-01/doc-bank-001.pdf",
                "2025-01-01T08:15:00Z",
            ),
            DocumentDescriptor::new(
                "doc-inv-002",
                "invoice",
                "tenant_B",
                "gs://basira-raw/invoices/2025-01-01/doc-inv-002.pdf",
                "2025-01-01T08:20:00Z",
            ),
        ])
    }
}

#[async_trait]
impl DocumentSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn pull(&self) -> Result<Vec<DocumentDescriptor>, IngestError> {
        info!(count = self.docs.len(), "Pulled documents from static batch");
        Ok(self.docs.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_batch_has_two_distinct_docs() {
        let docs = StaticSource::demo().pull().await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].doc_id, "doc-bank-001");
        assert_eq!(docs[1].doc_id, "doc-inv-002");
        assert_ne!(docs[0].tenant_id, docs[1].tenant_id);
    }
}
