//! Manifest file source.
//!
//! Accepts either a JSON array of descriptors or NDJSON (one descriptor per
//! line, blank lines ignored).

use std::path::PathBuf;

use async_trait::async_trait;
use ocrflow_core::{DocumentDescriptor, DocumentSource, IngestError};
use tracing::info;

pub struct ManifestSource {
    path: PathBuf,
}

impl ManifestSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DocumentSource for ManifestSource {
    fn name(&self) -> &str {
        "manifest"
    }

    async fn pull(&self) -> Result<Vec<DocumentDescriptor>, IngestError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| IngestError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        let docs = parse_manifest(&raw)?;
        info!(path = %self.path.display(), count = docs.len(), "Pulled documents from manifest");
        Ok(docs)
    }
}

/// Parse a manifest body in either supported layout.
pub fn parse_manifest(raw: &str) -> Result<Vec<DocumentDescriptor>, IngestError> {
    let trimmed = raw.trim_start();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).map_err(|e| IngestError::Parse {
            line: e.line(),
            message: e.to_string(),
        });
    }

    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|e| IngestError::Parse {
                line: i + 1,
                message: e.to_string(),
            })
        })
        .collect()
}
