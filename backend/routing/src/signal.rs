//! Complexity signals used to pick an engine tier.
//!
//! The default signal is the byte size of the content, which is only a
//! proxy for OCR cost; other signals plug in through `ComplexitySignal`.

use async_trait::async_trait;
use ocrflow_core::location::local_path;
use ocrflow_core::{ClassificationError, ComplexitySignal, LocationError};
use tracing::debug;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Size of the content in MiB, read from filesystem metadata.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSizeSignal;

#[async_trait]
impl ComplexitySignal for FileSizeSignal {
    fn name(&self) -> &str {
        "file_size_mb"
    }

    async fn measure(&self, location: &str) -> Result<f64, ClassificationError> {
        let path = local_path(location).map_err(|e| match e {
            LocationError::RemoteScheme(scheme) => ClassificationError::UnsupportedScheme(scheme),
            other => ClassificationError::InvalidLocation(other),
        })?;

        let meta = tokio::fs::metadata(&path)
            .await
            .map_err(|source| ClassificationError::Unreachable {
                location: location.to_string(),
                source,
            })?;

        if !meta.is_file() {
            return Err(ClassificationError::NotAFile {
                location: location.to_string(),
            });
        }

        let size_mb = meta.len() as f64 / BYTES_PER_MB;
        debug!(location = %location, size_mb, "Measured file size");
        Ok(size_mb)
    }
}
