pub mod demo;
pub mod manifest;

pub use demo::StaticSource;
pub use manifest::{parse_manifest, ManifestSource};

use std::path::PathBuf;
use std::sync::Arc;

use ocrflow_core::DocumentSource;

/// Manifest when one is configured, otherwise the demo batch.
pub fn create_source(manifest: Option<PathBuf>) -> Arc<dyn DocumentSource> {
    match manifest {
        Some(path) => Arc::new(ManifestSource::new(path)),
        None => Arc::new(StaticSource::demo()),
    }
}
