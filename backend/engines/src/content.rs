use std::path::PathBuf;

use ocrflow_core::location::local_path;
use ocrflow_core::OcrError;
use tokio::fs;

/// Check that the content behind `location` can be read by a local backend.
pub(crate) async fn ensure_readable(engine: &str, location: &str) -> Result<PathBuf, OcrError> {
    let path = local_path(location).map_err(|e| OcrError::AdapterFailure {
        engine: engine.to_string(),
        message: e.to_string(),
    })?;

    let meta = fs::metadata(&path).await.map_err(|source| OcrError::Unreadable {
        location: location.to_string(),
        source,
    })?;

    if !meta.is_file() {
        return Err(OcrError::AdapterFailure {
            engine: engine.to_string(),
            message: format!("{location} is not a regular file"),
        });
    }

    Ok(path)
}
