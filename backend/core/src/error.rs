use thiserror::Error;

/// Failure inside an OCR engine. Engines turn these into failure outcomes.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR backend failed ({engine}): {message}")]
    AdapterFailure { engine: String, message: String },

    #[error("OCR timed out after {0:.3}s")]
    Timeout(f64),

    #[error("content unreadable at {location}: {source}")]
    Unreadable {
        location: String,
        #[source]
        source: std::io::Error,
    },
}

/// A document location that no local backend can open.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("no local access for scheme '{0}'")]
    RemoteScheme(String),

    #[error("invalid file URI {uri}: {reason}")]
    InvalidFileUri { uri: String, reason: &'static str },
}

/// The complexity signal for a document could not be determined.
#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("cannot measure complexity of {location}: {source}")]
    Unreachable {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported location scheme: {0}")]
    UnsupportedScheme(String),

    #[error(transparent)]
    InvalidLocation(LocationError),

    #[error("{location} is not a regular file")]
    NotAFile { location: String },
}

/// Persisting a log record failed.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("sink database error: {0}")]
    Database(String),

    #[error("sink rejected record {doc_id}: {message}")]
    Rejected { doc_id: String, message: String },
}

/// Obtaining the batch failed. This is the only error that aborts a batch.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed descriptor at line {line}: {message}")]
    Parse { line: usize, message: String },
}
