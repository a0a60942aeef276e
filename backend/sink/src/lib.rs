//! Log sinks for normalized OCR records.
//!
//! A sink is built once at startup and shared by the whole batch.

pub mod memory;
pub mod ndjson;
pub mod sqlite;
pub mod stdout;

pub use memory::MemorySink;
pub use ndjson::NdjsonSink;
pub use sqlite::{SqliteSink, StoredRow, DEFAULT_TABLE};
pub use stdout::StdoutSink;

use std::path::PathBuf;
use std::sync::Arc;

use ocrflow_core::{LogSink, SinkError};

pub enum SinkSpec {
    Stdout,
    Ndjson { path: PathBuf },
    Sqlite { path: PathBuf, table: String },
    Memory,
}

pub fn create_sink(spec: SinkSpec) -> Result<Arc<dyn LogSink>, SinkError> {
    let sink: Arc<dyn LogSink> = match spec {
        SinkSpec::Stdout => Arc::new(StdoutSink::new()),
        SinkSpec::Ndjson { path } => Arc::new(NdjsonSink::new(path)),
        SinkSpec::Sqlite { path, table } => Arc::new(SqliteSink::open(path, &table)?),
        SinkSpec::Memory => Arc::new(MemorySink::new()),
    };
    Ok(sink)
}
