//! SQLite-backed OCR log table.
//!
//! Stands in for the warehouse `OCR_logs` table: one row per processed
//! document, same columns, no OCR text.

use std::path::Path;

use async_trait::async_trait;
use ocrflow_core::{LogSink, OcrLogRecord, SinkError};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

pub const DEFAULT_TABLE: &str = "ocr_logs";

/// A row read back from the log table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredRow {
    pub doc_id: String,
    pub doc_type: String,
    pub tenant_id: String,
    pub ocr_engine: String,
    pub ocr_runtime_seconds: f64,
    pub status: String,
    pub error_message: Option<String>,
    pub created_at: String,
}

pub struct SqliteSink {
    conn: Mutex<Connection>,
    table: String,
}

impl SqliteSink {
    /// Open or create the log database at `path`.
    pub fn open(path: impl AsRef<Path>, table: &str) -> Result<Self, SinkError> {
        let conn = Connection::open(path.as_ref()).map_err(db_err)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;").map_err(db_err)?;
        let sink = Self::with_connection(conn, table)?;
        info!(path = %path.as_ref().display(), table = %sink.table, "OCR log table opened");
        Ok(sink)
    }

    /// In-memory database (for tests and dry runs).
    pub fn in_memory() -> Result<Self, SinkError> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        Self::with_connection(conn, DEFAULT_TABLE)
    }

    fn with_connection(conn: Connection, table: &str) -> Result<Self, SinkError> {
        if !is_identifier(table) {
            return Err(SinkError::Database(format!("invalid table name '{table}'")));
        }
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id                  INTEGER PRIMARY KEY AUTOINCREMENT,
                doc_id              TEXT NOT NULL,
                doc_type            TEXT NOT NULL,
                tenant_id           TEXT NOT NULL,
                ocr_engine          TEXT NOT NULL,
                ocr_runtime_seconds REAL NOT NULL,
                status              TEXT NOT NULL,
                error_message       TEXT,
                created_at          TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_{table}_doc_id ON {table}(doc_id);
            CREATE INDEX IF NOT EXISTS idx_{table}_tenant ON {table}(tenant_id);"
        ))
        .map_err(db_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
            table: table.to_string(),
        })
    }

    /// Count all logged rows.
    pub async fn count(&self) -> Result<usize, SinkError> {
        let conn = self.conn.lock().await;
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", self.table), [], |row| {
                row.get(0)
            })
            .map_err(db_err)?;
        Ok(count as usize)
    }

    /// Most recent rows first.
    pub async fn recent(&self, limit: usize) -> Result<Vec<StoredRow>, SinkError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT doc_id, doc_type, tenant_id, ocr_engine, ocr_runtime_seconds,
                        status, error_message, created_at
                 FROM {} ORDER BY id DESC LIMIT ?1",
                self.table
            ))
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok(StoredRow {
                    doc_id: row.get(0)?,
                    doc_type: row.get(1)?,
                    tenant_id: row.get(2)?,
                    ocr_engine: row.get(3)?,
                    ocr_runtime_seconds: row.get(4)?,
                    status: row.get(5)?,
                    error_message: row.get(6)?,
                    created_at: row.get(7)?,
                })
            })
            .map_err(db_err)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(rows)
    }
}

#[async_trait]
impl LogSink for SqliteSink {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn persist(&self, record: &OcrLogRecord) -> Result<(), SinkError> {
        let conn = self.conn.lock().await;
        conn.execute(
            &format!(
                "INSERT INTO {} (doc_id, doc_type, tenant_id, ocr_engine, ocr_runtime_seconds,
                                 status, error_message, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                self.table
            ),
            params![
                record.doc_id(),
                record.doc_type(),
                record.tenant_id(),
                record.ocr_engine(),
                record.ocr_runtime_seconds(),
                record.status().as_str(),
                record.error_message(),
                record.created_at(),
            ],
        )
        .map_err(db_err)?;
        debug!(doc_id = %record.doc_id(), table = %self.table, "Inserted OCR log row");
        Ok(())
    }
}

fn db_err(e: rusqlite::Error) -> SinkError {
    SinkError::Database(e.to_string())
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocrflow_core::{DocumentDescriptor, EngineKind, OcrOutcome};
    use std::time::Duration;

    fn record(doc_id: &str, ok: bool) -> OcrLogRecord {
        let doc = DocumentDescriptor::new(doc_id, "invoice", "tenant_B", "/x.pdf", "2025-01-01");
        let outcome = if ok {
            OcrOutcome::success(EngineKind::Tesseract, "text", Duration::from_millis(5))
        } else {
            OcrOutcome::failure(EngineKind::GcpOcr, "quota exceeded", Duration::from_millis(7))
        };
        OcrLogRecord::from_outcome(&doc, &outcome)
    }

    #[tokio::test]
    async fn persists_and_reads_back() {
        let sink = SqliteSink::in_memory().unwrap();
        sink.persist(&record("doc-1", true)).await.unwrap();
        sink.persist(&record("doc-2", false)).await.unwrap();

        assert_eq!(sink.count().await.unwrap(), 2);
        let rows = sink.recent(10).await.unwrap();
        assert_eq!(rows[0].doc_id, "doc-2");
        assert_eq!(rows[0].status, "failure");
        assert_eq!(rows[0].error_message.as_deref(), Some("quota exceeded"));
        assert_eq!(rows[0].ocr_runtime_seconds, 0.007);
        assert_eq!(rows[1].doc_id, "doc-1");
        assert_eq!(rows[1].ocr_engine, "tesseract");
        assert!(rows[1].error_message.is_none());
    }

    #[tokio::test]
    async fn reopening_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ocr.db");
        {
            let sink = SqliteSink::open(&path, "ocr_logs").unwrap();
            sink.persist(&record("doc-1", true)).await.unwrap();
        }
        let sink = SqliteSink::open(&path, "ocr_logs").unwrap();
        assert_eq!(sink.count().await.unwrap(), 1);
    }

    #[test]
    fn rejects_bad_table_names() {
        assert!(is_identifier("ocr_logs"));
        assert!(is_identifier("_t1"));
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier("logs; DROP TABLE x"));
        assert!(!is_identifier(""));
        let dir = tempfile::tempdir().unwrap();
        assert!(SqliteSink::open(dir.path().join("x.db"), "bad-name").is_err());
    }
}
