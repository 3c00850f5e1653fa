use crate::output::Record;
use thiserror::Error;

/// Errors a sink can raise while persisting records
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Write error: {0}")]
    Write(String),
}

/// Destination for extracted records
///
/// Every configured sink receives every record. A sink failure only stops
/// the crawl when the sink is marked fatal; otherwise the failure is logged
/// and the crawl continues.
pub trait RecordSink: Send {
    /// Human-readable sink name for logs
    fn name(&self) -> &str;

    /// Persists a single record
    fn write(&mut self, record: &Record) -> Result<(), SinkError>;

    /// Flushes buffered output; called once when the crawl finishes
    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    /// Whether a write failure on this sink aborts the crawl
    fn is_fatal(&self) -> bool {
        false
    }
}
