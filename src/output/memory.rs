use crate::output::traits::{RecordSink, SinkError};
use crate::output::Record;
use std::sync::{Arc, Mutex};

/// In-memory sink, used by tests and library embedders to inspect records
/// without touching the filesystem
#[derive(Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<Record>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the collected records, valid after the sink has been
    /// moved into the crawler
    pub fn handle(&self) -> Arc<Mutex<Vec<Record>>> {
        Arc::clone(&self.records)
    }
}

impl RecordSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    fn write(&mut self, record: &Record) -> Result<(), SinkError> {
        self.records
            .lock()
            .map_err(|_| SinkError::Write("memory sink poisoned".to_string()))?
            .push(record.clone());
        Ok(())
    }
}
