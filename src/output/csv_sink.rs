use crate::output::traits::{RecordSink, SinkError};
use crate::output::Record;
use std::fs::File;
use std::path::Path;

/// Writes records to a CSV file, one row per record
///
/// The header row is `url` followed by the field names in output order and
/// is written when the sink is created. Multi-valued fields are joined with
/// `"; "` inside a single cell.
pub struct CsvSink {
    writer: csv::Writer<File>,
    path: String,
    fatal: bool,
}

impl CsvSink {
    pub fn create(path: &Path, columns: &[String], fatal: bool) -> Result<Self, SinkError> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        let mut header = Vec::with_capacity(columns.len() + 1);
        header.push("url");
        header.extend(columns.iter().map(String::as_str));
        writer.write_record(&header)?;
        writer.flush()?;

        Ok(Self {
            writer,
            path: path.display().to_string(),
            fatal,
        })
    }
}

impl RecordSink for CsvSink {
    fn name(&self) -> &str {
        "csv"
    }

    fn write(&mut self, record: &Record) -> Result<(), SinkError> {
        let mut row = Vec::with_capacity(record.fields().len() + 1);
        row.push(record.url.clone());
        row.extend(record.cells());
        self.writer.write_record(&row)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        tracing::info!("csv output flushed to {}", self.path);
        Ok(())
    }

    fn is_fatal(&self) -> bool {
        self.fatal
    }
}
