//! Output routing: records fan out to every configured sink
//!
//! Sinks are independent; a non-fatal sink failure is logged and the crawl
//! continues, a fatal one aborts it.

mod csv_sink;
mod memory;
mod record;
mod sqlite_sink;
mod traits;

pub use csv_sink::CsvSink;
pub use memory::MemorySink;
pub use record::Record;
pub use sqlite_sink::SqliteSink;
pub use traits::{RecordSink, SinkError};

use crate::config::SavingConfig;
use std::path::Path;

/// Builds the sink set declared by the configuration
///
/// Disabled sinks are skipped. Creation failures are fatal regardless of the
/// sink's `fatal` flag: an unwritable destination is a configuration problem.
pub fn build_sinks(
    saving: &SavingConfig,
    columns: &[String],
) -> Result<Vec<Box<dyn RecordSink>>, SinkError> {
    let mut sinks: Vec<Box<dyn RecordSink>> = Vec::new();

    if let Some(csv) = &saving.csv {
        if csv.enabled {
            sinks.push(Box::new(CsvSink::create(
                Path::new(&csv.file_path),
                columns,
                csv.fatal,
            )?));
        } else {
            tracing::debug!("csv sink disabled, skipping");
        }
    }

    if let Some(sqlite) = &saving.sqlite {
        if sqlite.enabled {
            sinks.push(Box::new(SqliteSink::open(
                Path::new(&sqlite.file_path),
                &sqlite.table,
                columns,
                sqlite.fatal,
            )?));
        } else {
            tracing::debug!("sqlite sink disabled, skipping");
        }
    }

    if sinks.is_empty() {
        tracing::warn!("no output sinks configured; extracted records will be discarded");
    }

    Ok(sinks)
}
