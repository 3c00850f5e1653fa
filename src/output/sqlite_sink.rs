use crate::output::traits::{RecordSink, SinkError};
use crate::output::Record;
use rusqlite::{params_from_iter, Connection};
use std::path::Path;

/// Persists records to a SQLite table, one row per record
///
/// The table is created on first use with a `url` column, a `scraped_at`
/// timestamp, and one TEXT column per output field. Multi-valued fields are
/// joined with `"; "`.
pub struct SqliteSink {
    conn: Connection,
    table: String,
    columns: Vec<String>,
    fatal: bool,
}

impl SqliteSink {
    pub fn open(
        path: &Path,
        table: &str,
        columns: &[String],
        fatal: bool,
    ) -> Result<Self, SinkError> {
        let conn = Connection::open(path)?;

        let column_defs: Vec<String> = columns
            .iter()
            .map(|c| format!("{} TEXT", quote_ident(c)))
            .collect();
        let create = format!(
            "CREATE TABLE IF NOT EXISTS {} (\
             id INTEGER PRIMARY KEY AUTOINCREMENT, \
             url TEXT NOT NULL, \
             scraped_at TEXT NOT NULL{}{})",
            quote_ident(table),
            if column_defs.is_empty() { "" } else { ", " },
            column_defs.join(", "),
        );
        conn.execute(&create, [])?;

        Ok(Self {
            conn,
            table: table.to_string(),
            columns: columns.to_vec(),
            fatal,
        })
    }
}

impl RecordSink for SqliteSink {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn write(&mut self, record: &Record) -> Result<(), SinkError> {
        let mut column_names = vec!["url".to_string(), "scraped_at".to_string()];
        column_names.extend(self.columns.iter().map(|c| quote_ident(c)));

        let placeholders: Vec<String> = (1..=column_names.len())
            .map(|i| format!("?{}", i))
            .collect();
        let insert = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(&self.table),
            column_names.join(", "),
            placeholders.join(", "),
        );

        let mut values = vec![
            record.url.clone(),
            chrono::Utc::now().to_rfc3339(),
        ];
        values.extend(record.cells());

        self.conn.execute(&insert, params_from_iter(values.iter()))?;
        Ok(())
    }

    fn is_fatal(&self) -> bool {
        self.fatal
    }
}

/// Double-quote an identifier so arbitrary field labels are valid column
/// names
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
