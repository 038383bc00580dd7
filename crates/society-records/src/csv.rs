//! KPI Sink
//!
//! Destinations for the per-step KPI records. The CSV writer emits a fixed,
//! pre-declared column order so rows from different steps line up even when
//! a step did not produce every indicator.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::{KpiRecord, RecordError};

/// Receives one KPI record per simulation step.
pub trait KpiSink {
    fn write_record(&mut self, record: &KpiRecord) -> Result<(), RecordError>;
}

/// Collects records in memory.
impl KpiSink for Vec<KpiRecord> {
    fn write_record(&mut self, record: &KpiRecord) -> Result<(), RecordError> {
        self.push(record.clone());
        Ok(())
    }
}

/// Drops every record, for runs that only need the final status.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSink;

impl KpiSink for DiscardSink {
    fn write_record(&mut self, _record: &KpiRecord) -> Result<(), RecordError> {
        Ok(())
    }
}

/// Writes KPI records as CSV rows.
///
/// The header holds the quoted column names; each row holds the values in
/// column order, with an empty field where the record lacks the key.
pub struct KpiCsvWriter<W: Write> {
    writer: W,
    columns: Vec<String>,
    rows_written: u64,
}

impl KpiCsvWriter<BufWriter<File>> {
    /// Creates (or truncates) a CSV file and writes its header.
    pub fn create<S: AsRef<str>>(
        path: impl AsRef<Path>,
        columns: &[S],
    ) -> Result<Self, RecordError> {
        let file = File::create(path.as_ref())?;
        Self::new(BufWriter::new(file), columns)
    }
}

impl<W: Write> KpiCsvWriter<W> {
    /// Wraps a writer and emits the header line.
    pub fn new<S: AsRef<str>>(mut writer: W, columns: &[S]) -> Result<Self, RecordError> {
        let columns: Vec<String> = columns.iter().map(|c| c.as_ref().to_string()).collect();
        let header = columns
            .iter()
            .map(|name| format!("\"{}\"", name))
            .collect::<Vec<_>>()
            .join(",");
        writeln!(writer, "{}", header)?;
        Ok(Self {
            writer,
            columns,
            rows_written: 0,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of data rows written so far (the header is not counted).
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    pub fn flush(&mut self) -> Result<(), RecordError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(mut self) -> Result<W, RecordError> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> KpiSink for KpiCsvWriter<W> {
    fn write_record(&mut self, record: &KpiRecord) -> Result<(), RecordError> {
        let row = self
            .columns
            .iter()
            .map(|key| record.get(key).map(|v| v.to_string()).unwrap_or_default())
            .collect::<Vec<_>>()
            .join(",");
        writeln!(self.writer, "{}", row)?;
        self.rows_written += 1;
        Ok(())
    }
}
