use std::path::{Path, PathBuf};

use pdu_core::domain::{DeviceStatistics, ReportGrid};

use crate::{
    pipeline::{PipelineError, Rows, Sink},
    report::{stats_csv, FilledReport},
};

use super::commit_file;

/// Writes text rows to a CSV file, replacing it atomically.
pub struct CsvFileSink {
    path: PathBuf,
}

impl CsvFileSink {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_rows(&self, rows: &[Vec<String>]) -> Result<(), PipelineError> {
        commit_file(&self.path, |staging| {
            let mut wtr = csv::WriterBuilder::new()
                .flexible(true)
                .from_path(staging)
                .map_err(|e| {
                    PipelineError::Export(format!(
                        "failed to create output file {}: {e}",
                        self.path.display()
                    ))
                })?;

            for row in rows {
                wtr.write_record(row).map_err(|e| {
                    PipelineError::Export(format!("failed to write CSV row: {e}"))
                })?;
            }
            wtr.flush()
                .map_err(|e| PipelineError::Export(format!("failed to flush CSV output: {e}")))
        })?;

        tracing::debug!(path = %self.path.display(), rows = rows.len(), "csv output written");
        Ok(())
    }
}

impl Sink<Rows> for CsvFileSink {
    fn write(&self, rows: &Rows) -> Result<(), PipelineError> {
        self.write_rows(rows)
    }
}

impl Sink<DeviceStatistics> for CsvFileSink {
    fn write(&self, stats: &DeviceStatistics) -> Result<(), PipelineError> {
        self.write_rows(&stats_csv::encode(stats))
    }
}

impl Sink<ReportGrid> for CsvFileSink {
    fn write(&self, grid: &ReportGrid) -> Result<(), PipelineError> {
        self.write_rows(&grid.to_text_rows())
    }
}

impl Sink<FilledReport> for CsvFileSink {
    fn write(&self, filled: &FilledReport) -> Result<(), PipelineError> {
        self.write_rows(&filled.grid.to_text_rows())
    }
}
