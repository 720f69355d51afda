use std::{fs::File, path::PathBuf};

use crate::pipeline::{PipelineError, Rows, Source};

/// Reads every record of a CSV file as text rows.
///
/// No header handling: the first record is returned like any other. Records
/// may differ in length, since report rows carry as many columns as the
/// template they came from.
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl Source<Rows> for CsvFileSource {
    fn load(&self) -> Result<Rows, PipelineError> {
        let file = File::open(&self.path).map_err(|e| {
            PipelineError::Load(format!("failed to open CSV file {}: {e}", self.path.display()))
        })?;
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| {
                PipelineError::Load(format!(
                    "failed to read CSV record from {}: {e}",
                    self.path.display()
                ))
            })?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        tracing::debug!(path = %self.path.display(), rows = rows.len(), "csv rows loaded");
        Ok(rows)
    }
}
