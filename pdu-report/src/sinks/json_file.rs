use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use pdu_core::domain::{rack_label, DeviceStatistics, Line, StatKind, RACK_COUNT};
use serde::Serialize;

use crate::pipeline::{PipelineError, Sink};

use super::commit_file;

/// Writes a device statistics matrix as a JSON document.
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

#[derive(Serialize)]
struct StatsDocument<'a> {
    device: &'a str,
    racks: Vec<String>,
    measurements: Vec<MeasurementRow<'a>>,
}

#[derive(Serialize)]
struct MeasurementRow<'a> {
    line: Line,
    stat: StatKind,
    values: &'a [f64; RACK_COUNT],
}

impl<'a> From<&'a DeviceStatistics> for StatsDocument<'a> {
    fn from(stats: &'a DeviceStatistics) -> Self {
        StatsDocument {
            device: &stats.device_name,
            racks: (0..RACK_COUNT).map(rack_label).collect(),
            measurements: stats
                .rows()
                .map(|(line, stat, values)| MeasurementRow { line, stat, values })
                .collect(),
        }
    }
}

impl Sink<DeviceStatistics> for JsonFileSink {
    fn write(&self, stats: &DeviceStatistics) -> Result<(), PipelineError> {
        let doc = StatsDocument::from(stats);
        commit_file(&self.path, |staging| {
            let file = File::create(staging).map_err(|e| {
                PipelineError::Export(format!(
                    "failed to create output file {}: {e}",
                    self.path.display()
                ))
            })?;
            let mut out = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut out, &doc)
                .map_err(|e| PipelineError::Export(format!("failed to write JSON: {e}")))?;
            out.flush()
                .map_err(|e| PipelineError::Export(format!("failed to flush JSON output: {e}")))
        })
    }
}
