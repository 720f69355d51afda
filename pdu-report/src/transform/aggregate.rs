use std::collections::HashMap;

use pdu_core::domain::{reduce, DeviceStatistics, Line, MeasurementKey, RACK_COUNT};

use crate::pipeline::{PipelineError, Rows, Transform};

use super::header::{parse_header, HeaderMap};

/// Sample series per measurement key, in row order.
pub type SampleSeries = HashMap<MeasurementKey, Vec<f64>>;

/// Result of aggregating one device export.
#[derive(Debug, Clone)]
pub struct AggregateReport {
    pub statistics: DeviceStatistics,
    pub columns: usize,
    pub samples: usize,
    /// Cells that were missing, blank or not numeric.
    pub skipped_cells: usize,
}

/// Collect every numeric sample under its key.
///
/// Missing, blank and unparseable cells are skipped, not errors. Returns the
/// series together with the number of skipped cells.
pub fn collect_samples<R: AsRef<[String]>>(
    data_rows: &[R],
    columns: &HashMap<MeasurementKey, usize>,
) -> (SampleSeries, usize) {
    let mut series: SampleSeries = HashMap::with_capacity(columns.len());
    let mut skipped = 0;

    for row in data_rows {
        let row = row.as_ref();
        for (key, &col) in columns {
            let Some(cell) = row.get(col) else {
                skipped += 1;
                continue;
            };
            let cell = cell.trim();
            if cell.is_empty() {
                skipped += 1;
                continue;
            }
            match cell.parse::<f64>() {
                Ok(value) => series.entry(key.clone()).or_default().push(value),
                Err(_) => skipped += 1,
            }
        }
    }

    (series, skipped)
}

/// Reduce collected series into the fixed Q1..Q18 x L1..L3 matrix.
pub fn build_matrix(device_name: &str, series: &SampleSeries) -> DeviceStatistics {
    let mut matrix = DeviceStatistics::new(device_name);
    for rack in 0..RACK_COUNT {
        for line in Line::ALL {
            let key = MeasurementKey::for_rack_index(rack, line);
            let samples = series.get(&key).map(Vec::as_slice).unwrap_or(&[]);
            matrix.set_rack(line, rack, reduce(samples));
        }
    }
    matrix
}

/// Aggregate a whole device export: header row first, then one row per timestamp.
pub fn aggregate_export(rows: &[Vec<String>]) -> Result<AggregateReport, PipelineError> {
    if rows.len() < 2 {
        return Err(PipelineError::Load(format!(
            "insufficient data: {} row(s), need a header and at least one sample row",
            rows.len()
        )));
    }

    let HeaderMap {
        device_name,
        columns,
        foreign_devices,
    } = parse_header(rows[0].as_slice());

    if columns.is_empty() {
        tracing::warn!("device export header contains no measurement columns");
    }
    for other in &foreign_devices {
        tracing::warn!(
            device = %device_name,
            other = %other,
            "export names more than one device; keeping the first"
        );
    }

    let (series, skipped_cells) = collect_samples(&rows[1..], &columns);
    let samples: usize = series.values().map(Vec::len).sum();

    metrics::counter!("device_export_samples_total").increment(samples as u64);
    metrics::counter!("device_export_skipped_cells_total").increment(skipped_cells as u64);
    if skipped_cells > 0 {
        tracing::debug!(skipped_cells, "skipped missing or non-numeric cells");
    }

    tracing::info!(
        device = %device_name,
        columns = columns.len(),
        samples,
        "device export aggregated"
    );

    Ok(AggregateReport {
        statistics: build_matrix(&device_name, &series),
        columns: columns.len(),
        samples,
        skipped_cells,
    })
}

/// Device export rows -> device statistics matrix.
#[derive(Clone, Default)]
pub struct MeasurementAggregator;

impl Transform<Rows, DeviceStatistics> for MeasurementAggregator {
    fn apply(&self, rows: Rows) -> Result<DeviceStatistics, PipelineError> {
        aggregate_export(&rows).map(|report| report.statistics)
    }
}
