//! Per-device statistics CSV: `Measurement Type, Q1..Q18` plus nine rows.

use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

use pdu_core::domain::{rack_label, DeviceStatistics, Line, StatKind, RACK_COUNT};
use regex::Regex;

use crate::{
    pipeline::{PipelineError, Rows, Source},
    sources::CsvFileSource,
};

pub const MEASUREMENT_HEADER: &str = "Measurement Type";

/// Header plus the nine measurement rows.
const MIN_RECORDS: usize = 1 + 9;
const RECORD_WIDTH: usize = 1 + RACK_COUNT;

static DEVICE_IN_FILE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[abc]\d+").expect("device name pattern is valid"));

fn measurement_label(line: Line, kind: StatKind) -> String {
    format!("{line} {kind}")
}

fn parse_label(label: &str) -> Option<(Line, StatKind)> {
    Line::ALL
        .into_iter()
        .flat_map(|line| StatKind::ALL.into_iter().map(move |kind| (line, kind)))
        .find(|&(line, kind)| measurement_label(line, kind) == label)
}

/// Render a matrix as statistics CSV rows, values with three decimals.
pub fn encode(stats: &DeviceStatistics) -> Rows {
    let mut rows = Vec::with_capacity(MIN_RECORDS);

    let mut header = Vec::with_capacity(RECORD_WIDTH);
    header.push(MEASUREMENT_HEADER.to_string());
    header.extend((0..RACK_COUNT).map(rack_label));
    rows.push(header);

    for (line, kind, values) in stats.rows() {
        let mut row = Vec::with_capacity(RECORD_WIDTH);
        row.push(measurement_label(line, kind));
        row.extend(values.iter().map(|v| format!("{v:.3}")));
        rows.push(row);
    }

    rows
}

/// Rebuild a matrix from statistics CSV rows.
///
/// Short records and unknown measurement labels are skipped; a value that
/// does not parse leaves that rack at zero.
pub fn decode(device_name: &str, rows: &[Vec<String>]) -> Result<DeviceStatistics, PipelineError> {
    if rows.len() < MIN_RECORDS {
        return Err(PipelineError::Load(format!(
            "insufficient data in PDU statistics CSV: {} record(s), need {MIN_RECORDS}",
            rows.len()
        )));
    }

    let mut stats = DeviceStatistics::new(device_name);
    for record in &rows[1..] {
        if record.len() < RECORD_WIDTH {
            continue;
        }
        let Some((line, kind)) = parse_label(record[0].trim()) else {
            continue;
        };

        let series = stats.series_mut(line, kind);
        for (rack, raw) in record[1..RECORD_WIDTH].iter().enumerate() {
            if let Ok(value) = raw.trim().parse::<f64>() {
                series[rack] = value;
            }
        }
    }

    Ok(stats)
}

/// Device name carried by a statistics file name: `total_a1.csv` -> `A1`.
pub fn device_name_from_path(path: &Path) -> Result<String, PipelineError> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();

    DEVICE_IN_FILE_NAME
        .find(&stem)
        .map(|m| m.as_str().to_uppercase())
        .ok_or_else(|| {
            PipelineError::Load(format!(
                "could not extract PDU name from filename: {}",
                path.display()
            ))
        })
}

/// Reads a statistics CSV written by an earlier `stats` run.
pub struct StatsCsvSource {
    path: PathBuf,
}

impl StatsCsvSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl Source<DeviceStatistics> for StatsCsvSource {
    fn load(&self) -> Result<DeviceStatistics, PipelineError> {
        let device_name = device_name_from_path(&self.path)?;
        let rows = CsvFileSource::new(&self.path).load()?;
        let stats = decode(&device_name, &rows)?;
        tracing::info!(
            device = %device_name,
            path = %self.path.display(),
            "loaded PDU statistics"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{pipeline::Sink, sinks::CsvFileSink};
    use pdu_core::domain::Statistics;
    use std::fs;

    #[test]
    fn encode_writes_header_and_nine_rows() {
        let mut stats = DeviceStatistics::new("A1");
        stats.set_rack(Line::L1, 0, Statistics::new(10.0, 11.0, 12.0));
        stats.set(Line::L3, StatKind::Avg, 17, 2.0 / 3.0);

        let rows = encode(&stats);
        assert_eq!(rows.len(), 10);
        assert!(rows.iter().all(|r| r.len() == 19));
        assert_eq!(rows[0][0], "Measurement Type");
        assert_eq!(rows[0][1], "Q1");
        assert_eq!(rows[0][18], "Q18");

        let labels: Vec<&str> = rows[1..].iter().map(|r| r[0].as_str()).collect();
        assert_eq!(
            labels,
            [
                "l1 min", "l1 avg", "l1 max", "l2 min", "l2 avg", "l2 max", "l3 min", "l3 avg",
                "l3 max"
            ]
        );
        assert_eq!(rows[2][1], "11.000");
        assert_eq!(rows[2][2], "0.000");
        assert_eq!(rows[8][18], "0.667");
    }

    #[test]
    fn decode_tolerates_short_and_unknown_records() {
        let mut rows = encode(&DeviceStatistics::new("B1"));
        rows[1][5] = " 4.250 ".to_string();
        rows[2][1] = "garbage".to_string();
        rows.push(vec!["l1 max".to_string(), "99".to_string()]);
        rows.push({
            let mut r = vec!["total".to_string()];
            r.extend(std::iter::repeat("1".to_string()).take(18));
            r
        });

        let stats = decode("B1", &rows).unwrap();
        assert_eq!(stats.get(Line::L1, StatKind::Min, 4), 4.25);
        assert_eq!(stats.get(Line::L1, StatKind::Avg, 0), 0.0);
        assert_eq!(stats.get(Line::L1, StatKind::Max, 0), 0.0);
    }

    #[test]
    fn decode_needs_ten_records() {
        let rows = encode(&DeviceStatistics::new("A1"));
        assert!(matches!(decode("A1", &rows[..9]), Err(PipelineError::Load(_))));
    }

    #[test]
    fn device_name_from_file_name() {
        let name = |p: &str| device_name_from_path(Path::new(p)).ok();
        assert_eq!(name("total_a1.csv").as_deref(), Some("A1"));
        assert_eq!(name("out/TOTAL_B12.csv").as_deref(), Some("B12"));
        assert_eq!(name("c3.csv").as_deref(), Some("C3"));
        assert_eq!(name("stats/total_d1.csv"), None);
        assert_eq!(name("summary.csv"), None);
    }

    #[test]
    fn written_stats_load_back_with_file_name_device() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("total_a2.csv");
        let mut stats = DeviceStatistics::new("ignored");
        stats.set_rack(Line::L2, 3, Statistics::new(1.5, 2.25, 3.125));

        CsvFileSink::new(&path).write(&stats).unwrap();
        let header = fs::read_to_string(&path).unwrap();
        assert!(header.starts_with("Measurement Type,Q1,Q2,"));

        let loaded = StatsCsvSource::new(&path).load().unwrap();
        assert_eq!(loaded.device_name, "A2");
        assert_eq!(loaded.rack(Line::L2, 3), Statistics::new(1.5, 2.25, 3.125));
    }
}
