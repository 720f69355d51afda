use crate::domain::measurement::{Line, StatKind, RACK_COUNT};

/// Summary of one sample series.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Statistics {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
}

impl Statistics {
    /// Sentinel for a series with no samples.
    pub const ZERO: Statistics = Statistics {
        min: 0.0,
        avg: 0.0,
        max: 0.0,
    };

    pub fn new(min: f64, avg: f64, max: f64) -> Self {
        Self { min, avg, max }
    }

    pub fn get(&self, kind: StatKind) -> f64 {
        match kind {
            StatKind::Min => self.min,
            StatKind::Avg => self.avg,
            StatKind::Max => self.max,
        }
    }
}

/// Reduce a sample series to min, average and max.
///
/// The first sample seeds both extremes; the average is a plain sum in
/// encounter order divided by the count. An empty series yields
/// [`Statistics::ZERO`].
pub fn reduce(series: &[f64]) -> Statistics {
    let Some(&first) = series.first() else {
        return Statistics::ZERO;
    };

    let mut min = first;
    let mut max = first;
    let mut sum = 0.0;
    for &value in series {
        if value < min {
            min = value;
        }
        if value > max {
            max = value;
        }
        sum += value;
    }

    Statistics {
        min,
        avg: sum / series.len() as f64,
        max,
    }
}

/// Per-device matrix of reduced values: 3 lines x 3 stat kinds x 18 racks.
///
/// Racks that never received samples hold zero.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceStatistics {
    pub device_name: String,
    values: [[[f64; RACK_COUNT]; 3]; 3],
}

impl DeviceStatistics {
    pub fn new<S: Into<String>>(device_name: S) -> Self {
        Self {
            device_name: device_name.into(),
            values: [[[0.0; RACK_COUNT]; 3]; 3],
        }
    }

    pub fn get(&self, line: Line, kind: StatKind, rack: usize) -> f64 {
        self.values[line.index()][kind.index()][rack]
    }

    pub fn set(&mut self, line: Line, kind: StatKind, rack: usize, value: f64) {
        self.values[line.index()][kind.index()][rack] = value;
    }

    /// All 18 rack values for one measurement row.
    pub fn series(&self, line: Line, kind: StatKind) -> &[f64; RACK_COUNT] {
        &self.values[line.index()][kind.index()]
    }

    pub fn series_mut(&mut self, line: Line, kind: StatKind) -> &mut [f64; RACK_COUNT] {
        &mut self.values[line.index()][kind.index()]
    }

    pub fn rack(&self, line: Line, rack: usize) -> Statistics {
        Statistics {
            min: self.get(line, StatKind::Min, rack),
            avg: self.get(line, StatKind::Avg, rack),
            max: self.get(line, StatKind::Max, rack),
        }
    }

    pub fn set_rack(&mut self, line: Line, rack: usize, stats: Statistics) {
        for kind in StatKind::ALL {
            self.set(line, kind, rack, stats.get(kind));
        }
    }

    /// The nine measurement rows in external order: l1 min, l1 avg, l1 max, l2 min, ...
    pub fn rows(&self) -> impl Iterator<Item = (Line, StatKind, &[f64; RACK_COUNT])> + '_ {
        Line::ALL.into_iter().flat_map(move |line| {
            StatKind::ALL
                .into_iter()
                .map(move |kind| (line, kind, self.series(line, kind)))
        })
    }
}
