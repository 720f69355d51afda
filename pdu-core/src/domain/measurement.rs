use std::{fmt, str::FromStr};

/// Number of racks (Q1..Q18) every device section holds.
pub const RACK_COUNT: usize = 18;

/// One of the three electrical phases of a PDU circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Line {
    L1,
    L2,
    L3,
}

impl Line {
    pub const ALL: [Line; 3] = [Line::L1, Line::L2, Line::L3];

    pub fn as_str(self) -> &'static str {
        match self {
            Line::L1 => "l1",
            Line::L2 => "l2",
            Line::L3 => "l3",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Line::L1 => 0,
            Line::L2 => 1,
            Line::L3 => 2,
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown line identifier '{0}'")]
pub struct UnknownLine(pub String);

impl FromStr for Line {
    type Err = UnknownLine;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Line::ALL
            .into_iter()
            .find(|line| line.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownLine(s.to_string()))
    }
}

/// Which reduction of a sample series a value holds.
///
/// Declaration order is the external row order: min, avg, max.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StatKind {
    Min,
    Avg,
    Max,
}

impl StatKind {
    pub const ALL: [StatKind; 3] = [StatKind::Min, StatKind::Avg, StatKind::Max];

    pub fn as_str(self) -> &'static str {
        match self {
            StatKind::Min => "min",
            StatKind::Avg => "avg",
            StatKind::Max => "max",
        }
    }

    pub fn index(self) -> usize {
        match self {
            StatKind::Min => 0,
            StatKind::Avg => 1,
            StatKind::Max => 2,
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single circuit/phase combination within one device export.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeasurementKey {
    pub rack: String,
    pub line: Line,
}

impl MeasurementKey {
    pub fn new<R: Into<String>>(rack: R, line: Line) -> Self {
        Self {
            rack: rack.into(),
            line,
        }
    }

    /// Key for the zero-based rack index, e.g. index 0 on L1 is `Q1_l1`.
    pub fn for_rack_index(index: usize, line: Line) -> Self {
        Self::new(rack_label(index), line)
    }
}

impl fmt::Display for MeasurementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.rack, self.line)
    }
}

/// Label of the zero-based rack index: 0 -> "Q1", 17 -> "Q18".
pub fn rack_label(index: usize) -> String {
    format!("Q{}", index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_parses_case_insensitively() {
        assert_eq!("l1".parse::<Line>(), Ok(Line::L1));
        assert_eq!("L2".parse::<Line>(), Ok(Line::L2));
        assert_eq!(" l3 ".parse::<Line>(), Ok(Line::L3));
        assert!(matches!("l4".parse::<Line>(), Err(UnknownLine(_))));
        assert!("Current".parse::<Line>().is_err());
    }

    #[test]
    fn measurement_key_renders_rack_and_line() {
        let key = MeasurementKey::for_rack_index(0, Line::L1);
        assert_eq!(key.to_string(), "Q1_l1");
        assert_eq!(MeasurementKey::new("Q18", Line::L3).to_string(), "Q18_l3");
    }

    #[test]
    fn orderings_follow_report_layout() {
        let kinds: Vec<&str> = StatKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(kinds, ["min", "avg", "max"]);
        let lines: Vec<usize> = Line::ALL.iter().map(|l| l.index()).collect();
        assert_eq!(lines, [0, 1, 2]);
        assert_eq!(rack_label(RACK_COUNT - 1), "Q18");
    }
}
