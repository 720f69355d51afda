use std::ops::Range;

use crate::domain::measurement::RACK_COUNT;

/// Every report row is padded to at least this many columns; the right-most
/// written column is the rack summary max at index 14.
pub const MIN_REPORT_COLUMNS: usize = 15;

/// A single report cell.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cell {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Reinterpret loaded text: empty stays empty, anything that parses as a
    /// float becomes a number, everything else is kept verbatim as text.
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            Cell::Empty
        } else if let Ok(value) = raw.parse::<f64>() {
            Cell::Number(value)
        } else {
            Cell::Text(raw.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Output form: numbers with three decimals, text as-is, empty as "".
    pub fn render(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(v) => format!("{v:.3}"),
            Cell::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// Pad a row with empty cells up to [`MIN_REPORT_COLUMNS`].
pub fn pad_row(row: &mut Vec<Cell>) {
    if row.len() < MIN_REPORT_COLUMNS {
        row.resize(MIN_REPORT_COLUMNS, Cell::Empty);
    }
}

/// In-memory monthly report: positional rows of typed cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportGrid {
    rows: Vec<Vec<Cell>>,
}

impl ReportGrid {
    pub fn new(mut rows: Vec<Vec<Cell>>) -> Self {
        rows.iter_mut().for_each(pad_row);
        Self { rows }
    }

    /// Build a grid from loaded text rows, reinterpreting every cell.
    pub fn from_text_rows<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|cell| Cell::parse(cell.as_ref())).collect())
            .collect();
        Self::new(rows)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Mutable access to a row, re-padded to [`MIN_REPORT_COLUMNS`].
    pub fn row_mut(&mut self, index: usize) -> Option<&mut Vec<Cell>> {
        let row = self.rows.get_mut(index)?;
        pad_row(row);
        Some(row)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn to_text_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(Cell::render).collect())
            .collect()
    }

    /// blake3 digest over the rendered grid, stable for identical output.
    pub fn digest(&self) -> String {
        let mut h = blake3::Hasher::new();
        h.update(&(self.rows.len() as u64).to_le_bytes());
        for row in &self.rows {
            h.update(&(row.len() as u32).to_le_bytes());
            for cell in row {
                let rendered = cell.render();
                h.update(&(rendered.len() as u32).to_le_bytes());
                h.update(rendered.as_bytes());
            }
        }
        h.finalize().to_hex().to_string()
    }
}

/// Location of one device's 18-row block inside a [`ReportGrid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSection {
    pub device_name: String,
    pub header_row: usize,
    /// Row of rack Q1.
    pub start_row: usize,
    /// Row of rack Q18 (inclusive).
    pub end_row: usize,
}

impl DeviceSection {
    pub fn at_header<S: Into<String>>(device_name: S, header_row: usize) -> Self {
        let start_row = header_row + 1;
        Self {
            device_name: device_name.into(),
            header_row,
            start_row,
            end_row: start_row + RACK_COUNT - 1,
        }
    }

    pub fn data_rows(&self) -> Range<usize> {
        self.start_row..self.end_row + 1
    }

    pub fn rack_row(&self, rack: usize) -> usize {
        self.start_row + rack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_are_reinterpreted_on_load() {
        assert_eq!(Cell::parse(""), Cell::Empty);
        assert_eq!(Cell::parse("12.5"), Cell::Number(12.5));
        assert_eq!(Cell::parse("-3"), Cell::Number(-3.0));
        assert_eq!(Cell::parse("PDU A1"), Cell::Text("PDU A1".to_string()));
        assert_eq!(Cell::parse(" 4"), Cell::Text(" 4".to_string()));
    }

    #[test]
    fn cells_render_with_three_decimals() {
        assert_eq!(Cell::Number(12.0 + 2.0 / 3.0).render(), "12.667");
        assert_eq!(Cell::Number(0.0).render(), "0.000");
        assert_eq!(Cell::Text("Rack".into()).render(), "Rack");
        assert_eq!(Cell::Empty.render(), "");
    }

    #[test]
    fn grid_rows_are_padded() {
        let grid = ReportGrid::from_text_rows(vec![vec!["PDU A1"], vec![]]);
        assert_eq!(grid.len(), 2);
        assert!(grid.rows().iter().all(|r| r.len() == MIN_REPORT_COLUMNS));

        let wide: Vec<String> = (0..20).map(|i| i.to_string()).collect();
        let grid = ReportGrid::from_text_rows(vec![wide]);
        assert_eq!(grid.rows()[0].len(), 20);
    }

    #[test]
    fn digest_tracks_rendered_content() {
        let a = ReportGrid::from_text_rows(vec![vec!["PDU A1", "1.0"]]);
        let b = ReportGrid::from_text_rows(vec![vec!["PDU A1", "1"]]);
        let c = ReportGrid::from_text_rows(vec![vec!["PDU A1", "2"]]);
        assert_eq!(a.digest(), b.digest());
        assert_ne!(a.digest(), c.digest());
    }

    #[test]
    fn section_spans_eighteen_rows_after_header() {
        let section = DeviceSection::at_header("A1", 5);
        assert_eq!(section.start_row, 6);
        assert_eq!(section.end_row, 23);
        assert_eq!(section.data_rows().len(), RACK_COUNT);
        assert_eq!(section.rack_row(0), 6);
    }
}
