use std::path::PathBuf;

use calamine::{open_workbook_auto, Data, Range, Reader};

use crate::pipeline::{PipelineError, Rows, Source};

/// Reads the first worksheet of a workbook (xlsx, xlsm, xls, ods) as text rows.
pub struct XlsxSheetSource {
    path: PathBuf,
}

impl XlsxSheetSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl Source<Rows> for XlsxSheetSource {
    fn load(&self) -> Result<Rows, PipelineError> {
        let mut workbook = open_workbook_auto(&self.path).map_err(|e| {
            PipelineError::Load(format!("failed to open workbook {}: {e}", self.path.display()))
        })?;

        let sheet = workbook.sheet_names().first().cloned().ok_or_else(|| {
            PipelineError::Load(format!("no sheets found in {}", self.path.display()))
        })?;

        let range = workbook.worksheet_range(&sheet).map_err(|e| {
            PipelineError::Load(format!(
                "failed to get rows of sheet '{sheet}' from {}: {e}",
                self.path.display()
            ))
        })?;

        let rows = range_to_rows(&range);
        tracing::debug!(
            path = %self.path.display(),
            sheet = %sheet,
            rows = rows.len(),
            "worksheet rows loaded"
        );
        Ok(rows)
    }
}

/// Flatten a worksheet range into text rows anchored at A1.
///
/// calamine trims the range to the used area, so leading empty rows and
/// columns are put back to keep row and column indices positional. Trailing
/// empty cells are dropped from each row.
pub(crate) fn range_to_rows(range: &Range<Data>) -> Rows {
    let Some((first_row, first_col)) = range.start() else {
        return Vec::new();
    };

    let mut rows: Rows = vec![Vec::new(); first_row as usize];
    for cells in range.rows() {
        let mut row = vec![String::new(); first_col as usize];
        row.extend(cells.iter().map(cell_to_string));
        while row.last().is_some_and(|s| s.is_empty()) {
            row.pop();
        }
        rows.push(row);
    }
    rows
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#ERR:{e:?}"),
    }
}
