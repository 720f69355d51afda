pub mod csv_file;
pub mod xlsx_sheet;

use std::path::Path;

pub use csv_file::CsvFileSource;
pub use xlsx_sheet::XlsxSheetSource;

use crate::pipeline::{Rows, Source};

/// True when the path carries a `.csv` extension (any case).
pub fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Pick the row reader for a path: CSV for `.csv`, spreadsheet otherwise.
pub fn open_rows(path: &Path) -> Box<dyn Source<Rows>> {
    if is_csv(path) {
        Box::new(CsvFileSource::new(path))
    } else {
        Box::new(XlsxSheetSource::new(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_detection_ignores_case() {
        assert!(is_csv(Path::new("total_a1.csv")));
        assert!(is_csv(Path::new("out/REPORT.CSV")));
        assert!(!is_csv(Path::new("monthlyjune2025.xlsx")));
        assert!(!is_csv(Path::new("csv")));
    }
}
