use pdu_core::domain::{
    Cell, DeviceSection, DeviceStatistics, Line, ReportGrid, StatKind, Statistics, RACK_COUNT,
};

use crate::pipeline::PipelineError;

// Rack summary columns, right of the per-line block.
pub const SUMMARY_MIN_COLUMN: usize = 12;
pub const SUMMARY_AVG_COLUMN: usize = 13;
pub const SUMMARY_MAX_COLUMN: usize = 14;

/// Report column holding one line's reduced value.
pub const fn stat_column(line: Line, kind: StatKind) -> usize {
    match (line, kind) {
        (Line::L1, StatKind::Min) => 3,
        (Line::L1, StatKind::Avg) => 4,
        (Line::L1, StatKind::Max) => 5,
        (Line::L2, StatKind::Min) => 6,
        (Line::L2, StatKind::Avg) => 7,
        (Line::L2, StatKind::Max) => 8,
        (Line::L3, StatKind::Min) => 9,
        (Line::L3, StatKind::Avg) => 10,
        (Line::L3, StatKind::Max) => 11,
    }
}

/// Cross-line rack summary built from already-reduced per-line values.
///
/// The average is the unweighted mean of the three line averages, whatever
/// each line's sample count was.
pub fn summarize(l1: Statistics, l2: Statistics, l3: Statistics) -> Statistics {
    let mut min = l1.min;
    if l2.min < min {
        min = l2.min;
    }
    if l3.min < min {
        min = l3.min;
    }

    let mut max = l1.max;
    if l2.max > max {
        max = l2.max;
    }
    if l3.max > max {
        max = l3.max;
    }

    Statistics {
        min,
        avg: (l1.avg + l2.avg + l3.avg) / 3.0,
        max,
    }
}

/// True when the section's Q1 row already holds an L1 min value.
pub fn section_has_data(grid: &ReportGrid, section: &DeviceSection) -> bool {
    grid.cell(section.start_row, stat_column(Line::L1, StatKind::Min))
        .is_some_and(|cell| !cell.is_empty())
}

/// Write one device's matrix into its section, Q1 at `start_row`.
///
/// Fails without touching the grid when the section runs past the last row.
pub fn fill_section(
    grid: &mut ReportGrid,
    section: &DeviceSection,
    stats: &DeviceStatistics,
) -> Result<(), PipelineError> {
    let last_row = section.rack_row(RACK_COUNT - 1);
    if last_row >= grid.len() {
        return Err(PipelineError::Range {
            row: section.start_row.max(grid.len()),
            len: grid.len(),
        });
    }

    for rack in 0..RACK_COUNT {
        let row_index = section.rack_row(rack);
        let len = grid.len();
        let row = grid
            .row_mut(row_index)
            .ok_or(PipelineError::Range { row: row_index, len })?;

        for line in Line::ALL {
            for kind in StatKind::ALL {
                row[stat_column(line, kind)] = Cell::Number(stats.get(line, kind, rack));
            }
        }

        let summary = summarize(
            stats.rack(Line::L1, rack),
            stats.rack(Line::L2, rack),
            stats.rack(Line::L3, rack),
        );
        row[SUMMARY_MIN_COLUMN] = Cell::Number(summary.min);
        row[SUMMARY_AVG_COLUMN] = Cell::Number(summary.avg);
        row[SUMMARY_MAX_COLUMN] = Cell::Number(summary.max);
    }

    metrics::counter!("monthly_report_sections_filled_total").increment(1);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdu_core::domain::MIN_REPORT_COLUMNS;

    fn template(marker_row: usize, rows: usize) -> ReportGrid {
        let rows = (0..rows).map(|i| {
            if i == marker_row {
                vec!["PDU A1".to_string()]
            } else if i > marker_row && i <= marker_row + RACK_COUNT {
                vec![format!("Q{}", i - marker_row), "rack".to_string()]
            } else {
                vec![]
            }
        });
        ReportGrid::from_text_rows(rows)
    }

    #[test]
    fn column_table_covers_three_to_eleven() {
        let mut columns: Vec<usize> = Line::ALL
            .into_iter()
            .flat_map(|l| StatKind::ALL.into_iter().map(move |k| stat_column(l, k)))
            .collect();
        assert_eq!(columns, (3..=11).collect::<Vec<_>>());
        columns.sort_unstable();
        columns.dedup();
        assert_eq!(columns.len(), 9);
    }

    #[test]
    fn summary_uses_line_extremes_and_mean_of_averages() {
        let summary = summarize(
            Statistics::new(10.0, 11.0, 12.0),
            Statistics::new(5.0, 6.0, 7.0),
            Statistics::new(20.0, 21.0, 22.0),
        );
        assert_eq!(summary.min, 5.0);
        assert_eq!(summary.max, 22.0);
        assert_eq!(format!("{:.3}", summary.avg), "12.667");
    }

    #[test]
    fn fills_rack_rows_and_summaries() {
        let mut grid = template(5, 30);
        let section = DeviceSection::at_header("A1", 5);
        let mut stats = DeviceStatistics::new("A1");
        stats.set_rack(Line::L1, 0, Statistics::new(10.0, 11.0, 12.0));
        stats.set_rack(Line::L2, 0, Statistics::new(5.0, 6.0, 7.0));
        stats.set_rack(Line::L3, 0, Statistics::new(20.0, 21.0, 22.0));

        assert!(!section_has_data(&grid, &section));
        fill_section(&mut grid, &section, &stats).unwrap();
        assert!(section_has_data(&grid, &section));

        let q1 = grid.row(6).unwrap();
        assert_eq!(q1[0], Cell::Text("Q1".to_string()));
        assert_eq!(q1[1], Cell::Text("rack".to_string()));
        assert_eq!(q1[3], Cell::Number(10.0));
        assert_eq!(q1[7], Cell::Number(6.0));
        assert_eq!(q1[11], Cell::Number(22.0));
        assert_eq!(q1[SUMMARY_MIN_COLUMN], Cell::Number(5.0));
        assert_eq!(q1[SUMMARY_AVG_COLUMN].render(), "12.667");
        assert_eq!(q1[SUMMARY_MAX_COLUMN], Cell::Number(22.0));

        let q18 = grid.row(23).unwrap();
        assert_eq!(q18[0], Cell::Text("Q18".to_string()));
        assert!(q18[3..MIN_REPORT_COLUMNS].iter().all(|c| *c == Cell::Number(0.0)));

        assert!(grid.row(24).unwrap().iter().all(Cell::is_empty));
        assert!(grid.row(5).unwrap()[3].is_empty());
    }

    #[test]
    fn short_template_is_a_range_error_and_untouched() {
        let mut grid = template(5, 20);
        let before = grid.clone();
        let section = DeviceSection::at_header("A1", 5);

        let res = fill_section(&mut grid, &section, &DeviceStatistics::new("A1"));
        assert!(matches!(res, Err(PipelineError::Range { row: 20, len: 20 })));
        assert_eq!(grid, before);
    }

    #[test]
    fn existing_text_counts_as_data() {
        let mut rows = vec![vec![String::new(); 4]; 20];
        rows[0][0] = "PDU A1".to_string();
        rows[1][3] = "n/a".to_string();
        let grid = ReportGrid::from_text_rows(rows);
        assert!(section_has_data(&grid, &DeviceSection::at_header("A1", 0)));
    }
}
