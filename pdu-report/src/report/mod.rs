//! Monthly report: base grid selection, section lookup and section filling.

pub mod filler;
pub mod loader;
pub mod locator;
pub mod stats_csv;

use pdu_core::domain::{DeviceSection, DeviceStatistics, ReportGrid};

use crate::pipeline::{PipelineError, Transform};

pub use filler::{fill_section, section_has_data, stat_column, summarize};
pub use loader::BaseGrid;
pub use locator::{find_section, locate_sections, SECTION_MARKER};
pub use stats_csv::StatsCsvSource;

/// A loaded report grid together with the device sections found in it.
#[derive(Debug, Clone)]
pub struct MonthlyReport {
    grid: ReportGrid,
    sections: Vec<DeviceSection>,
}

/// What a single fill did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillOutcome {
    pub section: DeviceSection,
    /// The section already held data that has now been replaced.
    pub overwrote_existing: bool,
}

/// Report grid after one device was merged in.
#[derive(Debug, Clone)]
pub struct FilledReport {
    pub grid: ReportGrid,
    pub outcome: FillOutcome,
}

impl MonthlyReport {
    pub fn new(grid: ReportGrid) -> Self {
        let sections = locate_sections(&grid);
        tracing::info!(
            rows = grid.len(),
            sections = sections.len(),
            "monthly report loaded"
        );
        Self { grid, sections }
    }

    pub fn grid(&self) -> &ReportGrid {
        &self.grid
    }

    pub fn sections(&self) -> &[DeviceSection] {
        &self.sections
    }

    pub fn find_section(&self, device_name: &str) -> Result<&DeviceSection, PipelineError> {
        find_section(&self.sections, device_name)
    }

    /// Merge one device's statistics into its section.
    ///
    /// Overwriting a section that already holds data is allowed and only
    /// logged as a warning.
    pub fn fill(&mut self, stats: &DeviceStatistics) -> Result<FillOutcome, PipelineError> {
        let section = self.find_section(&stats.device_name)?.clone();

        let overwrote_existing = section_has_data(&self.grid, &section);
        if overwrote_existing {
            tracing::warn!(
                device = %section.device_name,
                "PDU section already contains data - it will be overwritten"
            );
        }

        tracing::info!(
            device = %section.device_name,
            start_row = section.start_row,
            end_row = section.end_row,
            "filling PDU section"
        );
        fill_section(&mut self.grid, &section, stats)?;

        Ok(FillOutcome {
            section,
            overwrote_existing,
        })
    }

    pub fn into_grid(self) -> ReportGrid {
        self.grid
    }
}

/// Base grid -> grid with one device's section filled.
pub struct SectionFill {
    pub statistics: DeviceStatistics,
}

impl SectionFill {
    pub fn new(statistics: DeviceStatistics) -> Self {
        Self { statistics }
    }
}

impl Transform<ReportGrid, FilledReport> for SectionFill {
    fn apply(&self, grid: ReportGrid) -> Result<FilledReport, PipelineError> {
        let mut report = MonthlyReport::new(grid);
        let outcome = report.fill(&self.statistics)?;
        Ok(FilledReport {
            grid: report.into_grid(),
            outcome,
        })
    }
}
