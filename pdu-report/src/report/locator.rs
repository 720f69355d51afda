use pdu_core::domain::{DeviceSection, ReportGrid};

use crate::pipeline::PipelineError;

/// Column-0 prefix that opens a device section, e.g. `PDU A1`.
pub const SECTION_MARKER: &str = "PDU ";

/// Find every device section in one forward pass over the grid.
///
/// Ranges are not checked against the grid length here; a section running
/// past the last row only fails when it is filled.
pub fn locate_sections(grid: &ReportGrid) -> Vec<DeviceSection> {
    let mut sections = Vec::new();

    for (index, row) in grid.rows().iter().enumerate() {
        let Some(name) = row
            .first()
            .and_then(|cell| cell.as_text())
            .and_then(|text| text.strip_prefix(SECTION_MARKER))
        else {
            continue;
        };

        let section = DeviceSection::at_header(name, index);
        tracing::debug!(
            device = %section.device_name,
            header_row = section.header_row,
            start_row = section.start_row,
            end_row = section.end_row,
            "found PDU section"
        );
        sections.push(section);
    }

    sections
}

/// First section whose device name matches exactly.
pub fn find_section<'a>(
    sections: &'a [DeviceSection],
    device_name: &str,
) -> Result<&'a DeviceSection, PipelineError> {
    sections
        .iter()
        .find(|s| s.device_name == device_name)
        .ok_or_else(|| PipelineError::SectionNotFound(device_name.to_string()))
}
