pub mod measurement;
pub mod report;
pub mod statistics;

pub use measurement::{rack_label, Line, MeasurementKey, StatKind, UnknownLine, RACK_COUNT};
pub use report::{Cell, DeviceSection, ReportGrid, MIN_REPORT_COLUMNS};
pub use statistics::{reduce, DeviceStatistics, Statistics};
