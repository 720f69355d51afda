//! Device export -> statistics matrix.

pub mod aggregate;
pub mod header;

pub use aggregate::{aggregate_export, AggregateReport, MeasurementAggregator};
pub use header::{parse_header, HeaderMap};
