use std::collections::HashMap;

use pdu_core::domain::{Line, MeasurementKey};

/// Header fragments with fewer tokens than this are not measurement columns.
const MIN_HEADER_TOKENS: usize = 5;

/// Column layout recovered from the first row of a device export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderMap {
    /// Device named by the first measurement column; empty if none was found.
    pub device_name: String,
    pub columns: HashMap<MeasurementKey, usize>,
    /// Device names seen in later columns that differ from `device_name`.
    pub foreign_devices: Vec<String>,
}

/// Parse a device export header row such as `A1 Q1 Current : l1`.
///
/// Column 0 is the timestamp label and never maps to a measurement. Token 0
/// is the device, token 1 the rack and the last token the line. A repeated
/// (rack, line) pair maps to its right-most column.
pub fn parse_header<S: AsRef<str>>(header: &[S]) -> HeaderMap {
    let mut map = HeaderMap::default();

    for (index, raw) in header.iter().enumerate().skip(1) {
        let raw = raw.as_ref().trim();
        if raw.is_empty() {
            continue;
        }

        let tokens: Vec<&str> = raw.split_whitespace().collect();
        if tokens.len() < MIN_HEADER_TOKENS {
            continue;
        }

        let device = tokens[0];
        if map.device_name.is_empty() {
            map.device_name = device.to_string();
        } else if device != map.device_name && !map.foreign_devices.iter().any(|d| d == device) {
            map.foreign_devices.push(device.to_string());
        }

        let Ok(line) = tokens[tokens.len() - 1].parse::<Line>() else {
            tracing::debug!(column = index, header = raw, "header has no line identifier");
            continue;
        };
        map.columns.insert(MeasurementKey::new(tokens[1], line), index);
    }

    map
}
