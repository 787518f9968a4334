//! Purpose: Parse one raw `[timestamp, "value"]` pair into a sanitized sample.
//! Exports: `Sample`, `parse_sample`, `quantize_timestamp`.
//! Role: Leaf of the decode pipeline; pure, no logging.
//! Invariants: A returned sample value is always finite (Inf/NaN become 0.0 plus a warning).
//! Invariants: Timestamps are rounded onto the 10-unit scrape grid.
use serde::Serialize;
use serde_json::Value;

use super::error::{Error, ErrorKind};
use super::value;
use super::warning::Warning;

const TIMESTAMP_GRID: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Sample {
    pub timestamp: f64,
    pub value: f64,
}

pub fn quantize_timestamp(timestamp: f64) -> f64 {
    (timestamp / TIMESTAMP_GRID).round() * TIMESTAMP_GRID
}

pub fn parse_sample(query: &str, raw: &Value) -> Result<(Sample, Option<Warning>), Error> {
    let pair = value::array(raw)
        .filter(|pair| pair.len() == 2)
        .ok_or_else(|| data_point_error(query, raw))?;
    let timestamp = value::number(&pair[0]).ok_or_else(|| data_point_error(query, raw))?;
    // Values arrive stringified to keep full precision.
    let text = value::string(&pair[1]).ok_or_else(|| data_point_error(query, raw))?;

    let parsed = text.parse::<f64>().map_err(|err| {
        Error::new(ErrorKind::ValueParse)
            .with_query(query)
            .with_snapshot(value::render(raw))
            .with_source(err)
    })?;

    let (value, warning) = if parsed.is_infinite() {
        (0.0, Some(Warning::Inf))
    } else if parsed.is_nan() {
        (0.0, Some(Warning::NaN))
    } else {
        (parsed, None)
    };

    Ok((
        Sample {
            timestamp: quantize_timestamp(timestamp),
            value,
        },
        warning,
    ))
}

fn data_point_error(query: &str, raw: &Value) -> Error {
    Error::new(ErrorKind::DataPointFormat)
        .with_query(query)
        .with_snapshot(value::render(raw))
}
