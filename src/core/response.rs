//! Purpose: Validate a top-level query response and decode every series in it.
//! Exports: `ResultSet`, `DecodeOptions`, `decode_response`.
//! Role: Root of the decode pipeline; document in, ordered result set (or first error) out.
//! Invariants: First fatal error wins; no partial result set is ever returned.
//! Invariants: Result entry order and sample order follow the wire document exactly.
use serde::Serialize;
use serde_json::Value;

use super::error::{Error, ErrorKind};
use super::series::{DecodedSeries, decode_series};
use super::value;
use super::warning::{DEFAULT_MAX_REPEATS, DedupedSink, WarningSink};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResultSet {
    pub query: String,
    pub series: Vec<DecodedSeries>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn into_series(self) -> Vec<DecodedSeries> {
        self.series
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DecodeOptions {
    pub max_repeats: usize,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self {
            max_repeats: DEFAULT_MAX_REPEATS,
        }
    }

    pub fn sink(&self) -> DedupedSink {
        DedupedSink::new(self.max_repeats)
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new()
    }
}

pub fn decode_response(
    query: &str,
    raw: Option<&Value>,
    sink: &dyn WarningSink,
) -> Result<ResultSet, Error> {
    let raw = match raw {
        None | Some(Value::Null) => {
            return Err(Error::new(ErrorKind::NoData).with_query(query));
        }
        Some(raw) => raw,
    };

    let data = match value::object(raw).and_then(|doc| doc.get("data")) {
        Some(data) => data,
        None => return Err(engine_error(query, raw)),
    };
    let data =
        value::object(data).ok_or_else(|| shape_error(ErrorKind::DataFieldFormat, query, data))?;

    let result = data.get("result").ok_or_else(|| {
        Error::new(ErrorKind::ResultFieldMissing)
            .with_query(query)
            .with_snapshot(value::render(&Value::Object(data.clone())))
    })?;
    let entries = value::array(result)
        .ok_or_else(|| shape_error(ErrorKind::ResultFieldFormat, query, result))?;

    let mut series = Vec::with_capacity(entries.len());
    for raw_entry in entries {
        let entry = value::object(raw_entry)
            .ok_or_else(|| shape_error(ErrorKind::ResultEntryFormat, query, raw_entry))?;
        series.push(decode_series(query, entry, sink)?);
    }

    Ok(ResultSet {
        query: query.to_string(),
        series,
    })
}

/// Interpret a document without `data` as an engine-reported error.
fn engine_error(query: &str, raw: &Value) -> Error {
    match value::object(raw)
        .and_then(|doc| doc.get("error"))
        .and_then(value::string)
    {
        Some(message) => Error::new(ErrorKind::QueryEngine)
            .with_message(format!("'{message}' parsing query '{query}'"))
            .with_query(query)
            .with_snapshot(message),
        None => shape_error(ErrorKind::UnexpectedResponse, query, raw),
    }
}

fn shape_error(kind: ErrorKind, query: &str, raw: &Value) -> Error {
    Error::new(kind)
        .with_query(query)
        .with_snapshot(value::render(raw))
}
