//! Purpose: Decode one `result` entry (metric labels + instant or range samples).
//! Exports: `DecodedSeries`, `decode_series`.
//! Role: Middle layer; owns warning emission because it knows the label set.
//! Invariants: The label map is stored unmodified; coercion happens in `metric` accessors.
//! Invariants: Warnings are emitted once per distinct kind per series, never per sample.
use serde::Serialize;
use serde_json::{Map, Value};

use super::error::{Error, ErrorKind};
use super::sample::{Sample, parse_sample};
use super::value;
use super::warning::{Warning, WarningSink};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DecodedSeries {
    pub(crate) labels: Map<String, Value>,
    pub(crate) samples: Vec<Sample>,
}

impl DecodedSeries {
    pub fn new(labels: Map<String, Value>, samples: Vec<Sample>) -> Self {
        Self { labels, samples }
    }

    pub fn labels(&self) -> &Map<String, Value> {
        &self.labels
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// `{key: value, ...}` rendering of the label set, keys sorted.
    pub fn labels_rendering(&self) -> String {
        render_labels(&self.labels)
    }
}

pub fn decode_series(
    query: &str,
    entry: &Map<String, Value>,
    sink: &dyn WarningSink,
) -> Result<DecodedSeries, Error> {
    let metric = entry.get("metric").ok_or_else(|| {
        Error::new(ErrorKind::MetricFieldMissing)
            .with_query(query)
            .with_snapshot(value::render(&Value::Object(entry.clone())))
    })?;
    let labels = value::object(metric).ok_or_else(|| {
        Error::new(ErrorKind::MetricFieldFormat)
            .with_query(query)
            .with_snapshot(value::render(metric))
    })?;

    let mut warnings: Vec<Warning> = Vec::new();
    let samples = match entry.get("values") {
        Some(values) => {
            let values = value::array(values).ok_or_else(|| {
                Error::new(ErrorKind::ValuesFieldFormat)
                    .with_query(query)
                    .with_snapshot(value::render(values))
            })?;
            let mut samples = Vec::with_capacity(values.len());
            for raw in values {
                let (sample, warning) = parse_sample(query, raw)?;
                if let Some(warning) = warning {
                    if !warnings.contains(&warning) {
                        warnings.push(warning);
                    }
                }
                samples.push(sample);
            }
            samples
        }
        None => {
            let raw = entry.get("value").ok_or_else(|| {
                Error::new(ErrorKind::ValueFieldMissing)
                    .with_query(query)
                    .with_snapshot(value::render(&Value::Object(entry.clone())))
            })?;
            let (sample, warning) = parse_sample(query, raw)?;
            warnings.extend(warning);
            vec![sample]
        }
    };

    if !warnings.is_empty() {
        let rendering = render_labels(labels);
        for warning in warnings {
            sink.warn(warning.message(), query, &rendering);
        }
    }

    Ok(DecodedSeries::new(labels.clone(), samples))
}

fn render_labels(labels: &Map<String, Value>) -> String {
    let pairs: Vec<String> = labels
        .iter()
        .map(|(key, raw)| format!("{key}: {}", value::render(raw)))
        .collect();
    format!("{{{}}}", pairs.join(", "))
}
