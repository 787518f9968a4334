//! Purpose: Typed read-only lookups over a decoded series' label map.
//! Exports: Label accessors on `DecodedSeries`, `LABEL_PREFIX`, `ANNOTATION_PREFIX`.
//! Role: Consumer-facing view; downstream cost logic reads labels only through here.
//! Invariants: Non-string values are rejected by strict lookups, never stringified.
//! Invariants: Prefix maps are best-effort; malformed entries are skipped with a sink warning.
use std::collections::HashMap;

use super::error::{Error, ErrorKind};
use super::series::DecodedSeries;
use super::value;
use super::warning::{LogSink, WarningSink};

pub const LABEL_PREFIX: &str = "label_";
pub const ANNOTATION_PREFIX: &str = "annotation_";

impl DecodedSeries {
    pub fn get_string(&self, field: &str) -> Result<&str, Error> {
        let raw = self
            .labels
            .get(field)
            .ok_or_else(|| Error::new(ErrorKind::FieldMissing).with_field(field))?;
        value::string(raw).ok_or_else(|| {
            Error::new(ErrorKind::FieldFormat)
                .with_field(field)
                .with_snapshot(value::render(raw))
        })
    }

    /// Strict lookup of several fields; fails on the first bad one.
    pub fn get_strings(&self, fields: &[&str]) -> Result<HashMap<String, String>, Error> {
        let mut values = HashMap::with_capacity(fields.len());
        for field in fields {
            let value = self.get_string(field)?;
            values.insert(field.to_string(), value.to_string());
        }
        Ok(values)
    }

    pub fn get_labels(&self) -> HashMap<String, String> {
        self.get_labels_with(&LogSink)
    }

    pub fn get_labels_with(&self, sink: &dyn WarningSink) -> HashMap<String, String> {
        self.prefixed(LABEL_PREFIX, sink)
    }

    pub fn get_annotations(&self) -> HashMap<String, String> {
        self.get_annotations_with(&LogSink)
    }

    pub fn get_annotations_with(&self, sink: &dyn WarningSink) -> HashMap<String, String> {
        self.prefixed(ANNOTATION_PREFIX, sink)
    }

    fn prefixed(&self, prefix: &str, sink: &dyn WarningSink) -> HashMap<String, String> {
        let mut result = HashMap::new();
        let mut rendering: Option<String> = None;
        for (key, raw) in &self.labels {
            let Some(name) = key.strip_prefix(prefix) else {
                continue;
            };
            match value::string(raw) {
                Some(text) => {
                    result.insert(name.to_string(), text.to_string());
                }
                None => {
                    let labels = rendering.get_or_insert_with(|| self.labels_rendering());
                    let message = format!("Failed to parse label value for label: '{name}'");
                    // Accessors run after decode and have no query context.
                    sink.warn(&message, "", labels);
                }
            }
        }
        result
    }
}
