//! Purpose: Advisory warnings produced while decoding samples, and the sinks that receive them.
//! Exports: `Warning`, `WarningSink`, `LogSink`, `DedupedSink`, `RecordingSink`, limits.
//! Role: Injected capability; the decoder never owns global warning state.
//! Invariants: Warnings are observational only and never change decode results.
//! Invariants: `DedupedSink` emits a given (message, query, labels) triple at most `max_repeats` times.
//! Invariants: `DedupedSink` tracks at most `max_keys` triples; the table resets when full.
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;

pub const DEFAULT_MAX_REPEATS: usize = 5;
pub const DEFAULT_MAX_KEYS: usize = 10_000;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Warning {
    Inf,
    NaN,
}

impl Warning {
    pub fn message(self) -> &'static str {
        match self {
            Warning::Inf => "Found Inf value parsing vector data point for metric",
            Warning::NaN => "Found NaN value parsing vector data point for metric",
        }
    }
}

pub trait WarningSink {
    fn warn(&self, message: &str, query: &str, labels: &str);
}

/// Logs every warning through `tracing`, without de-duplication.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl WarningSink for LogSink {
    fn warn(&self, message: &str, query: &str, labels: &str) {
        tracing::warn!(query, labels, "{message}");
    }
}

/// Logs through `tracing`, suppressing a triple after `max_repeats` emissions.
#[derive(Debug)]
pub struct DedupedSink {
    max_repeats: usize,
    max_keys: usize,
    seen: Mutex<HashMap<u64, usize>>,
}

impl DedupedSink {
    pub fn new(max_repeats: usize) -> Self {
        Self::with_max_keys(max_repeats, DEFAULT_MAX_KEYS)
    }

    pub fn with_max_keys(max_repeats: usize, max_keys: usize) -> Self {
        Self {
            max_repeats,
            max_keys: max_keys.max(1),
            seen: Mutex::new(HashMap::new()),
        }
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        match self.seen.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    fn admit(&self, message: &str, query: &str, labels: &str) -> bool {
        let mut hasher = DefaultHasher::new();
        (message, query, labels).hash(&mut hasher);
        let key = hasher.finish();

        let mut seen = match self.seen.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if !seen.contains_key(&key) && seen.len() >= self.max_keys {
            seen.clear();
        }
        let count = seen.entry(key).or_insert(0);
        if *count >= self.max_repeats {
            return false;
        }
        *count += 1;
        true
    }
}

impl Default for DedupedSink {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REPEATS)
    }
}

impl WarningSink for DedupedSink {
    fn warn(&self, message: &str, query: &str, labels: &str) {
        if self.admit(message, query, labels) {
            LogSink.warn(message, query, labels);
        }
    }
}

/// Keeps every triple in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<(String, String, String)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(String, String, String)> {
        match self.records.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl WarningSink for RecordingSink {
    fn warn(&self, message: &str, query: &str, labels: &str) {
        let mut records = match self.records.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        records.push((message.to_string(), query.to_string(), labels.to_string()));
    }
}
