//! Purpose: Single error model for response decoding, label lookups and result handoff.
//! Exports: `Error`, `ErrorKind`, `to_exit_code`.
//! Role: Every fatal failure in the crate is an `Error` tagged with one `ErrorKind`.
//! Invariants: Errors carry enough context (query, field, raw snapshot) to debug from logs.
//! Invariants: Kinds are stable; exit code mapping never changes for an existing kind.
use std::error::Error as StdError;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    NoData,
    QueryEngine,
    UnexpectedResponse,
    DataFieldFormat,
    ResultFieldMissing,
    ResultFieldFormat,
    ResultEntryFormat,
    MetricFieldMissing,
    MetricFieldFormat,
    ValueFieldMissing,
    ValuesFieldFormat,
    DataPointFormat,
    ValueParse,
    FieldMissing,
    FieldFormat,
    Disconnected,
    InputParse,
    Usage,
    Io,
}

impl ErrorKind {
    /// Fixed description used when no explicit message is attached.
    pub fn description(self) -> &'static str {
        match self {
            ErrorKind::NoData => "No data returned for query",
            ErrorKind::QueryEngine => "Query engine reported an error",
            ErrorKind::UnexpectedResponse => {
                "Error parsing Prometheus response: unexpected response"
            }
            ErrorKind::DataFieldFormat => {
                "Error parsing Prometheus response: 'data' field improperly formatted"
            }
            ErrorKind::ResultFieldMissing => {
                "Error parsing Prometheus response: 'result' field does not exist"
            }
            ErrorKind::ResultFieldFormat => {
                "Error parsing Prometheus response: 'result' field improperly formatted"
            }
            ErrorKind::ResultEntryFormat => {
                "Error parsing Prometheus response: 'result' entry improperly formatted"
            }
            ErrorKind::MetricFieldMissing => {
                "Error parsing Prometheus response: 'metric' field does not exist in data result vector"
            }
            ErrorKind::MetricFieldFormat => {
                "Error parsing Prometheus response: 'metric' field improperly formatted"
            }
            ErrorKind::ValueFieldMissing => {
                "Error parsing Prometheus response: 'value' field does not exist in data result vector"
            }
            ErrorKind::ValuesFieldFormat => {
                "Error parsing Prometheus response: 'values' field improperly formatted"
            }
            ErrorKind::DataPointFormat => {
                "Error parsing Prometheus response: improperly formatted datapoint"
            }
            ErrorKind::ValueParse => {
                "Error parsing Prometheus response: datapoint value is not a number"
            }
            ErrorKind::FieldMissing => "field does not exist in data result vector",
            ErrorKind::FieldFormat => {
                "field is improperly formatted and cannot be converted to string"
            }
            ErrorKind::Disconnected => "query result producer dropped without publishing",
            ErrorKind::InputParse => "input is not valid JSON",
            ErrorKind::Usage => "usage error",
            ErrorKind::Io => "i/o error",
        }
    }
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    query: Option<String>,
    field: Option<String>,
    snapshot: Option<String>,
    hint: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            query: None,
            field: None,
            snapshot: None,
            hint: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Name of the offending field, for label lookups.
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Raw value that failed a shape check, or the engine's own error string.
    pub fn snapshot(&self) -> Option<&str> {
        self.snapshot.as_deref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_snapshot(mut self, snapshot: impl Into<String>) -> Self {
        self.snapshot = Some(snapshot.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // An explicit message is the complete text.
        if let Some(message) = &self.message {
            return write!(f, "{message}");
        }
        match &self.field {
            Some(field) => write!(f, "'{field}' {}", self.kind.description())?,
            None => write!(f, "{}", self.kind.description())?,
        }
        if let Some(query) = &self.query {
            write!(f, ". Query: '{query}'")?;
        }
        if let Some(snapshot) = &self.snapshot {
            write!(f, ". Response: '{snapshot}'")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

pub fn to_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Usage => 2,
        ErrorKind::Io => 3,
        ErrorKind::InputParse => 4,
        ErrorKind::NoData => 5,
        ErrorKind::QueryEngine => 6,
        ErrorKind::Disconnected => 7,
        ErrorKind::FieldMissing | ErrorKind::FieldFormat => 8,
        ErrorKind::UnexpectedResponse
        | ErrorKind::DataFieldFormat
        | ErrorKind::ResultFieldMissing
        | ErrorKind::ResultFieldFormat
        | ErrorKind::ResultEntryFormat
        | ErrorKind::MetricFieldMissing
        | ErrorKind::MetricFieldFormat
        | ErrorKind::ValueFieldMissing
        | ErrorKind::ValuesFieldFormat
        | ErrorKind::DataPointFormat
        | ErrorKind::ValueParse => 9,
    }
}
