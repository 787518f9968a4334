//! Purpose: Define the stable public Rust API boundary for promresult.
//! Exports: Decode entrypoint, result types, label accessors, warning sinks, result future.
//! Role: Public, additive-only surface consumed by downstream cost/usage logic and the CLI.
//! Invariants: Callers receive a full `ResultSet` or a single `Error`, never both.
//! Invariants: Warning state is injected by callers; nothing here is process-global.

mod future;

pub use crate::core::error::{Error, ErrorKind, to_exit_code};
pub use crate::core::metric::{ANNOTATION_PREFIX, LABEL_PREFIX};
pub use crate::core::response::{DecodeOptions, ResultSet, decode_response};
pub use crate::core::sample::{Sample, quantize_timestamp};
pub use crate::core::series::DecodedSeries;
pub use crate::core::warning::{
    DEFAULT_MAX_KEYS, DEFAULT_MAX_REPEATS, DedupedSink, LogSink, RecordingSink, Warning,
    WarningSink,
};
pub use future::{ResultFuture, ResultPublisher, result_channel};
