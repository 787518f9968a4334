//! Purpose: Defensive decoder for Prometheus-style query responses.
//! Exports: `core` (decode pipeline, errors, warnings), `api` (stable surface), `json` (input parsing).
//! Role: Library backing the `promresult` CLI and downstream cost/usage consumers.
//! Invariants: Decoding is synchronous and performs no I/O; only `api::ResultFuture` crosses threads.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.
pub mod api;
pub mod core;
pub mod json;
