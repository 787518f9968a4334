//! Purpose: JSON parsing boundary for raw query-engine responses.
//! Exports: `parse` module with decode helpers used by the CLI and library callers.
//! Role: Single seam for parser usage so callsites avoid ad hoc decode logic.
//! Invariants: Helper APIs stay small and deterministic (no hidden global state).

pub mod parse;
