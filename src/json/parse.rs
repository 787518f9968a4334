//! Purpose: Provide the runtime JSON decode entrypoints for raw query responses.
//! Exports: `from_str`, `from_reader`, `ParseFailureCategory`, `categorize_error`, `hint_for_error`.
//! Role: Parser boundary that turns bytes into the untyped document the decoder walks.
//! Invariants: Parse failures map to `ErrorKind::InputParse` with a category hint.
//! Notes: Category mapping follows `serde_json::error::Category` one-to-one.

use std::io::Read;

use serde_json::Value;
use serde_json::error::Category;

use crate::core::error::{Error, ErrorKind};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseFailureCategory {
    Syntax,
    Data,
    Eof,
    Io,
}

impl ParseFailureCategory {
    pub fn label(self) -> &'static str {
        match self {
            ParseFailureCategory::Syntax => "syntax",
            ParseFailureCategory::Data => "data",
            ParseFailureCategory::Eof => "eof",
            ParseFailureCategory::Io => "io",
        }
    }
}

pub fn categorize_error(err: &serde_json::Error) -> ParseFailureCategory {
    match err.classify() {
        Category::Syntax => ParseFailureCategory::Syntax,
        Category::Data => ParseFailureCategory::Data,
        Category::Eof => ParseFailureCategory::Eof,
        Category::Io => ParseFailureCategory::Io,
    }
}

pub fn hint_for_error(err: &serde_json::Error, context: &str) -> String {
    format!(
        "parse category: {}; line {} column {}; context: {context}",
        categorize_error(err).label(),
        err.line(),
        err.column()
    )
}

pub fn from_str(input: &str, context: &str) -> Result<Value, Error> {
    serde_json::from_str(input).map_err(|err| input_error(err, context))
}

pub fn from_reader(reader: impl Read, context: &str) -> Result<Value, Error> {
    serde_json::from_reader(reader).map_err(|err| input_error(err, context))
}

fn input_error(err: serde_json::Error, context: &str) -> Error {
    let kind = match categorize_error(&err) {
        ParseFailureCategory::Io => ErrorKind::Io,
        _ => ErrorKind::InputParse,
    };
    Error::new(kind)
        .with_hint(hint_for_error(&err, context))
        .with_source(err)
}
