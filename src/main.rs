//! Purpose: `promresult` CLI entry point.
//! Role: Binary crate root; reads a raw query response, decodes it, emits JSON on stdout.
//! Invariants: Decode output on stdout is JSON (pretty document or one series per line).
//! Invariants: Errors are emitted as JSON on stderr; advisory warnings go through tracing
//!   unless `decode --warnings` collects them into a JSON report on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};
use serde_json::{Map, Value, json};
use tracing_subscriber::EnvFilter;

use promresult::api::{
    DecodeOptions, DecodedSeries, Error, ErrorKind, RecordingSink, Sample, WarningSink,
    decode_response, to_exit_code,
};
use promresult::json::parse;

#[derive(Parser)]
#[command(
    name = "promresult",
    version,
    about = "Decode Prometheus query responses into typed time series",
    long_about = None,
    after_help = r#"EXAMPLES
  $ curl -s 'http://prom:9090/api/v1/query?query=up' | promresult decode --query up
  $ promresult decode --query 'sum(rate(x[5m]))' --file response.json --format jsonl
  $ promresult labels --query up --file response.json --field job --field instance

Set RUST_LOG=warn (default) or RUST_LOG=off to control decode warnings on stderr."#,
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a response document and print its series.
    Decode {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, default_value = "pretty", value_enum, help = "Output format")]
        format: OutputFormat,
        #[arg(
            long,
            default_value = "unix",
            value_enum,
            help = "Sample timestamp rendering: unix seconds or RFC3339"
        )]
        time_format: TimeFormat,
        #[arg(
            long,
            help = "Collect decode warnings and print them as one JSON report on stderr"
        )]
        warnings: bool,
    },
    /// Print label and annotation maps for every decoded series.
    Labels {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long = "field", help = "Required metric field (repeatable); fails if missing")]
        fields: Vec<String>,
    },
}

#[derive(Args)]
struct InputArgs {
    #[arg(long, short = 'q', help = "Query string the response belongs to")]
    query: String,
    #[arg(
        long,
        short = 'f',
        help = "Response file path (use - or omit for stdin)",
        value_hint = ValueHint::FilePath
    )]
    file: Option<PathBuf>,
    #[arg(
        long,
        default_value_t = DecodeOptions::default().max_repeats,
        help = "Emit each distinct decode warning at most this many times"
    )]
    max_repeats: usize,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    Pretty,
    Jsonl,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum TimeFormat {
    Unix,
    Rfc3339,
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(()) => 0,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn run() -> Result<(), Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            err.print().map_err(|io_err| {
                Error::new(ErrorKind::Io)
                    .with_message("failed to write help")
                    .with_source(io_err)
            })?;
            return Ok(());
        }
        Err(err) => {
            return Err(Error::new(ErrorKind::Usage)
                .with_message("invalid arguments")
                .with_hint(err.to_string().trim().to_string()));
        }
    };

    match cli.command {
        Command::Decode {
            input,
            format,
            time_format,
            warnings,
        } => {
            let recorder = RecordingSink::new();
            let series = if warnings {
                decode_input(&input, &recorder)?
            } else {
                decode_input(&input, &input.options().sink())?
            };
            match format {
                OutputFormat::Pretty => {
                    let items: Result<Vec<Value>, Error> = series
                        .iter()
                        .map(|item| series_json(item, time_format))
                        .collect();
                    let doc = json!({"query": input.query, "series": items?});
                    emit_json(&doc, true)?;
                }
                OutputFormat::Jsonl => {
                    for item in &series {
                        emit_json(&series_json(item, time_format)?, false)?;
                    }
                }
            }
            if warnings {
                emit_warnings(&recorder);
            }
            Ok(())
        }
        Command::Labels { input, fields } => {
            let series = decode_input(&input, &input.options().sink())?;
            let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
            for item in &series {
                let mut out = Map::new();
                if !fields.is_empty() {
                    let values: BTreeMap<String, String> =
                        item.get_strings(&fields)?.into_iter().collect();
                    out.insert("fields".to_string(), json!(values));
                }
                let labels: BTreeMap<String, String> = item.get_labels().into_iter().collect();
                let annotations: BTreeMap<String, String> =
                    item.get_annotations().into_iter().collect();
                out.insert("labels".to_string(), json!(labels));
                out.insert("annotations".to_string(), json!(annotations));
                emit_json(&Value::Object(out), false)?;
            }
            Ok(())
        }
    }
}

impl InputArgs {
    fn options(&self) -> DecodeOptions {
        DecodeOptions {
            max_repeats: self.max_repeats,
        }
    }
}

fn decode_input(input: &InputArgs, sink: &dyn WarningSink) -> Result<Vec<DecodedSeries>, Error> {
    let raw = read_document(input.file.as_ref())?;
    let set = decode_response(&input.query, Some(&raw), sink)?;
    tracing::debug!(query = %input.query, series = set.len(), "decoded response");
    Ok(set.into_series())
}

fn read_document(path: Option<&PathBuf>) -> Result<Value, Error> {
    match path {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(path).map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message(format!("failed to open {}", path.display()))
                    .with_source(err)
            })?;
            parse::from_reader(BufReader::new(file), &path.display().to_string())
        }
        _ => parse::from_reader(io::stdin().lock(), "stdin"),
    }
}

fn series_json(series: &DecodedSeries, time_format: TimeFormat) -> Result<Value, Error> {
    let samples: Result<Vec<Value>, Error> = series
        .samples()
        .iter()
        .map(|sample| sample_json(sample, time_format))
        .collect();
    Ok(json!({
        "metric": Value::Object(series.labels().clone()),
        "samples": samples?,
    }))
}

fn sample_json(sample: &Sample, time_format: TimeFormat) -> Result<Value, Error> {
    let timestamp = match time_format {
        TimeFormat::Unix => json!(sample.timestamp),
        TimeFormat::Rfc3339 => json!(format_ts(sample.timestamp)?),
    };
    Ok(json!({"timestamp": timestamp, "value": sample.value}))
}

fn format_ts(timestamp: f64) -> Result<String, Error> {
    use time::format_description::well_known::Rfc3339;
    let nanos = (timestamp * 1_000_000_000.0) as i128;
    let ts = time::OffsetDateTime::from_unix_timestamp_nanos(nanos).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message("sample timestamp out of range for rfc3339")
            .with_source(err)
    })?;
    ts.format(&Rfc3339).map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("timestamp format failed")
            .with_source(err)
    })
}

fn emit_json(value: &Value, pretty: bool) -> Result<(), Error> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("json encode failed")
            .with_source(err)
    })?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{text}").map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to write stdout")
            .with_source(err)
    })
}

fn emit_warnings(recorder: &RecordingSink) {
    let items: Vec<Value> = recorder
        .records()
        .into_iter()
        .map(|(message, query, labels)| {
            json!({"message": message, "query": query, "labels": labels})
        })
        .collect();
    let value = json!({"warnings": items});
    let json = serde_json::to_string(&value).unwrap_or_else(|_| "{\"warnings\":[]}".to_string());
    eprintln!("{json}");
}

fn emit_error(err: &Error) {
    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Io\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = std::error::Error::source(err);
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(err.to_string()));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(query) = err.query() {
        inner.insert("query".to_string(), json!(query));
    }
    if let Some(field) = err.field() {
        inner.insert("field".to_string(), json!(field));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}
