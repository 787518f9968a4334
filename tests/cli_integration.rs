// CLI integration tests for decode and labels flows.
use std::io::Write;
use std::process::{Command, Stdio};

use serde_json::Value;

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_promresult");
    let mut command = Command::new(exe);
    command.env("RUST_LOG", "off");
    command
}

fn parse_json(value: &str) -> Value {
    serde_json::from_str(value).expect("valid json")
}

fn write_doc(dir: &tempfile::TempDir, body: &str) -> String {
    let path = dir.path().join("response.json");
    std::fs::write(&path, body).expect("write");
    path.to_str().expect("utf8 path").to_string()
}

#[test]
fn decode_file_pretty() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = write_doc(
        &temp,
        r#"{"data":{"result":[{"metric":{"label_app":"api"},"value":[1004,"2.5"]}]}}"#,
    );

    let out = cmd()
        .args(["decode", "--query", "Q", "--file", &path])
        .output()
        .expect("decode");
    assert!(out.status.success());
    let doc = parse_json(std::str::from_utf8(&out.stdout).expect("utf8"));
    assert_eq!(doc["query"], "Q");
    let series = doc["series"].as_array().expect("series");
    assert_eq!(series.len(), 1);
    assert_eq!(series[0]["metric"]["label_app"], "api");
    assert_eq!(series[0]["samples"][0]["timestamp"].as_f64(), Some(1000.0));
    assert_eq!(series[0]["samples"][0]["value"].as_f64(), Some(2.5));
}

#[test]
fn decode_stdin_jsonl_rfc3339() {
    let mut child = cmd()
        .args(["decode", "-q", "Q", "--format", "jsonl", "--time-format", "rfc3339"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(
            br#"{"data":{"result":[
                {"metric":{"a":"1"},"values":[[0,"1"],[10,"2"]]},
                {"metric":{"a":"2"},"values":[[0,"NaN"]]}
            ]}}"#,
        )
        .expect("write");
    let out = child.wait_with_output().expect("wait");
    assert!(out.status.success());

    let text = String::from_utf8(out.stdout).expect("utf8");
    let lines: Vec<Value> = text.lines().map(parse_json).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["samples"][0]["timestamp"], "1970-01-01T00:00:00Z");
    assert_eq!(lines[0]["samples"][1]["timestamp"], "1970-01-01T00:00:10Z");
    assert_eq!(lines[1]["samples"][0]["value"].as_f64(), Some(0.0));
}

#[test]
fn engine_error_exits_nonzero_with_json_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = write_doc(&temp, r#"{"status":"error","error":"bad_data"}"#);

    let out = cmd()
        .args(["decode", "--query", "Q", "--file", &path])
        .output()
        .expect("decode");
    assert_eq!(out.status.code(), Some(6));
    let text = String::from_utf8_lossy(&out.stderr);
    let err = parse_json(text.lines().last().expect("error line"));
    assert_eq!(err["error"]["kind"], "QueryEngine");
    assert_eq!(err["error"]["query"], "Q");
}

#[test]
fn invalid_json_input_is_input_parse_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = write_doc(&temp, "{not json");

    let out = cmd()
        .args(["decode", "--query", "Q", "--file", &path])
        .output()
        .expect("decode");
    assert_eq!(out.status.code(), Some(4));
    let text = String::from_utf8_lossy(&out.stderr);
    let err = parse_json(text.lines().last().expect("error line"));
    assert_eq!(err["error"]["kind"], "InputParse");
    assert!(err["error"]["hint"].as_str().expect("hint").contains("parse category"));
}

#[test]
fn labels_prints_prefixed_maps() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = write_doc(
        &temp,
        r#"{"data":{"result":[{"metric":{"namespace":"ns","label_app":"api","label_env":5,"annotation_owner":"me"},"value":[1,"1"]}]}}"#,
    );

    let out = cmd()
        .args(["labels", "--query", "Q", "--file", &path, "--field", "namespace"])
        .output()
        .expect("labels");
    assert!(out.status.success());
    let line = parse_json(
        std::str::from_utf8(&out.stdout)
            .expect("utf8")
            .lines()
            .next()
            .expect("line"),
    );
    assert_eq!(line["fields"]["namespace"], "ns");
    assert_eq!(line["labels"]["app"], "api");
    assert!(line["labels"].get("env").is_none());
    assert_eq!(line["annotations"]["owner"], "me");
}

#[test]
fn labels_missing_required_field_fails() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = write_doc(&temp, r#"{"data":{"result":[{"metric":{},"value":[1,"1"]}]}}"#);

    let out = cmd()
        .args(["labels", "--query", "Q", "--file", &path, "--field", "pod"])
        .output()
        .expect("labels");
    assert_eq!(out.status.code(), Some(8));
    let text = String::from_utf8_lossy(&out.stderr);
    let err = parse_json(text.lines().last().expect("error line"));
    assert_eq!(err["error"]["kind"], "FieldMissing");
    assert_eq!(err["error"]["field"], "pod");
}

#[test]
fn decode_warnings_report_lists_each_kind_once() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = write_doc(
        &temp,
        r#"{"data":{"result":[
            {"metric":{"pod":"a"},"values":[[0,"Inf"],[10,"-Inf"],[20,"NaN"],[30,"1"]]},
            {"metric":{"pod":"b"},"values":[[0,"2"]]}
        ]}}"#,
    );

    let out = cmd()
        .args(["decode", "--query", "Q", "--file", &path, "--format", "jsonl", "--warnings"])
        .output()
        .expect("decode");
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout).lines().count(), 2);

    let text = String::from_utf8_lossy(&out.stderr);
    let report = parse_json(text.lines().last().expect("report line"));
    let warnings = report["warnings"].as_array().expect("warnings array");
    assert_eq!(warnings.len(), 2);
    assert_eq!(
        warnings[0]["message"],
        "Found Inf value parsing vector data point for metric"
    );
    assert_eq!(
        warnings[1]["message"],
        "Found NaN value parsing vector data point for metric"
    );
    assert_eq!(warnings[0]["query"], "Q");
    assert_eq!(warnings[0]["labels"], "{pod: a}");
}

#[test]
fn decode_warnings_report_is_empty_for_clean_input() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = write_doc(&temp, r#"{"data":{"result":[{"metric":{},"value":[1,"1"]}]}}"#);

    let out = cmd()
        .args(["decode", "--query", "Q", "--file", &path, "--warnings"])
        .output()
        .expect("decode");
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stderr);
    let report = parse_json(text.lines().last().expect("report line"));
    assert_eq!(report["warnings"].as_array().map(Vec::len), Some(0));
}
