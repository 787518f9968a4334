//! Purpose: Verify one-shot result handoff ordering across async tasks.
//! Exports: Integration tests only.
//! Role: Consumer suspends until the producer publishes; each side is single-use.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use promresult::api::{ErrorKind, RecordingSink, result_channel};
use serde_json::json;

#[tokio::test]
async fn wait_suspends_until_publish() {
    let (publisher, future) = result_channel();
    let published = Arc::new(AtomicBool::new(false));

    let flag = Arc::clone(&published);
    let consumer = tokio::spawn(async move {
        let series = future.wait().await;
        (flag.load(Ordering::SeqCst), series)
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!consumer.is_finished());

    let doc = json!({"data": {"result": [
        {"metric": {"job": "a"}, "values": [[10, "1"], [20, "2"]]}
    ]}});
    let sink = RecordingSink::new();
    published.store(true, Ordering::SeqCst);
    publisher
        .publish_decoded("q", Some(&doc), &sink)
        .expect("publish");

    let (seen_publish, series) = consumer.await.expect("join");
    assert!(seen_publish);
    let series = series.expect("series");
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].samples().len(), 2);
}

#[tokio::test]
async fn decode_failure_is_delivered_as_error() {
    let (publisher, future) = result_channel();
    let sink = RecordingSink::new();
    publisher
        .publish_decoded("q", None, &sink)
        .expect("publish");
    let err = future.wait().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoData);
}

#[tokio::test]
async fn producer_task_dropping_publisher_disconnects() {
    let (publisher, future) = result_channel();
    tokio::spawn(async move {
        drop(publisher);
    });
    let err = future.wait().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Disconnected);
}
