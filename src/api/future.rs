//! Purpose: One-shot handoff of a decoded result set from a producer to a single consumer.
//! Exports: `ResultPublisher`, `ResultFuture`, `result_channel`.
//! Role: The only concurrency primitive in the crate; wraps `tokio::sync::oneshot`.
//! Invariants: `publish` and `wait` consume `self`, so each side is used at most once.
//! Invariants: A dropped publisher surfaces as `ErrorKind::Disconnected`, never a hang.
use serde_json::Value;
use tokio::sync::oneshot;

use crate::core::error::{Error, ErrorKind};
use crate::core::response::{ResultSet, decode_response};
use crate::core::series::DecodedSeries;
use crate::core::warning::WarningSink;

type Outcome = Result<ResultSet, Error>;

pub fn result_channel() -> (ResultPublisher, ResultFuture) {
    let (tx, rx) = oneshot::channel();
    (ResultPublisher { tx }, ResultFuture { rx })
}

/// Producer half. Publishing twice does not compile:
///
/// ```compile_fail
/// use promresult::api::{Error, ErrorKind, result_channel};
///
/// let (publisher, _future) = result_channel();
/// let _ = publisher.publish(Err(Error::new(ErrorKind::NoData)));
/// let _ = publisher.publish(Err(Error::new(ErrorKind::NoData)));
/// ```
#[derive(Debug)]
pub struct ResultPublisher {
    tx: oneshot::Sender<Outcome>,
}

impl ResultPublisher {
    /// Fails with `Disconnected` when the consumer already went away.
    pub fn publish(self, outcome: Outcome) -> Result<(), Error> {
        self.tx.send(outcome).map_err(|_| {
            Error::new(ErrorKind::Disconnected)
                .with_message("query result consumer dropped before publish")
        })
    }

    pub fn publish_decoded(
        self,
        query: &str,
        raw: Option<&Value>,
        sink: &dyn WarningSink,
    ) -> Result<(), Error> {
        self.publish(decode_response(query, raw, sink))
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer half. Waiting twice does not compile:
///
/// ```compile_fail
/// let (_publisher, future) = promresult::api::result_channel();
/// let _ = future.wait_blocking();
/// let _ = future.wait_blocking();
/// ```
#[derive(Debug)]
pub struct ResultFuture {
    rx: oneshot::Receiver<Outcome>,
}

impl ResultFuture {
    pub async fn wait(self) -> Result<Vec<DecodedSeries>, Error> {
        unpack(self.rx.await)
    }

    /// Blocking variant for synchronous callers; must not run on an async worker thread.
    pub fn wait_blocking(self) -> Result<Vec<DecodedSeries>, Error> {
        unpack(self.rx.blocking_recv())
    }
}

fn unpack(
    received: Result<Outcome, oneshot::error::RecvError>,
) -> Result<Vec<DecodedSeries>, Error> {
    match received {
        Ok(Ok(set)) => Ok(set.into_series()),
        Ok(Err(err)) => Err(err),
        Err(_) => Err(Error::new(ErrorKind::Disconnected)),
    }
}
