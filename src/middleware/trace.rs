//! Request tracing: one span and one completion event per request.

use std::future::Future;
use std::time::Instant;

use tracing::{Instrument, error, info, info_span};

use crate::method::Method;
use crate::response::Response;

/// Runs `handle` inside a `request` span and logs its outcome.
///
/// Server errors are logged at `error`, everything else at `info`.
pub async fn traced<F>(method: Method, path: &str, handle: F) -> Response
where
    F: Future<Output = Response>,
{
    let span = info_span!("request", %method, path);
    let started = Instant::now();
    let response = handle.instrument(span.clone()).await;
    let latency_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    let status = response.code();

    span.in_scope(|| {
        if status >= 500 {
            error!(status, latency_us, "request failed");
        } else {
            info!(status, latency_us, "request completed");
        }
    });
    response
}
