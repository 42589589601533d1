//! Unified error type.

use std::path::PathBuf;

use thiserror::Error as ThisError;
use tracing::error;

use crate::response::{IntoResponse, Response};
use crate::status::Status;

/// The error type returned by the storefront's fallible operations.
///
/// Application-level outcomes (404, redirects) are expressed as HTTP
/// [`Response`] values, not as `Error`s. This type surfaces infrastructure
/// failures: binding a port, writing the cart file, rendering a page.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to persist cart to {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("encode: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("render `{view}`: {reason}")]
    Render { view: &'static str, reason: String },

    #[error("invalid config {key}={value:?}")]
    Config { key: &'static str, value: String },
}

/// Any error that reaches a handler's return value becomes a plain-text 500.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        error!(error = %self, "request failed");
        Response::builder()
            .status(Status::InternalServerError)
            .text("internal server error")
    }
}
