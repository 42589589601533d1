//! Static files (stylesheets, images, scripts) served from one directory.

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::request::decode_path;
use crate::response::{ContentType, Response};
use crate::status::Status;

/// Serves `request_path` from under `root`, or `404` when the file does not
/// exist or the path tries to leave `root`. The path is percent-decoded
/// before the containment check.
pub async fn serve(root: &Path, request_path: &str) -> Response {
    let Some(relative) = contained(request_path) else {
        debug!(path = request_path, "refused asset path");
        return not_found();
    };
    let file = root.join(&relative);
    match tokio::fs::read(&file).await {
        Ok(bytes) => Response::builder()
            .bytes(ContentType::from_path(&relative), bytes),
        Err(e) => {
            debug!(path = %file.display(), error = %e, "asset not served");
            not_found()
        }
    }
}

/// The decoded request path as a relative path with only normal segments.
fn contained(request_path: &str) -> Option<PathBuf> {
    let decoded = decode_path(request_path)?;
    let trimmed = decoded.trim_start_matches('/');
    if trimmed.is_empty() || trimmed.contains('\\') {
        return None;
    }
    let relative = Path::new(trimmed);
    relative.components()
        .all(|c| matches!(c, Component::Normal(_)))
        .then(|| relative.to_path_buf())
}

fn not_found() -> Response {
    Response::builder().status(Status::NotFound).text("not found")
}
