//! Liveness and readiness checks.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can the shop serve pages? Failure → pulled from the load balancer. |

use std::sync::Arc;

use tracing::warn;

use crate::shop::Shop;
use crate::{Request, Response, Status};

/// Always `200 OK` with body `"ok"`. If the process can answer HTTP at all,
/// it is alive.
pub async fn liveness(_req: Request, _shop: Arc<Shop>) -> &'static str {
    "ok"
}

/// `200 OK` with body `"ready"` while the catalog file can be opened,
/// `503` otherwise. An unreadable catalog still renders, but as an empty
/// store, so the instance should not take traffic.
pub async fn readiness(_req: Request, shop: Arc<Shop>) -> Response {
    match tokio::fs::File::open(shop.catalog_path()).await {
        Ok(_) => Response::text("ready"),
        Err(e) => {
            warn!(path = %shop.catalog_path().display(), error = %e, "readiness: catalog unavailable");
            Response::builder()
                .status(Status::ServiceUnavailable)
                .text("catalog unavailable")
        }
    }
}
