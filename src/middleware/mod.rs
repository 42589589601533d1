//! Middleware layer.
//!
//! Cross-cutting concerns that wrap every request on its way through the
//! server, independent of which handler serves it.
//!
//! - [`trace`] — per-request span with method, path, status, latency

pub mod trace;
