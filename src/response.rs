//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! Handlers build a [`Response`] and return it; the server converts it into
//! a hyper response on the way out.

use std::path::Path;

use bytes::Bytes;
use http_body_util::Full;

use crate::status::Status;

// ── ContentType ───────────────────────────────────────────────────────────────

/// Content-type values for pages, plain-text errors, and static assets.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ContentType {
    Css,          // text/css; charset=utf-8
    Gif,          // image/gif
    Html,         // text/html; charset=utf-8
    Icon,         // image/x-icon
    Javascript,   // text/javascript; charset=utf-8
    Jpeg,         // image/jpeg
    Json,         // application/json
    OctetStream,  // application/octet-stream
    Png,          // image/png
    Svg,          // image/svg+xml
    Text,         // text/plain; charset=utf-8
    Webp,         // image/webp
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Css         => "text/css; charset=utf-8",
            Self::Gif         => "image/gif",
            Self::Html        => "text/html; charset=utf-8",
            Self::Icon        => "image/x-icon",
            Self::Javascript  => "text/javascript; charset=utf-8",
            Self::Jpeg        => "image/jpeg",
            Self::Json        => "application/json",
            Self::OctetStream => "application/octet-stream",
            Self::Png         => "image/png",
            Self::Svg         => "image/svg+xml",
            Self::Text        => "text/plain; charset=utf-8",
            Self::Webp        => "image/webp",
        }
    }

    /// Guesses the content type from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Self {
        let ext = path.extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("css")           => Self::Css,
            Some("gif")           => Self::Gif,
            Some("html" | "htm")  => Self::Html,
            Some("ico")           => Self::Icon,
            Some("js" | "mjs")    => Self::Javascript,
            Some("jpg" | "jpeg")  => Self::Jpeg,
            Some("json")          => Self::Json,
            Some("png")           => Self::Png,
            Some("svg")           => Self::Svg,
            Some("txt")           => Self::Text,
            Some("webp")          => Self::Webp,
            _                     => Self::OctetStream,
        }
    }
}

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// # Shortcuts (200 OK, no custom headers needed)
///
/// ```rust
/// use storefront::{Response, Status};
///
/// Response::html("<h1>Drinks</h1>");
/// Response::text("hello");
/// Response::redirect("/cart");
/// Response::status(Status::NotFound);
/// ```
///
/// # Builder (custom status or headers)
///
/// ```rust
/// use storefront::{Response, ContentType, Status};
///
/// Response::builder()
///     .status(Status::NotFound)
///     .text("product not found");
///
/// Response::builder()
///     .header("cache-control", "no-store")
///     .bytes(ContentType::Css, b"body{}".to_vec());
/// ```
#[derive(Debug)]
pub struct Response {
    pub(crate) body: Vec<u8>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) status: u16,
}

impl Response {
    /// `200 OK` — `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::bytes_raw(ContentType::Text, body.into().into_bytes())
    }

    /// `200 OK` — `text/html; charset=utf-8`.
    pub fn html(body: impl Into<String>) -> Self {
        Self::bytes_raw(ContentType::Html, body.into().into_bytes())
    }

    /// `302 Found` pointing at `location`.
    pub fn redirect(location: &str) -> Self {
        Self::builder()
            .status(Status::Found)
            .header("location", location)
            .no_body()
    }

    /// Response with no body.
    pub fn status(code: Status) -> Self {
        Self { body: Vec::new(), headers: Vec::new(), status: code.into() }
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { headers: Vec::new(), status: Status::Ok.into() }
    }

    fn bytes_raw(content_type: ContentType, body: Vec<u8>) -> Self {
        Self {
            body,
            headers: vec![("content-type".to_owned(), content_type.as_str().to_owned())],
            status: Status::Ok.into(),
        }
    }

    /// Numeric status code.
    pub fn code(&self) -> u16 { self.status }
    pub fn body(&self) -> &[u8] { &self.body }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Drops the body, keeping status and headers (for `HEAD`).
    pub(crate) fn without_body(mut self) -> Self {
        self.body.clear();
        self
    }

    /// Converts into the hyper response the server writes to the wire.
    pub(crate) fn into_inner(self) -> http::Response<Full<Bytes>> {
        let mut builder = http::Response::builder().status(self.status);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
            .body(Full::new(Bytes::from(self.body)))
            .unwrap_or_else(|_| {
                // Only reachable with a header that is not valid on the wire.
                let mut fallback = http::Response::new(Full::new(Bytes::new()));
                *fallback.status_mut() = Status::InternalServerError.into();
                fallback
            })
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to `Status::Ok` (200).
/// Terminated by a typed body method — you always know what you're sending.
pub struct ResponseBuilder {
    headers: Vec<(String, String)>,
    status: u16,
}

impl ResponseBuilder {
    pub fn status(mut self, code: Status) -> Self {
        self.status = code.into();
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Terminate with a plain-text body (`text/plain; charset=utf-8`).
    pub fn text(self, body: impl Into<String>) -> Response {
        self.finish(ContentType::Text, body.into().into_bytes())
    }

    /// Terminate with a typed body. Use this for stylesheets, images, etc.
    pub fn bytes(self, content_type: ContentType, body: Vec<u8>) -> Response {
        self.finish(content_type, body)
    }

    /// Terminate with no body (e.g. `Status::Found`).
    pub fn no_body(self) -> Response {
        Response { body: Vec::new(), headers: self.headers, status: self.status }
    }

    fn finish(self, content_type: ContentType, body: Vec<u8>) -> Response {
        let mut headers = vec![("content-type".to_owned(), content_type.as_str().to_owned())];
        headers.extend(self.headers);
        Response { body, headers, status: self.status }
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Implemented for `Result<T, E>` so a handler can use `?` on fallible
/// steps and still return a single response type.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response { Response::text(self) }
}

impl<T: IntoResponse, E: IntoResponse> IntoResponse for Result<T, E> {
    fn into_response(self) -> Response {
        match self {
            Ok(v) => v.into_response(),
            Err(e) => e.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_sets_location_and_302() {
        let response = Response::redirect("/cart");
        assert_eq!(response.code(), 302);
        assert_eq!(response.header("Location"), Some("/cart"));
        assert!(response.body().is_empty());
    }

    #[test]
    fn builder_puts_content_type_first() {
        let response = Response::builder()
            .status(Status::NotFound)
            .header("x-extra", "1")
            .text("category not found");
        assert_eq!(response.code(), 404);
        assert_eq!(response.headers()[0].1, "text/plain; charset=utf-8");
        assert_eq!(response.header("x-extra"), Some("1"));
    }

    #[test]
    fn content_type_from_extension() {
        assert_eq!(ContentType::from_path(Path::new("css/site.CSS")), ContentType::Css);
        assert_eq!(ContentType::from_path(Path::new("img/cola.jpeg")), ContentType::Jpeg);
        assert_eq!(ContentType::from_path(Path::new("LICENSE")), ContentType::OctetStream);
    }

    #[test]
    fn into_inner_copies_status_headers_and_body() {
        let inner = Response::html("<p>hi</p>").into_inner();
        assert_eq!(inner.status(), http::StatusCode::OK);
        assert_eq!(inner.headers()["content-type"], "text/html; charset=utf-8");
    }

    #[test]
    fn result_picks_the_matching_side() {
        let ok: Result<Response, &'static str> = Ok(Response::status(Status::Found));
        let err: Result<Response, &'static str> = Err("nope");
        assert_eq!(ok.into_response().code(), 302);
        assert_eq!(err.into_response().body(), b"nope");
    }

    #[test]
    fn static_strings_become_plain_text() {
        assert_eq!("ok".into_response().header("content-type"), Some("text/plain; charset=utf-8"));
    }
}
