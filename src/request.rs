//! Incoming HTTP request type.

use std::collections::HashMap;

use percent_encoding::percent_decode_str;

use crate::method::Method;

/// An incoming HTTP request: method, raw path, decoded query string, and the
/// decoded path parameters captured by the router.
///
/// Request bodies are never read; every storefront route is a `GET`.
#[derive(Debug, Clone)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    /// Builds a request from a method and a request target such as
    /// `/categories/1?min=2&max=5`.
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, parse_query(query)),
            None => (target, Vec::new()),
        };
        let path = if path.is_empty() { "/" } else { path };
        Self {
            method,
            path: path.to_owned(),
            query,
            params: HashMap::new(),
        }
    }

    /// Shorthand for `Request::new(Method::Get, target)`.
    pub fn get(target: &str) -> Self {
        Self::new(Method::Get, target)
    }

    /// Converts a hyper request head. Returns `None` for methods outside
    /// [`Method`].
    pub(crate) fn from_hyper<B>(req: &hyper::Request<B>) -> Option<Self> {
        let method = Method::try_from(req.method()).ok()?;
        let target = req.uri().path_and_query().map_or("/", |pq| pq.as_str());
        Some(Self::new(method, target))
    }

    pub fn method(&self) -> Method { self.method }

    /// The path as sent, still percent-encoded.
    pub fn path(&self) -> &str { &self.path }

    /// Returns a named path parameter, percent-decoded.
    ///
    /// For a route `/products/{id}`, `req.param("id")` on `/products/%34%32` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Returns the first value of a query-string parameter, percent-decoded.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Percent-decodes a path or path segment. `None` when the decoded bytes are
/// not UTF-8.
pub(crate) fn decode_path(raw: &str) -> Option<String> {
    percent_decode_str(raw)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}
