//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. You register a path,
//! you get a handler, and every handler receives a clone of the router's
//! shared state.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::{Request, decode_path};
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Each registration returns `self` so calls chain naturally.
pub struct Router<S = ()> {
    routes: HashMap<Method, MatchitRouter<BoxedHandler<S>>>,
    fallback: Option<BoxedHandler<S>>,
    state: S,
}

impl Router<()> {
    /// A router without shared state.
    pub fn new() -> Self {
        Self::with_state(())
    }
}

impl Default for Router<()> {
    fn default() -> Self { Self::new() }
}

impl<S> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// A router whose handlers each receive a clone of `state`.
    pub fn with_state(state: S) -> Self {
        Self { routes: HashMap::new(), fallback: None, state }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax — `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics on a malformed or conflicting route; routes are fixed at startup.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler<S>) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Shorthand for `on(Method::Get, path, handler)`.
    pub fn get(self, path: &str, handler: impl Handler<S>) -> Self {
        self.on(Method::Get, path, handler)
    }

    /// Handler for requests that match no route under their own method and
    /// no route under any other method.
    pub fn fallback(mut self, handler: impl Handler<S>) -> Self {
        self.fallback = Some(handler.into_boxed_handler());
        self
    }

    /// Routes one request and produces one response.
    ///
    /// `HEAD` is answered by the `GET` route with the body dropped. A path
    /// that exists only under other methods yields `405`; anything else goes
    /// to the fallback, or `404` when none is set.
    pub async fn handle(&self, mut req: Request) -> Response {
        let lookup_method = match req.method {
            Method::Head => Method::Get,
            m => m,
        };

        if let Some((handler, params)) = self.lookup(lookup_method, &req.path) {
            req.params = params;
            let head = req.method == Method::Head;
            let response = handler.call(req, self.state.clone()).await;
            return if head { response.without_body() } else { response };
        }

        if self.allowed_elsewhere(lookup_method, &req.path) {
            return Response::status(Status::MethodNotAllowed);
        }

        match &self.fallback {
            Some(fallback) => fallback.call(req, self.state.clone()).await,
            None => Response::status(Status::NotFound),
        }
    }

    fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(BoxedHandler<S>, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), decode_path(v).unwrap_or_else(|| v.to_owned())))
            .collect();
        Some((handler, params))
    }

    fn allowed_elsewhere(&self, method: Method, path: &str) -> bool {
        self.routes.iter()
            .any(|(m, tree)| *m != method && tree.at(path).is_ok())
    }
}
