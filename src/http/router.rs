//! Request dispatch on top of the route table.
//!
//! # Responsibilities
//! - Per-method registration helpers (`get`, `post`, ...)
//! - Registration and dispatch middleware hooks
//! - Dispatch: matched handler, 404, 405 with `Allow`, automatic OPTIONS replies
//! - Panic recovery through a user-supplied handler, covering handlers,
//!   middleware and the not-found / not-allowed handlers alike
//!
//! # Design Decisions
//! - Setup via `&mut self`, dispatch via `&self`; the server shares it in an `Arc`
//! - Without a recovery handler a panic keeps unwinding to the server layer

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderValue, Method, Request, StatusCode},
    response::Response,
};

use percent_encoding::percent_decode_str;

use crate::http::control::Control;
use crate::observability::metrics;
use crate::routing::{Params, RouteError, RouteTable, Segmenter};

/// Request handler. Writes its response into the [`Control`].
pub type Handler = Arc<dyn Fn(&mut Control) + Send + Sync>;

/// Rewrites method, path and handler before they are registered.
pub type RegisterMiddleware =
    Arc<dyn Fn(Method, String, Handler) -> (Method, String, Handler) + Send + Sync>;

/// Wraps a matched handler before it runs.
pub type Middleware = Arc<dyn Fn(Handler) -> Handler + Send + Sync>;

/// HTTP router: route table plus not-found, not-allowed and recovery policy.
#[derive(Default)]
pub struct Router {
    table: RouteTable<Handler>,
    options_replies: bool,
    not_found: Option<Handler>,
    not_allowed: Option<Handler>,
    recovery: Option<Handler>,
    register_middleware: Option<RegisterMiddleware>,
    middleware: Option<Middleware>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Router whose paths may have at most `max_segments` segments.
    pub fn with_max_segments(max_segments: usize) -> Self {
        Self {
            table: RouteTable::with_segmenter(Segmenter::new(max_segments)),
            ..Self::default()
        }
    }

    pub fn get<F>(&mut self, path: &str, f: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Control) + Send + Sync + 'static,
    {
        self.handle(Method::GET, path, f)
    }

    pub fn put<F>(&mut self, path: &str, f: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Control) + Send + Sync + 'static,
    {
        self.handle(Method::PUT, path, f)
    }

    pub fn post<F>(&mut self, path: &str, f: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Control) + Send + Sync + 'static,
    {
        self.handle(Method::POST, path, f)
    }

    pub fn delete<F>(&mut self, path: &str, f: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Control) + Send + Sync + 'static,
    {
        self.handle(Method::DELETE, path, f)
    }

    pub fn head<F>(&mut self, path: &str, f: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Control) + Send + Sync + 'static,
    {
        self.handle(Method::HEAD, path, f)
    }

    pub fn options<F>(&mut self, path: &str, f: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Control) + Send + Sync + 'static,
    {
        self.handle(Method::OPTIONS, path, f)
    }

    pub fn patch<F>(&mut self, path: &str, f: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Control) + Send + Sync + 'static,
    {
        self.handle(Method::PATCH, path, f)
    }

    /// Register `f` for `method` and `path`, after the registration middleware.
    pub fn handle<F>(&mut self, method: Method, path: &str, f: F) -> Result<(), RouteError>
    where
        F: Fn(&mut Control) + Send + Sync + 'static,
    {
        self.register(method, path.to_string(), Arc::new(f))
    }

    fn register(&mut self, method: Method, path: String, handler: Handler) -> Result<(), RouteError> {
        let (method, path, handler) = match &self.register_middleware {
            Some(mw) => mw(method, path, handler),
            None => (method, path, handler),
        };

        self.table
            .register(method.clone(), &path, handler)
            .inspect_err(|e| {
                tracing::warn!(method = %method, path = %path, error = %e, "Route rejected");
                metrics::record_rejected_route(method.as_str());
            })
    }

    /// Automatically answer OPTIONS requests for paths other methods serve.
    /// Explicit OPTIONS handlers still take priority.
    pub fn use_options_replies(&mut self, enabled: bool) {
        self.options_replies = enabled;
    }

    pub fn setup_not_found_handler<F>(&mut self, f: F)
    where
        F: Fn(&mut Control) + Send + Sync + 'static,
    {
        self.not_found = Some(Arc::new(f));
    }

    pub fn setup_not_allowed_handler<F>(&mut self, f: F)
    where
        F: Fn(&mut Control) + Send + Sync + 'static,
    {
        self.not_allowed = Some(Arc::new(f));
    }

    /// Handler invoked with a fresh control when a route handler panics.
    pub fn setup_recovery_handler<F>(&mut self, f: F)
    where
        F: Fn(&mut Control) + Send + Sync + 'static,
    {
        self.recovery = Some(Arc::new(f));
    }

    /// Applies to routes registered after this call.
    pub fn setup_register_middleware<F>(&mut self, f: F)
    where
        F: Fn(Method, String, Handler) -> (Method, String, Handler) + Send + Sync + 'static,
    {
        self.register_middleware = Some(Arc::new(f));
    }

    pub fn setup_middleware<F>(&mut self, f: F)
    where
        F: Fn(Handler) -> Handler + Send + Sync + 'static,
    {
        self.middleware = Some(Arc::new(f));
    }

    /// Manual lookup of a method and path.
    pub fn lookup(&self, method: &Method, path: &str) -> Option<(Handler, Params)> {
        self.table
            .lookup(method, path)
            .map(|m| (m.handler.clone(), m.params))
    }

    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        self.table.allowed_methods(path)
    }

    pub fn routes(&self, method: &Method) -> Vec<&str> {
        self.table.routes(method)
    }

    pub fn table(&self) -> &RouteTable<Handler> {
        &self.table
    }

    /// Route a buffered request to its handler and build the response.
    ///
    /// Matching runs on the percent-decoded path; a path that does not
    /// decode to UTF-8 is answered with 400.
    pub fn dispatch(&self, request: Request<Bytes>) -> Response {
        let start = Instant::now();
        let method = request.method().clone();

        let Some(path) = decode_path(request.uri().path()) else {
            tracing::debug!(method = %method, path = %request.uri().path(), "Undecodable request path");
            let response = plain(StatusCode::BAD_REQUEST);
            metrics::record_request(method.as_str(), response.status().as_u16(), "none", start);
            return response;
        };

        let (parts, body) = request.into_parts();
        let saved = self.recovery.as_ref().map(|_| (parts.clone(), body.clone()));
        let request = Request::from_parts(parts, body);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.respond(&path, request)));
        let (response, pattern) = match (outcome, &self.recovery, saved) {
            (Ok(outcome), _, _) => outcome,
            (Err(_), Some(recovery), Some((parts, body))) => {
                tracing::error!(path = %path, "Handler panicked, running recovery handler");
                let mut control = Control::new(parts, body);
                recovery(&mut control);
                (control.into_response(), None)
            }
            (Err(payload), _, _) => panic::resume_unwind(payload),
        };

        tracing::debug!(
            method = %method,
            path = %path,
            pattern = pattern.unwrap_or("-"),
            status = response.status().as_u16(),
            "Request dispatched"
        );
        metrics::record_request(
            method.as_str(),
            response.status().as_u16(),
            pattern.unwrap_or("none"),
            start,
        );

        response
    }

    /// Lookup and respond. Panics unwind to [`Router::dispatch`].
    fn respond(&self, path: &str, request: Request<Bytes>) -> (Response, Option<&str>) {
        match self.table.lookup(request.method(), path) {
            Some(found) => {
                let handler = match &self.middleware {
                    Some(mw) => mw(found.handler.clone()),
                    None => found.handler.clone(),
                };
                (run(&handler, found.params, request), Some(found.pattern))
            }
            None => (self.unmatched(path, request), None),
        }
    }

    fn unmatched(&self, path: &str, request: Request<Bytes>) -> Response {
        let allowed = self.table.allowed_methods(path);

        if allowed.is_empty() {
            return match &self.not_found {
                Some(handler) => invoke(handler, request, None),
                None => plain(StatusCode::NOT_FOUND),
            };
        }

        let allow = allowed
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let allow = HeaderValue::from_str(&allow).ok();

        let mut response = if *request.method() == Method::OPTIONS && self.options_replies {
            Response::new(Body::empty())
        } else {
            match &self.not_allowed {
                Some(handler) => invoke(handler, request, allow.clone()),
                None => plain(StatusCode::METHOD_NOT_ALLOWED),
            }
        };

        if let Some(allow) = allow {
            response.headers_mut().insert(header::ALLOW, allow);
        }
        response
    }
}

/// Percent-decode a request path. `None` when the result is not UTF-8.
fn decode_path(raw: &str) -> Option<String> {
    percent_decode_str(raw)
        .decode_utf8()
        .ok()
        .map(|path| path.into_owned())
}

fn run(handler: &Handler, params: Params, request: Request<Bytes>) -> Response {
    let (parts, body) = request.into_parts();
    let mut control = Control::new(parts, body);
    for param in params {
        control.param(param.key, param.value);
    }
    handler(&mut control);
    control.into_response()
}

fn invoke(handler: &Handler, request: Request<Bytes>, allow: Option<HeaderValue>) -> Response {
    let (parts, body) = request.into_parts();
    let mut control = Control::new(parts, body);
    if let Some(allow) = allow {
        control.header_mut().insert(header::ALLOW, allow);
    }
    handler(&mut control);
    control.into_response()
}

/// Status text followed by a newline, as plain text.
fn plain(status: StatusCode) -> Response {
    let text = format!("{}\n", status.canonical_reason().unwrap_or_default());
    let mut response = Response::new(Body::from(text));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: Method, uri: &str) -> Request<Bytes> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Bytes::new())
            .unwrap()
    }

    async fn text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_root_static() {
        let mut router = Router::new();
        router.get("/", |c| c.body("Root")).unwrap();
        let response = router.dispatch(request(Method::GET, "/"));
        assert_eq!(text(response).await, "Root");
    }

    #[tokio::test]
    async fn test_parameter() {
        let mut router = Router::new();
        router
            .get("/hello/:name", |c| {
                let name = c.query(":name");
                c.body(format!("Hello {}", name));
            })
            .unwrap();
        let response = router.dispatch(request(Method::GET, "/hello/John"));
        assert_eq!(text(response).await, "Hello John");
    }

    #[tokio::test]
    async fn test_not_found() {
        let mut router = Router::new();
        router.get("/found", |c| c.code(200)).unwrap();
        let response = router.dispatch(request(Method::GET, "/not-found/"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(text(response).await, "Not Found\n");
    }

    #[tokio::test]
    async fn test_not_allowed() {
        let mut router = Router::new();
        router.get("/allowed", |c| c.code(200)).unwrap();
        router.put("/allowed", |c| c.code(202)).unwrap();
        let response = router.dispatch(request(Method::POST, "/allowed"));
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(header::ALLOW).unwrap(), "GET, PUT");
        assert_eq!(text(response).await, "Method Not Allowed\n");
    }

    #[test]
    fn test_lookup() {
        let mut router = Router::new();
        assert!(router.lookup(&Method::GET, "/nope").is_none());

        router.get("/user/:name", |c| c.code(200)).unwrap();
        let (_, params) = router.lookup(&Method::GET, "/user/gopher").unwrap();
        assert_eq!(params.get(":name"), Some("gopher"));
    }

    #[test]
    fn test_rejected_route_is_reported() {
        let mut router = Router::with_max_segments(2);
        assert_eq!(
            router.get("/a/b/c", |_| {}),
            Err(RouteError::TooManySegments { max: 2 })
        );
        assert!(router.routes(&Method::GET).is_empty());
    }
}
