//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{Method, Request};
use axum::response::Response;
use bit_router::config::RouterConfig;
use bit_router::http::{HttpServer, Router};
use bit_router::lifecycle::Shutdown;
use tokio::net::TcpListener;

/// Start `router` on an ephemeral port.
///
/// The server stops when the returned [`Shutdown`] is triggered or dropped.
#[allow(dead_code)]
pub async fn start_server(config: RouterConfig, router: Router) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config, router);

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown)
}

/// Buffered request with an empty body.
#[allow(dead_code)]
pub fn request(method: Method, uri: &str) -> Request<Bytes> {
    request_with_body(method, uri, "")
}

#[allow(dead_code)]
pub fn request_with_body(method: Method, uri: &str, body: &'static str) -> Request<Bytes> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Bytes::from_static(body.as_bytes()))
        .unwrap()
}

/// Unbuffered request for driving the Axum app directly.
#[allow(dead_code)]
pub fn app_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Collect a response body as text.
#[allow(dead_code)]
pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
