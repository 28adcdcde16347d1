//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum app with a single fallback into the router
//! - Wire up middleware (request ID, tracing, timeout, panic catching)
//! - Buffer request bodies up to the configured limit
//! - Serve until Ctrl+C, SIGTERM or a shutdown broadcast

use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};
use http_body_util::LengthLimitError;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::RouterConfig;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::router::Router;
use crate::lifecycle::signals::shutdown_signal;

/// Application state injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<Router>,
    pub max_body_size: usize,
}

/// HTTP server fronting a [`Router`].
pub struct HttpServer {
    app: axum::Router,
    config: RouterConfig,
}

impl HttpServer {
    /// Create a new HTTP server. Registration on `router` must be complete.
    pub fn new(config: RouterConfig, router: Router) -> Self {
        let state = AppState {
            router: Arc::new(router),
            max_body_size: config.listener.max_body_size,
        };
        let app = Self::build_app(&config, state);
        Self { app, config }
    }

    /// Build the Axum app with all middleware layers.
    #[allow(deprecated)]
    fn build_app(config: &RouterConfig, state: AppState) -> axum::Router {
        axum::Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(propagate_request_id_layer())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
                    .layer(CatchPanicLayer::new()),
            )
    }

    /// The Axum app, for embedding or in-process testing.
    pub fn app(&self) -> axum::Router {
        self.app.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown.recv() => tracing::info!("Shutdown requested"),
                    _ = shutdown_signal() => {}
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }
}

/// Buffer the body and hand the request to the router.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();

    let bytes = match axum::body::to_bytes(body, state.max_body_size).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path = %parts.uri.path(), error = %e, "Request body rejected");
            return match body_error_status(&e) {
                StatusCode::PAYLOAD_TOO_LARGE => {
                    (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response()
                }
                status => (status, "Failed to read request body").into_response(),
            };
        }
    };

    state.router.dispatch(Request::from_parts(parts, bytes))
}

/// 413 when the body limit was hit, 400 for any other read failure.
fn body_error_status(error: &axum::Error) -> StatusCode {
    let over_limit = std::iter::successors(Some(error as &(dyn StdError + 'static)), |e| (*e).source())
        .any(|e| e.is::<LengthLimitError>());

    if over_limit {
        StatusCode::PAYLOAD_TOO_LARGE
    } else {
        StatusCode::BAD_REQUEST
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_body_over_limit_is_payload_too_large() {
        let error = axum::body::to_bytes(Body::from("x".repeat(64)), 16)
            .await
            .unwrap_err();
        assert_eq!(body_error_status(&error), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_other_body_errors_are_bad_request() {
        let error = axum::Error::new(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "client went away",
        ));
        assert_eq!(body_error_status(&error), StatusCode::BAD_REQUEST);
    }
}
