//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout, body buffering)
//!     → router.rs (route table lookup, 404 / 405 / OPTIONS policy, middleware)
//!     → control.rs (handler reads request, params; writes status, headers, body)
//!     → Send to client
//! ```

pub mod control;
pub mod request;
pub mod router;
pub mod server;

pub use control::Control;
pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use router::{Handler, Middleware, RegisterMiddleware, Router};
pub use server::HttpServer;
