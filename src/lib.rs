//! HTTP request router library.
//!
//! Patterns are registered per HTTP method and resolved by specificity:
//! literal segments beat `:param` segments, which beat a trailing `*`
//! wildcard; earlier registrations win ties.
//!
//! ```
//! use axum::http::Method;
//! use bit_router::routing::RouteTable;
//!
//! let mut table = RouteTable::new();
//! table.register(Method::GET, "/hello/John", "static").unwrap();
//! table.register(Method::GET, "/hello/:name", "param").unwrap();
//!
//! let found = table.lookup(&Method::GET, "/hello/Jane").unwrap();
//! assert_eq!(*found.handler, "param");
//! assert_eq!(found.params.get(":name"), Some("Jane"));
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::RouterConfig;
pub use http::{Control, HttpServer, Router};
pub use lifecycle::Shutdown;
pub use routing::{Param, Params, RouteError, RouteTable};
