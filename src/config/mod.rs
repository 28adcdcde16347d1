//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, route paths dry-run through the parser)
//!     → RouterConfig (validated, immutable)
//!     → main.rs registers routes and starts the server
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod routes;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use routes::{build_router, render_body, BuildError, ROUTES_PATH};
pub use schema::{ListenerConfig, ObservabilityConfig, RouteConfig, RouterConfig, RoutingConfig, TimeoutConfig};
pub use validation::{validate_config, ValidationError};
