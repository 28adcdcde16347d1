//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (setup phase):
//!     method + path + handler
//!     → segment.rs (split, bound check)
//!     → pattern.rs (classify literal / :param / *wildcard)
//!     → rank.rs (specificity key)
//!     → store.rs (append to the method's store)
//!
//! Lookup (per request):
//!     method + path
//!     → segment.rs (split, bound check)
//!     → matcher.rs (structural candidates → most specific → bind params)
//!     → Return: handler + params, or no match
//! ```
//!
//! # Design Decisions
//! - Handlers are opaque: the table stores and returns them, never calls them
//! - Literal beats parameter beats wildcard, earlier registration breaks ties
//! - Deterministic: same table and input always resolve the same way
//! - No regex, no tree: a linear scan per method

pub mod matcher;
pub mod params;
pub mod pattern;
pub mod rank;
pub mod segment;
pub mod store;
pub mod table;

pub use matcher::Match;
pub use params::{Param, Params};
pub use pattern::{Pattern, RouteError, Segment};
pub use rank::Specificity;
pub use segment::{Segmenter, DEFAULT_MAX_SEGMENTS};
pub use store::PatternStore;
pub use table::{RouteMatch, RouteTable};
