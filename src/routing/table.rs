//! Route table: per-method pattern stores.
//!
//! # Responsibilities
//! - Register patterns under an HTTP method (setup phase, `&mut self`)
//! - Resolve method + path to a handler and its parameters (`&self`)
//! - Introspection: registered routes, methods allowed for a path
//!
//! # Design Decisions
//! - Owned value, no globals: independent tables can coexist
//! - Stores are created on first registration and never removed
//! - Registration failure leaves the table untouched

use std::collections::HashMap;

use axum::http::Method;

use crate::routing::matcher;
use crate::routing::params::Params;
use crate::routing::pattern::{Pattern, RouteError};
use crate::routing::segment::Segmenter;
use crate::routing::store::PatternStore;

/// Result of a successful lookup.
#[derive(Debug)]
pub struct RouteMatch<'a, H> {
    /// Handler of the winning pattern.
    pub handler: &'a H,
    /// Bound path parameters, in pattern order.
    pub params: Params,
    /// Path string the winning pattern was registered with.
    pub pattern: &'a str,
}

/// Routing table keyed by HTTP method.
#[derive(Debug, Clone)]
pub struct RouteTable<H> {
    stores: HashMap<Method, PatternStore<H>>,
    segmenter: Segmenter,
}

impl<H> RouteTable<H> {
    pub fn new() -> Self {
        Self::with_segmenter(Segmenter::default())
    }

    pub fn with_segmenter(segmenter: Segmenter) -> Self {
        Self {
            stores: HashMap::new(),
            segmenter,
        }
    }

    pub fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }

    /// Register `handler` for `method` and `path`.
    ///
    /// Registering the same method and path twice keeps both patterns.
    pub fn register(&mut self, method: Method, path: &str, handler: H) -> Result<(), RouteError> {
        let pattern = Pattern::parse(path, &self.segmenter, handler)?;
        self.stores.entry(method).or_default().push(pattern);
        Ok(())
    }

    /// Resolve `path` for `method`.
    ///
    /// `None` when the method has no routes, the path exceeds the segment
    /// bound, or no pattern matches.
    pub fn lookup(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, H>> {
        let store = self.stores.get(method)?;
        let tokens = self.segmenter.split(path)?;
        let found = matcher::find(store, &tokens)?;

        Some(RouteMatch {
            handler: found.pattern.handler(),
            params: found.params,
            pattern: found.pattern.path(),
        })
    }

    /// Registered paths for `method`, in registration order.
    pub fn routes(&self, method: &Method) -> Vec<&str> {
        self.stores
            .get(method)
            .map(PatternStore::routes)
            .unwrap_or_default()
    }

    /// Methods with at least one registered route, sorted by name.
    pub fn methods(&self) -> Vec<Method> {
        let mut methods: Vec<Method> = self.stores.keys().cloned().collect();
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        methods
    }

    /// Methods that have a pattern matching `path`, sorted by name.
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let Some(tokens) = self.segmenter.split(path) else {
            return Vec::new();
        };

        let mut allowed: Vec<Method> = self
            .stores
            .iter()
            .filter(|(_, store)| matcher::find(store, &tokens).is_some())
            .map(|(method, _)| method.clone())
            .collect();
        allowed.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        allowed
    }

    /// Total number of registered patterns across methods.
    pub fn len(&self) -> usize {
        self.stores.values().map(PatternStore::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self::new()
    }
}
