//! Per-method pattern storage.

use crate::routing::pattern::Pattern;

/// Insertion-ordered patterns registered for one HTTP method.
///
/// Append-only. Duplicate paths are kept; the matcher prefers the earlier one.
#[derive(Debug, Clone)]
pub struct PatternStore<H> {
    patterns: Vec<Pattern<H>>,
}

impl<H> PatternStore<H> {
    pub fn new() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    pub fn push(&mut self, pattern: Pattern<H>) {
        self.patterns.push(pattern);
    }

    /// Patterns in registration order.
    pub fn patterns(&self) -> &[Pattern<H>] {
        &self.patterns
    }

    /// Registered path strings, in registration order.
    pub fn routes(&self) -> Vec<&str> {
        self.patterns.iter().map(Pattern::path).collect()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl<H> Default for PatternStore<H> {
    fn default() -> Self {
        Self::new()
    }
}
