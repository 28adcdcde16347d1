//! Request path matching.
//!
//! # Responsibilities
//! - Filter a store down to the patterns structurally compatible with a request
//! - Pick the most specific candidate, earliest registration on ties
//! - Bind parameters of the winner, left to right
//!
//! # Design Decisions
//! - Linear scan over the method's store (route counts are small, no tree)
//! - No partial matches: a pattern either accounts for every token or loses
//! - Read-only; safe to call from any number of threads at once

use crate::routing::params::Params;
use crate::routing::pattern::{Pattern, Segment};
use crate::routing::store::PatternStore;

/// The winning pattern together with its bound parameters.
#[derive(Debug)]
pub struct Match<'a, H> {
    pub pattern: &'a Pattern<H>,
    pub params: Params,
}

/// Find the best pattern in `store` for the request `tokens`.
pub fn find<'a, H>(store: &'a PatternStore<H>, tokens: &[&str]) -> Option<Match<'a, H>> {
    let (_, winner) = store
        .patterns()
        .iter()
        .enumerate()
        .filter(|(_, pattern)| is_candidate(pattern, tokens))
        .min_by(|(i, a), (j, b)| a.specificity().cmp(b.specificity()).then(i.cmp(j)))?;

    Some(Match {
        params: bind(winner, tokens),
        pattern: winner,
    })
}

/// Whether `pattern` structurally matches `tokens`.
///
/// A trailing wildcard must consume at least one token.
pub fn is_candidate<H>(pattern: &Pattern<H>, tokens: &[&str]) -> bool {
    let segments = pattern.segments();

    let fixed = if pattern.ends_with_wildcard() {
        let prefix = &segments[..segments.len() - 1];
        if tokens.len() <= prefix.len() {
            return false;
        }
        prefix
    } else {
        if tokens.len() != segments.len() {
            return false;
        }
        segments
    };

    fixed
        .iter()
        .zip(tokens)
        .all(|(segment, token)| segment.accepts(token))
}

fn bind<H>(pattern: &Pattern<H>, tokens: &[&str]) -> Params {
    let mut params = Params::new();
    for (index, segment) in pattern.segments().iter().enumerate() {
        match segment {
            Segment::Param(name) => params.push(name.as_str(), tokens[index]),
            Segment::Wildcard(Some(name)) => params.push(name.as_str(), tokens[index..].join("/")),
            Segment::Literal(_) | Segment::Wildcard(None) => {}
        }
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::segment::Segmenter;

    fn store(paths: &[&'static str]) -> PatternStore<&'static str> {
        let segmenter = Segmenter::default();
        let mut store = PatternStore::new();
        for path in paths {
            store.push(Pattern::parse(path, &segmenter, *path).unwrap());
        }
        store
    }

    fn lookup(store: &PatternStore<&'static str>, path: &str) -> Option<(&'static str, Params)> {
        let tokens = Segmenter::default().split(path)?;
        find(store, &tokens).map(|m| (*m.pattern.handler(), m.params))
    }

    #[test]
    fn test_literal_param_wildcard_priority() {
        let s = store(&["/a/*", "/a/:x", "/a/b"]);
        assert_eq!(lookup(&s, "/a/b").unwrap().0, "/a/b");
        assert_eq!(lookup(&s, "/a/c").unwrap().0, "/a/:x");
        assert_eq!(lookup(&s, "/a/c/d").unwrap().0, "/a/*");
        assert!(lookup(&s, "/a").is_none());
    }

    #[test]
    fn test_registration_order_breaks_ties() {
        let s = store(&["/:p/:q", "/:x/:y"]);
        let (handler, params) = lookup(&s, "/1/2").unwrap();
        assert_eq!(handler, "/:p/:q");
        assert_eq!(params.get(":p"), Some("1"));
    }

    #[test]
    fn test_wildcard_needs_remainder() {
        let s = store(&["/files/:dir/*"]);
        let (_, params) = lookup(&s, "/files/css/a/b/c").unwrap();
        assert_eq!(params.as_slice().len(), 1);
        assert_eq!(params.get(":dir"), Some("css"));
        assert!(lookup(&s, "/files/css").is_none());
    }

    #[test]
    fn test_named_wildcard_binds_remainder() {
        let s = store(&["/docs/*rest"]);
        let (_, params) = lookup(&s, "/docs/guide/intro/").unwrap();
        assert_eq!(params.get("*rest"), Some("guide/intro"));
    }

    #[test]
    fn test_bare_wildcard_fallback() {
        let s = store(&["*", "/hello"]);
        assert_eq!(lookup(&s, "/hello").unwrap().0, "/hello");
        assert_eq!(lookup(&s, "/any/path/is/ok").unwrap().0, "*");
        assert!(lookup(&s, "/").is_none());
    }

    #[test]
    fn test_root_pattern() {
        let s = store(&["/"]);
        assert_eq!(lookup(&s, "").unwrap().0, "/");
        assert_eq!(lookup(&s, "///").unwrap().0, "/");
        assert!(lookup(&s, "/x").is_none());
    }

    #[test]
    fn test_param_order() {
        let s = store(&["/:a/:b/:c"]);
        let (_, params) = lookup(&s, "/1/2/3").unwrap();
        let pairs: Vec<(&str, &str)> = params
            .iter()
            .map(|p| (p.key.as_str(), p.value.as_str()))
            .collect();
        assert_eq!(pairs, vec![(":a", "1"), (":b", "2"), (":c", "3")]);
    }

    #[test]
    fn test_is_candidate_length_rules() {
        let segmenter = Segmenter::default();
        let exact = Pattern::parse("/a/:b", &segmenter, ()).unwrap();
        assert!(is_candidate(&exact, &["a", "x"]));
        assert!(!is_candidate(&exact, &["a"]));
        assert!(!is_candidate(&exact, &["a", "x", "y"]));
        assert!(!is_candidate(&exact, &["b", "x"]));

        let glob = Pattern::parse("/a/*", &segmenter, ()).unwrap();
        assert!(is_candidate(&glob, &["a", "x"]));
        assert!(is_candidate(&glob, &["a", "x", "y"]));
        assert!(!is_candidate(&glob, &["a"]));
    }
}
