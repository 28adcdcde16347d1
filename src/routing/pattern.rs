//! Route patterns.
//!
//! # Syntax
//! - `name`  literal, matched by exact string equality
//! - `:name` parameter, matches any single segment and binds it under `:name`
//! - `*`     wildcard, matches one or more trailing segments
//! - `*name` named wildcard, like `*` but binds the remainder under `*name`
//!
//! A wildcard must be the final segment of a pattern.

use thiserror::Error;

use crate::routing::rank::Specificity;
use crate::routing::segment::Segmenter;

/// Leading character of a parameter segment.
pub const PARAM_MARKER: char = ':';

/// Leading character of a wildcard segment.
pub const WILDCARD_MARKER: char = '*';

/// Reasons a path cannot be registered as a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("path has more than {max} segments")]
    TooManySegments { max: usize },

    #[error("wildcard at segment {index} is not the last segment")]
    MisplacedWildcard { index: usize },

    #[error("parameter at segment {index} has no name")]
    EmptyParameter { index: usize },
}

/// One component of a registered pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    /// Parameter name, marker included.
    Param(String),
    /// Optional binding name, marker included.
    Wildcard(Option<String>),
}

impl Segment {
    /// Classify a single path token.
    pub fn classify(token: &str) -> Self {
        if let Some(rest) = token.strip_prefix(WILDCARD_MARKER) {
            if rest.is_empty() {
                Segment::Wildcard(None)
            } else {
                Segment::Wildcard(Some(token.to_string()))
            }
        } else if token.starts_with(PARAM_MARKER) {
            Segment::Param(token.to_string())
        } else {
            Segment::Literal(token.to_string())
        }
    }

    /// Whether this segment accepts `token` at its position.
    pub fn accepts(&self, token: &str) -> bool {
        match self {
            Segment::Literal(literal) => literal == token,
            Segment::Param(_) | Segment::Wildcard(_) => !token.is_empty(),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Segment::Wildcard(_))
    }
}

/// A registered path template with its handler.
#[derive(Debug, Clone)]
pub struct Pattern<H> {
    segments: Vec<Segment>,
    specificity: Specificity,
    path: String,
    handler: H,
}

impl<H> Pattern<H> {
    /// Parse `path` into a pattern owning `handler`.
    pub fn parse(path: &str, segmenter: &Segmenter, handler: H) -> Result<Self, RouteError> {
        let tokens = segmenter.split(path).ok_or(RouteError::TooManySegments {
            max: segmenter.max_segments(),
        })?;

        let last = tokens.len().saturating_sub(1);
        let mut segments = Vec::with_capacity(tokens.len());
        for (index, token) in tokens.into_iter().enumerate() {
            let segment = Segment::classify(token);
            match &segment {
                Segment::Param(name) if name.len() == PARAM_MARKER.len_utf8() => {
                    return Err(RouteError::EmptyParameter { index });
                }
                Segment::Wildcard(_) if index != last => {
                    return Err(RouteError::MisplacedWildcard { index });
                }
                _ => {}
            }
            segments.push(segment);
        }

        Ok(Self {
            specificity: Specificity::of(&segments),
            segments,
            path: path.to_string(),
            handler,
        })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn specificity(&self) -> &Specificity {
        &self.specificity
    }

    /// The path string used at registration.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn ends_with_wildcard(&self) -> bool {
        self.segments.last().is_some_and(Segment::is_wildcard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(path: &str) -> Result<Pattern<()>, RouteError> {
        Pattern::parse(path, &Segmenter::default(), ())
    }

    #[test]
    fn test_classify() {
        assert_eq!(Segment::classify("users"), Segment::Literal("users".into()));
        assert_eq!(Segment::classify(":id"), Segment::Param(":id".into()));
        assert_eq!(Segment::classify("*"), Segment::Wildcard(None));
        assert_eq!(Segment::classify("*rest"), Segment::Wildcard(Some("*rest".into())));
        // Markers only count in leading position.
        assert_eq!(Segment::classify("a:b"), Segment::Literal("a:b".into()));
        assert_eq!(Segment::classify("a*"), Segment::Literal("a*".into()));
    }

    #[test]
    fn test_parse_keeps_original_path() {
        let p = parse("/files/:dir/*").unwrap();
        assert_eq!(p.path(), "/files/:dir/*");
        assert_eq!(
            p.segments(),
            &[
                Segment::Literal("files".into()),
                Segment::Param(":dir".into()),
                Segment::Wildcard(None),
            ]
        );
        assert!(p.ends_with_wildcard());
    }

    #[test]
    fn test_parse_root() {
        assert!(parse("/").unwrap().segments().is_empty());
        assert!(parse("").unwrap().segments().is_empty());
        assert!(!parse("/").unwrap().ends_with_wildcard());
    }

    #[test]
    fn test_parse_bare_wildcard() {
        let p = parse("*").unwrap();
        assert_eq!(p.segments(), &[Segment::Wildcard(None)]);
    }

    #[test]
    fn test_parse_rejects_misplaced_wildcard() {
        assert_eq!(
            parse("/static/*/more").unwrap_err(),
            RouteError::MisplacedWildcard { index: 1 }
        );
        assert_eq!(
            parse("/*rest/:id").unwrap_err(),
            RouteError::MisplacedWildcard { index: 0 }
        );
    }

    #[test]
    fn test_parse_rejects_empty_parameter() {
        assert_eq!(
            parse("/users/:/posts").unwrap_err(),
            RouteError::EmptyParameter { index: 1 }
        );
    }

    #[test]
    fn test_parse_rejects_oversized() {
        let err = Pattern::parse("/a/b/c", &Segmenter::new(2), ()).unwrap_err();
        assert_eq!(err, RouteError::TooManySegments { max: 2 });
    }

    #[test]
    fn test_accepts() {
        assert!(Segment::Literal("a".into()).accepts("a"));
        assert!(!Segment::Literal("a".into()).accepts("b"));
        assert!(Segment::Param(":x".into()).accepts("anything"));
        assert!(!Segment::Param(":x".into()).accepts(""));
        assert!(Segment::Wildcard(None).accepts("x"));
    }
}
