//! Path segmentation.
//!
//! # Responsibilities
//! - Split a raw path on `/` into non-empty tokens
//! - Trim whitespace around the path and around every token
//! - Reject paths with more segments than the configured bound
//!
//! # Design Decisions
//! - Borrowed tokens (`&str` into the input), no allocation per segment
//! - Root (`""`, `"/"`, `"///"`) is an accepted path with zero segments
//! - Rejection is `None`, never a partial segment list

/// Segment bound used when none is configured.
pub const DEFAULT_MAX_SEGMENTS: usize = 256;

/// Path separator.
pub const SEPARATOR: char = '/';

/// Splits paths into segments, bounded by `max_segments`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segmenter {
    max_segments: usize,
}

impl Segmenter {
    pub fn new(max_segments: usize) -> Self {
        Self { max_segments }
    }

    pub fn max_segments(&self) -> usize {
        self.max_segments
    }

    /// Split `path` into trimmed, non-empty segments.
    ///
    /// Returns `None` when the path has more than `max_segments` segments.
    pub fn split<'a>(&self, path: &'a str) -> Option<Vec<&'a str>> {
        let mut segments = Vec::new();

        for token in path.trim().split(SEPARATOR) {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            if segments.len() == self.max_segments {
                return None;
            }
            segments.push(token);
        }

        Some(segments)
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SEGMENTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_collapses_separators() {
        let s = Segmenter::default();
        assert_eq!(s.split("/api/v1/module"), Some(vec!["api", "v1", "module"]));
        assert_eq!(s.split("/api//v1/module/"), Some(vec!["api", "v1", "module"]));
        assert_eq!(s.split("/module///name//"), Some(vec!["module", "name"]));
        assert_eq!(s.split("module//:name"), Some(vec!["module", ":name"]));
        assert_eq!(s.split("/:param1/:param2/"), Some(vec![":param1", ":param2"]));
    }

    #[test]
    fn test_split_root_variants() {
        let s = Segmenter::default();
        for path in ["", "/", "   ", "///", "  /  //  "] {
            assert_eq!(s.split(path), Some(vec![]), "path {:?}", path);
        }
    }

    #[test]
    fn test_split_trims_whitespace() {
        let s = Segmenter::default();
        assert_eq!(s.split("  / a / b  /"), Some(vec!["a", "b"]));
        assert_eq!(s.split("/a/ \t /b"), Some(vec!["a", "b"]));
    }

    #[test]
    fn test_split_bound() {
        let s = Segmenter::default();
        let at_limit = "/A".repeat(DEFAULT_MAX_SEGMENTS);
        assert_eq!(s.split(&at_limit).map(|v| v.len()), Some(DEFAULT_MAX_SEGMENTS));

        let over = "/A".repeat(DEFAULT_MAX_SEGMENTS + 1);
        assert_eq!(s.split(&over), None);
        assert_eq!(s.split(&"/A".repeat(300)), None);
    }

    #[test]
    fn test_split_custom_bound() {
        let s = Segmenter::new(2);
        assert!(s.split("/a/b").is_some());
        assert!(s.split("/a/b/c").is_none());
        // Empty segments do not count towards the bound.
        assert!(s.split("//a///b//").is_some());
    }

    #[test]
    fn test_split_rejoin_idempotent() {
        let s = Segmenter::default();
        for path in ["/a//b/ c /", "x", "  ///  ", "/:a/*/"] {
            let first = s.split(path).unwrap();
            let joined = first.join("/");
            assert_eq!(s.split(&joined).unwrap(), first);
        }
    }
}
