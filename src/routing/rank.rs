//! Specificity ranking of patterns.
//!
//! # Ordering (lower = more specific)
//! 1. Segment kinds compared position by position, `Literal < Param < Wildcard`.
//!    A literal at the first differing index always wins.
//! 2. More literal segments.
//! 3. No wildcard before wildcard.
//!
//! Ranking depends on the pattern only, never on the request, so it is
//! computed once at registration. Equal ranks are broken by the matcher
//! using registration order.

use std::cmp::Reverse;

use crate::routing::pattern::Segment;

/// Kind of a segment, ordered from most to least specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SegmentRank {
    Literal,
    Param,
    Wildcard,
}

impl From<&Segment> for SegmentRank {
    fn from(segment: &Segment) -> Self {
        match segment {
            Segment::Literal(_) => SegmentRank::Literal,
            Segment::Param(_) => SegmentRank::Param,
            Segment::Wildcard(_) => SegmentRank::Wildcard,
        }
    }
}

/// Sort key of a pattern. Field order is the comparison order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Specificity {
    kinds: Vec<SegmentRank>,
    literals: Reverse<usize>,
    wildcard: bool,
}

impl Specificity {
    pub fn of(segments: &[Segment]) -> Self {
        let kinds: Vec<SegmentRank> = segments.iter().map(SegmentRank::from).collect();
        let literals = kinds.iter().filter(|k| **k == SegmentRank::Literal).count();
        let wildcard = kinds.last() == Some(&SegmentRank::Wildcard);

        Self {
            kinds,
            literals: Reverse(literals),
            wildcard,
        }
    }

    pub fn literal_count(&self) -> usize {
        self.literals.0
    }

    pub fn has_wildcard(&self) -> bool {
        self.wildcard
    }
}
