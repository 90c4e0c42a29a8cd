use std::ops::Range;

/// Sorted set of non-overlapping half-open byte ranges already matched.
///
/// Passes never share one of these mutably: each takes the previous set by
/// reference and hands back an extended copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimedRanges {
    ranges: Vec<Range<usize>>,
}

impl ClaimedRanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Range<usize>> {
        self.ranges.iter()
    }

    /// True when `span` shares at least one byte with a claimed range.
    pub fn overlaps(&self, span: &Range<usize>) -> bool {
        if span.start >= span.end {
            return false;
        }
        // first claimed range ending after span.start
        let idx = self.ranges.partition_point(|r| r.end <= span.start);
        self.ranges
            .get(idx)
            .is_some_and(|r| r.start < span.end)
    }

    /// Claim `span` unless it overlaps; returns whether it was claimed.
    pub(crate) fn try_claim(&mut self, span: Range<usize>) -> bool {
        if span.start >= span.end || self.overlaps(&span) {
            return false;
        }
        let idx = self.ranges.partition_point(|r| r.end <= span.start);
        self.ranges.insert(idx, span);
        true
    }
}
