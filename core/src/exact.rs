//! Exact spelling pass using Aho-Corasick for efficient multi-pattern matching.
//!
//! The automaton reports every occurrence of every spelling, overlapping ones
//! included. Within one spelling only leftmost non-overlapping occurrences
//! are kept, whether or not they end up claimed. The rest are then claimed
//! longest spelling first (dictionary order on ties, leftmost first within a
//! spelling), which gives the same result as scanning each entry in turn
//! against the whole text.

use std::collections::HashSet;

use aho_corasick::{AhoCorasick, MatchKind};
use tracing::{debug, trace, warn};

use crate::claims::ClaimedRanges;
use crate::dictionary::SlangDictionary;
use crate::normalize::is_word_boundary;
use crate::{MatchSource, RawMatch};

/// Compiled exact matcher for one dictionary snapshot.
#[derive(Debug, Clone)]
pub struct ExactMatcher {
    automaton: Option<AhoCorasick>,
    /// Entry that claims each pattern: the first holder of that spelling in
    /// length order.
    pattern_owner: Vec<usize>,
    /// Position of each entry in the length ordering.
    rank: Vec<usize>,
}

impl ExactMatcher {
    pub fn new(dictionary: &SlangDictionary) -> Self {
        let mut rank = vec![usize::MAX; dictionary.len()];
        let mut patterns: Vec<String> = Vec::new();
        let mut pattern_owner: Vec<usize> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for (position, &idx) in dictionary.by_length().iter().enumerate() {
            rank[idx] = position;
            let spelling = dictionary.entries()[idx].spelling();
            if spelling.trim().is_empty() {
                continue;
            }
            if !seen.insert(spelling.clone()) {
                continue;
            }
            patterns.push(spelling);
            pattern_owner.push(idx);
        }

        let automaton = if patterns.is_empty() {
            None
        } else {
            match AhoCorasick::builder()
                .match_kind(MatchKind::Standard)
                .build(&patterns)
            {
                Ok(ac) => Some(ac),
                Err(err) => {
                    warn!("failed to build exact automaton: {err}");
                    None
                }
            }
        };

        debug!(
            "exact matcher ready with {} patterns for {} entries",
            patterns.len(),
            dictionary.len()
        );

        Self {
            automaton,
            pattern_owner,
            rank,
        }
    }

    pub fn pattern_count(&self) -> usize {
        self.pattern_owner.len()
    }

    /// Find word-bounded occurrences in lowercase `text` that do not overlap
    /// `claimed`. Returns the new matches in claim order and the extended set.
    pub fn find(&self, text: &str, claimed: &ClaimedRanges) -> (Vec<RawMatch>, ClaimedRanges) {
        let mut claimed = claimed.clone();
        let Some(ref ac) = self.automaton else {
            return (Vec::new(), claimed);
        };

        let mut candidates: Vec<(usize, usize, usize)> = ac
            .find_overlapping_iter(text)
            .filter(|m| is_word_boundary(text, m.start()) && is_word_boundary(text, m.end()))
            .map(|m| {
                let entry = self.pattern_owner[m.pattern().as_usize()];
                (entry, m.start(), m.end())
            })
            .collect();
        candidates.sort_by_key(|&(entry, start, _)| (self.rank[entry], start));

        let mut matches = Vec::new();
        let mut scanned: Option<(usize, usize)> = None;
        for (entry, start, end) in candidates {
            if let Some((prev_entry, prev_end)) = scanned {
                if prev_entry == entry && start < prev_end {
                    continue;
                }
            }
            scanned = Some((entry, end));
            if claimed.try_claim(start..end) {
                trace!("exact match for entry {entry} at {start}..{end}");
                matches.push(RawMatch {
                    entry,
                    span: start..end,
                    source: MatchSource::Exact,
                });
            }
        }

        (matches, claimed)
    }
}
