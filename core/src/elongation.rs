//! Elongated spelling pass.
//!
//! Every grapheme of a spelling may repeat one or more times, so `"woi"` also
//! finds `"woooi"` and `"wwoiii"`. Patterns are built per unique spelling and
//! compiled on first use, then kept for the lifetime of the dictionary.

use std::collections::HashSet;

use once_cell::sync::OnceCell;
use regex::Regex;
use tracing::{debug, trace, warn};
use unicode_segmentation::UnicodeSegmentation;

use crate::claims::ClaimedRanges;
use crate::dictionary::SlangDictionary;
use crate::{MatchSource, RawMatch};

#[derive(Debug)]
struct Slot {
    owner: usize,
    spelling: String,
    regex: OnceCell<Option<Regex>>,
}

impl Slot {
    fn regex(&self) -> Option<&Regex> {
        self.regex
            .get_or_init(|| {
                let pattern = elongation_pattern(&self.spelling);
                match Regex::new(&pattern) {
                    Ok(regex) => Some(regex),
                    Err(err) => {
                        warn!("skipping elongation pattern for `{}`: {err}", self.spelling);
                        None
                    }
                }
            })
            .as_ref()
    }
}

/// Lazily compiled elongation patterns, longest spelling first.
#[derive(Debug)]
pub struct ElongationMatcher {
    slots: Vec<Slot>,
}

impl ElongationMatcher {
    pub fn new(dictionary: &SlangDictionary) -> Self {
        let mut seen = HashSet::new();
        let mut slots = Vec::new();
        for &idx in dictionary.by_length() {
            let spelling = dictionary.entries()[idx].spelling();
            if spelling.trim().is_empty() || !seen.insert(spelling.clone()) {
                continue;
            }
            slots.push(Slot {
                owner: idx,
                spelling,
                regex: OnceCell::new(),
            });
        }
        debug!("elongation matcher ready with {} patterns", slots.len());
        Self { slots }
    }

    pub fn pattern_count(&self) -> usize {
        self.slots.len()
    }

    /// Find elongated occurrences in lowercase `text` outside `claimed`.
    pub fn find(&self, text: &str, claimed: &ClaimedRanges) -> (Vec<RawMatch>, ClaimedRanges) {
        let mut claimed = claimed.clone();
        let mut matches = Vec::new();
        if text.is_empty() {
            return (matches, claimed);
        }

        for slot in &self.slots {
            let Some(regex) = slot.regex() else {
                continue;
            };
            for m in regex.find_iter(text) {
                if claimed.try_claim(m.start()..m.end()) {
                    trace!(
                        "elongated match `{}` for `{}` at {}..{}",
                        m.as_str(),
                        slot.spelling,
                        m.start(),
                        m.end()
                    );
                    matches.push(RawMatch {
                        entry: slot.owner,
                        span: m.start()..m.end(),
                        source: MatchSource::Elongated,
                    });
                }
            }
        }

        (matches, claimed)
    }
}

/// Regex accepting each grapheme of `spelling` one or more times, word-bounded.
pub fn elongation_pattern(spelling: &str) -> String {
    let mut pattern = String::from(r"(?i)\b");
    for g in spelling.graphemes(true) {
        let escaped = regex::escape(g);
        if g.chars().count() == 1 {
            pattern.push_str(&escaped);
            pattern.push('+');
        } else {
            pattern.push_str("(?:");
            pattern.push_str(&escaped);
            pattern.push_str(")+");
        }
    }
    pattern.push_str(r"\b");
    pattern
}
