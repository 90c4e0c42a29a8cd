//! Variant selection for matched occurrences.
//!
//! Occurrences are grouped by lowercase canonical form. For each occurrence
//! the candidates are the variants of that canonical form whose spelling fits
//! the matched token, exactly or elongated, so variants that share a spelling
//! still compete on sentiment while absent spellings never win.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::ops::Range;

use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

use crate::dictionary::SlangDictionary;
use crate::entry::Sentiment;
use crate::normalize::{is_elongation_of, max_repeat_run};
use crate::RawMatch;

/// Occurrences of one canonical word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchGroup {
    pub canonical_key: String,
    /// Indices into the raw match list.
    pub occurrences: Vec<usize>,
    pub earliest: Range<usize>,
}

/// The variant picked for a single occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub canonical_key: String,
    pub token: String,
    pub span: Range<usize>,
    /// Entry that produced the raw match.
    pub matched: usize,
    /// Entry chosen to represent the occurrence.
    pub chosen: usize,
}

/// Group raw matches by canonical key, ordered by earliest occurrence.
pub fn group_matches(matches: &[RawMatch], dictionary: &SlangDictionary) -> Vec<MatchGroup> {
    let mut by_key: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<MatchGroup> = Vec::new();

    for (idx, raw) in matches.iter().enumerate() {
        let Some(entry) = dictionary.get(raw.entry) else {
            continue;
        };
        let key = entry.canonical_key();
        match by_key.get(&key) {
            Some(&g) => {
                let group = &mut groups[g];
                group.occurrences.push(idx);
                if raw.span.start < group.earliest.start {
                    group.earliest = raw.span.clone();
                }
            }
            None => {
                by_key.insert(key.clone(), groups.len());
                groups.push(MatchGroup {
                    canonical_key: key,
                    occurrences: vec![idx],
                    earliest: raw.span.clone(),
                });
            }
        }
    }

    groups.sort_by(|a, b| {
        a.earliest
            .start
            .cmp(&b.earliest.start)
            .then_with(|| a.canonical_key.cmp(&b.canonical_key))
    });
    groups
}

/// Resolve every occurrence to one representative entry, in text order.
pub fn resolve(
    matches: &[RawMatch],
    text: &str,
    dictionary: &SlangDictionary,
    hint: Option<Sentiment>,
) -> Vec<Resolution> {
    let mut resolutions = Vec::with_capacity(matches.len());
    for group in group_matches(matches, dictionary) {
        let variants = dictionary.canonical_indices(&group.canonical_key);
        for &occ in &group.occurrences {
            let raw = &matches[occ];
            let token = text.get(raw.span.clone()).unwrap_or_default().to_lowercase();
            let candidates = fitting_variants(variants, &token, dictionary);
            let chosen =
                select_variant(&candidates, &token, dictionary, hint).unwrap_or(raw.entry);
            resolutions.push(Resolution {
                canonical_key: group.canonical_key.clone(),
                token,
                span: raw.span.clone(),
                matched: raw.entry,
                chosen,
            });
        }
    }
    resolutions.sort_by_key(|r| r.span.start);
    resolutions
}

/// Variants whose spelling is `token` or an unelongated form of it.
pub fn fitting_variants(
    variants: &[usize],
    token: &str,
    dictionary: &SlangDictionary,
) -> Vec<usize> {
    variants
        .iter()
        .copied()
        .filter(|&idx| {
            dictionary
                .get(idx)
                .is_some_and(|e| is_elongation_of(token, &e.slang))
        })
        .collect()
}

/// Pick one entry among `candidates` for the matched `token`.
///
/// A unique exact spelling wins outright. Otherwise candidates rank by
/// closeness of their longest letter run to the token's, then agreement with
/// the sentence sentiment, then neutral sentiment, then longer spelling.
/// Remaining ties keep dictionary order.
pub fn select_variant(
    candidates: &[usize],
    token: &str,
    dictionary: &SlangDictionary,
    hint: Option<Sentiment>,
) -> Option<usize> {
    let token = token.to_lowercase();
    let exact: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|&idx| {
            dictionary
                .get(idx)
                .is_some_and(|e| e.spelling() == token)
        })
        .collect();

    let pool: &[usize] = match exact.len() {
        1 => return exact.first().copied(),
        0 => candidates,
        _ => &exact,
    };

    let target = max_repeat_run(&token);
    pool.iter()
        .copied()
        .filter_map(|idx| dictionary.get(idx).map(|e| (idx, e)))
        .min_by_key(|(_, entry)| {
            let closeness = max_repeat_run(&entry.slang).abs_diff(target);
            let mismatch = match hint {
                Some(hint) => entry.sentiment != hint,
                None => false,
            };
            let not_neutral = entry.sentiment != Sentiment::Neutral;
            let length = entry.slang.graphemes(true).count();
            (closeness, mismatch, not_neutral, Reverse(length))
        })
        .map(|(idx, _)| idx)
}
