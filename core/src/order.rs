//! Collapse repeated canonical words and order by first appearance.

use std::collections::HashMap;

use serde::Serialize;

use crate::dictionary::SlangDictionary;
use crate::resolve::Resolution;
use crate::RawMatch;

/// One distinct detected word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detected {
    pub canonical_key: String,
    /// Entry chosen for the earliest occurrence.
    pub entry: usize,
    /// Byte offset of the earliest raw match for this canonical key.
    pub first_offset: Option<usize>,
    pub occurrences: usize,
}

/// Keep one representative per canonical key, sorted by first offset.
///
/// Keys without a recorded offset sort last; equal offsets fall back to the
/// key so output never depends on hash order.
pub fn dedupe_ordered(
    resolutions: &[Resolution],
    matches: &[RawMatch],
    dictionary: &SlangDictionary,
) -> Vec<Detected> {
    let mut first_offsets: HashMap<String, usize> = HashMap::new();
    for raw in matches {
        let Some(entry) = dictionary.get(raw.entry) else {
            continue;
        };
        first_offsets
            .entry(entry.canonical_key())
            .and_modify(|pos| *pos = (*pos).min(raw.span.start))
            .or_insert(raw.span.start);
    }

    let mut earliest: HashMap<&str, &Resolution> = HashMap::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for res in resolutions {
        let key = res.canonical_key.as_str();
        *counts.entry(key).or_default() += 1;
        earliest
            .entry(key)
            .and_modify(|cur| {
                if res.span.start < cur.span.start {
                    *cur = res;
                }
            })
            .or_insert(res);
    }

    let mut detected: Vec<Detected> = earliest
        .into_iter()
        .map(|(key, res)| Detected {
            canonical_key: key.to_string(),
            entry: res.chosen,
            first_offset: first_offsets.get(key).copied(),
            occurrences: counts.get(key).copied().unwrap_or(0),
        })
        .collect();

    detected.sort_by(|a, b| {
        let pa = a.first_offset.unwrap_or(usize::MAX);
        let pb = b.first_offset.unwrap_or(usize::MAX);
        pa.cmp(&pb).then_with(|| a.canonical_key.cmp(&b.canonical_key))
    });
    detected
}
