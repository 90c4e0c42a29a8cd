//! Per-variant dictionary index shared by every detection pass.

use std::collections::{BTreeMap, HashMap};

use unicode_segmentation::UnicodeSegmentation;

use crate::entry::SlangEntry;
use crate::normalize::collapse_repeats;

/// Flattened dictionary snapshot.
///
/// Entries keep their load order (used for stable tie-breaks); a second
/// ordering lists them longest spelling first.
#[derive(Debug, Clone, Default)]
pub struct SlangDictionary {
    entries: Vec<SlangEntry>,
    by_length: Vec<usize>,
    by_canonical: HashMap<String, Vec<usize>>,
}

/// All variants of one canonical word, as shown in a dictionary listing.
#[derive(Debug, Clone)]
pub struct CanonicalGroup<'a> {
    pub canonical_form: String,
    pub variants: Vec<&'a SlangEntry>,
}

impl SlangDictionary {
    pub fn new(entries: Vec<SlangEntry>) -> Self {
        let mut by_length: Vec<usize> = (0..entries.len()).collect();
        let lengths: Vec<usize> = entries
            .iter()
            .map(|e| e.slang.graphemes(true).count())
            .collect();
        // stable: equal lengths keep dictionary order
        by_length.sort_by(|&a, &b| lengths[b].cmp(&lengths[a]));

        let mut by_canonical: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            by_canonical.entry(entry.canonical_key()).or_default().push(idx);
        }

        Self {
            entries,
            by_length,
            by_canonical,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[SlangEntry] {
        &self.entries
    }

    pub fn get(&self, idx: usize) -> Option<&SlangEntry> {
        self.entries.get(idx)
    }

    /// Entry indices, longest spelling first, ties in dictionary order.
    pub fn by_length(&self) -> &[usize] {
        &self.by_length
    }

    /// Indices of every variant whose canonical form equals `key` (lowercase).
    pub fn canonical_indices(&self, key: &str) -> &[usize] {
        self.by_canonical
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Variants of one canonical form, sorted by spelling.
    pub fn variants_of(&self, canonical: &str) -> Vec<&SlangEntry> {
        let mut variants: Vec<&SlangEntry> = self
            .canonical_indices(&canonical.to_lowercase())
            .iter()
            .map(|&idx| &self.entries[idx])
            .collect();
        variants.sort_by(|a, b| a.slang.cmp(&b.slang));
        variants
    }

    /// Entries whose spelling or canonical form contains `keyword`.
    ///
    /// Elongated keywords also hit: `"mantaaap"` finds `"mantap"`.
    pub fn search(&self, keyword: &str) -> Vec<&SlangEntry> {
        let needle = keyword.trim().to_lowercase();
        if needle.is_empty() {
            return self.entries.iter().collect();
        }
        let collapsed = collapse_repeats(&needle);
        self.entries
            .iter()
            .filter(|entry| {
                let slang = entry.spelling();
                let canonical = entry.canonical_key();
                slang.contains(&needle)
                    || canonical.contains(&needle)
                    || collapse_repeats(&slang).contains(&collapsed)
                    || collapse_repeats(&canonical).contains(&collapsed)
            })
            .collect()
    }

    /// Dictionary listing grouped by canonical form, optionally filtered.
    pub fn grouped(&self, keyword: Option<&str>) -> Vec<CanonicalGroup<'_>> {
        let matching = match keyword {
            Some(k) => self.search(k),
            None => self.entries.iter().collect(),
        };
        let mut groups: BTreeMap<String, Vec<&SlangEntry>> = BTreeMap::new();
        for entry in matching {
            groups
                .entry(entry.canonical_form.clone())
                .or_default()
                .push(entry);
        }
        groups
            .into_iter()
            .map(|(canonical_form, mut variants)| {
                variants.sort_by(|a, b| a.slang.cmp(&b.slang));
                CanonicalGroup {
                    canonical_form,
                    variants,
                }
            })
            .collect()
    }
}

impl From<Vec<SlangEntry>> for SlangDictionary {
    fn from(entries: Vec<SlangEntry>) -> Self {
        Self::new(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Sentiment;

    fn dict() -> SlangDictionary {
        SlangDictionary::new(vec![
            SlangEntry::new("gas", "gas", Sentiment::Positive),
            SlangEntry::new("mantap", "mantap", Sentiment::Positive),
            SlangEntry::new("gas", "gaskeun", Sentiment::Positive),
            SlangEntry::new("Gas", "gass", Sentiment::Negative),
            SlangEntry::new("woi", "woi", Sentiment::Neutral),
        ])
    }

    #[test]
    fn orders_longest_first_with_stable_ties() {
        let d = dict();
        let spellings: Vec<&str> = d
            .by_length()
            .iter()
            .map(|&i| d.entries()[i].slang.as_str())
            .collect();
        assert_eq!(spellings, vec!["gaskeun", "mantap", "gass", "gas", "woi"]);
    }

    #[test]
    fn groups_variants_case_insensitively() {
        let d = dict();
        assert_eq!(d.canonical_indices("gas"), &[0, 2, 3]);
        let slangs: Vec<&str> = d.variants_of("GAS").iter().map(|e| e.slang.as_str()).collect();
        assert_eq!(slangs, vec!["gas", "gaskeun", "gass"]);
        assert!(d.canonical_indices("nope").is_empty());
    }

    #[test]
    fn search_matches_elongated_keywords() {
        let d = dict();
        let hits: Vec<&str> = d.search("mantaaap").iter().map(|e| e.slang.as_str()).collect();
        assert_eq!(hits, vec!["mantap"]);
        assert_eq!(d.search("KEUN").len(), 1);
        assert_eq!(d.search("  ").len(), d.len());
    }

    #[test]
    fn grouped_listing_is_sorted() {
        let d = dict();
        let groups = d.grouped(None);
        let names: Vec<&str> = groups.iter().map(|g| g.canonical_form.as_str()).collect();
        assert_eq!(names, vec!["Gas", "gas", "mantap", "woi"]);

        let filtered = d.grouped(Some("woi"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].variants[0].slang, "woi");
    }

    #[test]
    fn empty_dictionary() {
        let d = SlangDictionary::new(Vec::new());
        assert!(d.is_empty());
        assert!(d.by_length().is_empty());
        assert!(d.grouped(None).is_empty());
    }
}
