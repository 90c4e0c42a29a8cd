//! SLNG core slang detection engine.
//! Finds known slang in free-form sentences, including letter-elongated
//! spellings, picks the dictionary variant that best fits each occurrence and
//! returns one entry per distinct word in order of first appearance.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod claims;
pub mod dictionary;
pub mod elongation;
pub mod entry;
pub mod error;
pub mod exact;
pub mod normalize;
pub mod order;
pub mod resolve;

pub use claims::ClaimedRanges;
pub use dictionary::{CanonicalGroup, SlangDictionary};
pub use elongation::ElongationMatcher;
pub use entry::{
    load_dictionary_file, load_flat_json, load_grouped_json, load_grouped_json_lenient,
    Sentiment, SlangEntry, SlangGroup, SlangVariant,
};
pub use error::{Error, Result};
pub use exact::ExactMatcher;
pub use order::Detected;
pub use resolve::{MatchGroup, Resolution};

/// When the elongation pass runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ElongationPolicy {
    /// Every sentence, over the regions exact matching left unclaimed.
    #[default]
    Always,
    /// Only when exact matching found nothing anywhere in the sentence.
    FallbackOnly,
    Off,
}

/// Detector configuration, usually loaded from `slng.yml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DetectorConfig {
    pub elongation: ElongationPolicy,
    /// Retry exact matching on the repeat-collapsed sentence when both passes
    /// come back empty.
    pub normalized_retry: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            elongation: ElongationPolicy::Always,
            normalized_retry: true,
        }
    }
}

impl DetectorConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }
}

/// Which pass produced a raw match.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum MatchSource {
    Exact,
    Elongated,
    /// Exact match against the repeat-collapsed sentence.
    Normalized,
}

/// A dictionary entry found at a byte range of the searched text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawMatch {
    pub entry: usize,
    pub span: Range<usize>,
    pub source: MatchSource,
}

/// Full outcome of one detection run.
#[derive(Debug, Clone, Serialize)]
pub struct Detection {
    /// Lowercased sentence, or its collapsed form after a normalized retry.
    /// Every span refers to this text.
    pub searched_text: String,
    pub normalized_retry: bool,
    pub raw_matches: Vec<RawMatch>,
    pub resolutions: Vec<Resolution>,
    pub detected: Vec<Detected>,
    /// One entry per distinct word, in order of first appearance.
    pub entries: Vec<SlangEntry>,
}

impl Detection {
    fn empty(searched_text: String) -> Self {
        Self {
            searched_text,
            normalized_retry: false,
            raw_matches: Vec::new(),
            resolutions: Vec::new(),
            detected: Vec::new(),
            entries: Vec::new(),
        }
    }
}

/// Detector holds the compiled matchers for one dictionary snapshot.
pub struct Detector {
    config: DetectorConfig,
    dictionary: SlangDictionary,
    exact: ExactMatcher,
    elongation: ElongationMatcher,
}

impl Detector {
    pub fn new(entries: Vec<SlangEntry>, config: DetectorConfig) -> Self {
        Self::from_dictionary(SlangDictionary::new(entries), config)
    }

    pub fn from_dictionary(dictionary: SlangDictionary, config: DetectorConfig) -> Self {
        let exact = ExactMatcher::new(&dictionary);
        let elongation = ElongationMatcher::new(&dictionary);
        Self {
            config,
            dictionary,
            exact,
            elongation,
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn dictionary(&self) -> &SlangDictionary {
        &self.dictionary
    }

    /// Ordered unique entries found in `text`.
    pub fn detect_entries(&self, text: &str, hint: Option<Sentiment>) -> Vec<SlangEntry> {
        self.detect(text, hint).entries
    }

    pub fn detect(&self, text: &str, hint: Option<Sentiment>) -> Detection {
        let lowered = text.to_lowercase();
        if self.dictionary.is_empty() || lowered.trim().is_empty() {
            return Detection::empty(lowered);
        }

        let mut raw = self.find_raw(&lowered);
        let mut searched = lowered;
        let mut retried = false;

        if raw.is_empty() && self.config.normalized_retry {
            let collapsed = normalize::collapse_repeats(&searched);
            if collapsed != searched {
                let (found, _) = self.exact.find(&collapsed, &ClaimedRanges::new());
                raw = found
                    .into_iter()
                    .map(|m| RawMatch {
                        source: MatchSource::Normalized,
                        ..m
                    })
                    .collect();
                searched = collapsed;
                retried = true;
            }
        }

        let resolutions = resolve::resolve(&raw, &searched, &self.dictionary, hint);
        let detected = order::dedupe_ordered(&resolutions, &raw, &self.dictionary);
        let entries = detected
            .iter()
            .filter_map(|d| self.dictionary.get(d.entry).cloned())
            .collect::<Vec<_>>();

        debug!(
            raw = raw.len(),
            distinct = entries.len(),
            retried,
            "slang detection finished"
        );

        Detection {
            searched_text: searched,
            normalized_retry: retried,
            raw_matches: raw,
            resolutions,
            detected,
            entries,
        }
    }

    /// Exact pass, then the elongation pass per policy over what is left.
    fn find_raw(&self, lowered: &str) -> Vec<RawMatch> {
        let (mut raw, claimed) = self.exact.find(lowered, &ClaimedRanges::new());
        let run_elongation = match self.config.elongation {
            ElongationPolicy::Always => true,
            ElongationPolicy::FallbackOnly => raw.is_empty(),
            ElongationPolicy::Off => false,
        };
        if run_elongation {
            let (elongated, _) = self.elongation.find(lowered, &claimed);
            debug!(
                exact = raw.len(),
                elongated = elongated.len(),
                "matching passes finished"
            );
            raw.extend(elongated);
        }
        raw
    }
}

/// One-shot detection with the default configuration.
///
/// Callers detecting many sentences against one dictionary should keep a
/// [`Detector`] so matchers are compiled once.
pub fn detect_slang(
    text: &str,
    dictionary: &[SlangEntry],
    sentiment_hint: Option<Sentiment>,
) -> Vec<SlangEntry> {
    Detector::new(dictionary.to_vec(), DetectorConfig::default())
        .detect_entries(text, sentiment_hint)
}
