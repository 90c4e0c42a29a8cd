//! Dictionary records and their JSON shapes.

use std::{fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Sentence or variant sentiment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

/// Unknown labels decode as neutral so one bad record never sinks a load.
impl From<String> for Sentiment {
    fn from(raw: String) -> Self {
        raw.parse().unwrap_or_default()
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            other => Err(format!("unknown sentiment `{other}`")),
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One registered spelling of a slang word.
///
/// Several entries may share `canonical_form`; they are the variants the
/// resolver chooses between.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SlangEntry {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub canonical_form: String,
    #[serde(default)]
    pub canonical_pronunciation: String,
    pub slang: String,
    #[serde(default)]
    pub pronunciation: String,
    #[serde(rename = "translationID", alias = "translationNative", default)]
    pub translation_native: String,
    #[serde(rename = "translationEN", alias = "translationTarget", default)]
    pub translation_target: String,
    #[serde(rename = "contextID", alias = "contextNative", default)]
    pub context_native: String,
    #[serde(rename = "contextEN", alias = "contextTarget", default)]
    pub context_target: String,
    #[serde(rename = "exampleID", alias = "exampleNative", default)]
    pub example_native: String,
    #[serde(rename = "exampleEN", alias = "exampleTarget", default)]
    pub example_target: String,
    #[serde(default)]
    pub sentiment: Sentiment,
}

impl SlangEntry {
    /// Minimal entry with empty glosses and a fresh id.
    pub fn new(
        canonical_form: impl Into<String>,
        slang: impl Into<String>,
        sentiment: Sentiment,
    ) -> Self {
        let canonical_form = canonical_form.into();
        let slang = slang.into();
        Self {
            id: Uuid::new_v4(),
            canonical_pronunciation: canonical_form.clone(),
            pronunciation: slang.clone(),
            canonical_form,
            slang,
            translation_native: String::new(),
            translation_target: String::new(),
            context_native: String::new(),
            context_target: String::new(),
            example_native: String::new(),
            example_target: String::new(),
            sentiment,
        }
    }

    pub fn with_translation(
        mut self,
        native: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.translation_native = native.into();
        self.translation_target = target.into();
        self
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Lowercase canonical form, the key variants are grouped under.
    pub fn canonical_key(&self) -> String {
        self.canonical_form.to_lowercase()
    }

    /// Lowercase spelling as searched in text.
    pub fn spelling(&self) -> String {
        self.slang.to_lowercase()
    }

    fn from_group(group: &SlangGroup, variant: SlangVariant) -> Self {
        Self {
            id: Uuid::new_v4(),
            canonical_form: group.canonical_form.clone(),
            canonical_pronunciation: group.canonical_pronunciation.clone(),
            slang: variant.slang,
            pronunciation: variant.pronunciation,
            translation_native: variant.translation_native,
            translation_target: variant.translation_target,
            context_native: variant.context_native,
            context_target: variant.context_target,
            example_native: variant.example_native,
            example_target: variant.example_target,
            sentiment: variant.sentiment,
        }
    }
}

/// On-disk grouping: one canonical word with all of its variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlangGroup {
    pub canonical_form: String,
    #[serde(default)]
    pub canonical_pronunciation: String,
    pub variants: Vec<SlangVariant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlangVariant {
    pub slang: String,
    #[serde(default)]
    pub pronunciation: String,
    #[serde(rename = "translationID", default)]
    pub translation_native: String,
    #[serde(rename = "translationEN", default)]
    pub translation_target: String,
    #[serde(rename = "contextID", default)]
    pub context_native: String,
    #[serde(rename = "contextEN", default)]
    pub context_target: String,
    #[serde(rename = "exampleID", default)]
    pub example_native: String,
    #[serde(rename = "exampleEN", default)]
    pub example_target: String,
    #[serde(default)]
    pub sentiment: Sentiment,
}

fn flatten(groups: Vec<SlangGroup>) -> Vec<SlangEntry> {
    let mut entries = Vec::new();
    for mut group in groups {
        let variants = std::mem::take(&mut group.variants);
        for variant in variants {
            entries.push(SlangEntry::from_group(&group, variant));
        }
    }
    entries
}

/// Decode the grouped shape, failing on the first malformed group.
pub fn load_grouped_json(json: &str) -> Result<Vec<SlangEntry>> {
    let groups: Vec<SlangGroup> = serde_json::from_str(json)?;
    Ok(flatten(groups))
}

/// Decode the grouped shape, skipping groups that do not decode.
pub fn load_grouped_json_lenient(json: &str) -> Result<Vec<SlangEntry>> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(items) = value else {
        return Err(Error::Shape("expected a top-level array of groups".into()));
    };

    let mut groups = Vec::with_capacity(items.len());
    for item in items {
        let canonical = item
            .get("canonicalForm")
            .and_then(Value::as_str)
            .map(str::to_string);
        match serde_json::from_value::<SlangGroup>(item) {
            Ok(group) => groups.push(group),
            Err(err) => match canonical {
                Some(name) => warn!("skipped group `{name}` due to invalid structure: {err}"),
                None => warn!("skipped group due to invalid structure: {err}"),
            },
        }
    }
    Ok(flatten(groups))
}

/// Decode an array of already-flattened entries.
pub fn load_flat_json(json: &str) -> Result<Vec<SlangEntry>> {
    Ok(serde_json::from_str(json)?)
}

/// Read a dictionary file, accepting either the grouped or the flat shape.
///
/// The shape is chosen from the first element: a `variants` key means grouped.
pub fn load_dictionary_file(path: &Path) -> Result<Vec<SlangEntry>> {
    let text = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&text)?;
    let grouped = match &value {
        Value::Array(items) => items
            .first()
            .map(|first| first.get("variants").is_some())
            .unwrap_or(false),
        _ => return Err(Error::Shape("expected a top-level JSON array".into())),
    };
    let entries = if grouped {
        load_grouped_json_lenient(&text)?
    } else {
        serde_json::from_value(value)?
    };
    debug!("loaded {} entries from {}", entries.len(), path.display());
    Ok(entries)
}
