// file: src/extractor/specs.rs
// description: key/value specification extraction and keyword categorization
// reference: configurable keyword-based classification

use crate::config::SpecRule;
use crate::models::{SpecCategory, SpecTable};
use crate::parser::LineRecord;
use std::collections::BTreeMap;

const EXCLUDED_MARKERS: [&str; 8] = [
    "Vehicle Platform Guide",
    "In this",
    "Common Issues",
    "Fault Codes:",
    "Why it happens:",
    "Symptoms:",
    "Parts to Replace:",
    "Brands:",
];
const MAX_LINE_CHARS: usize = 200;
const MAX_KEY_CHARS: usize = 50;

pub struct SpecClassifier {
    rules: Vec<SpecRule>,
}

impl SpecClassifier {
    pub fn new(rules: Vec<SpecRule>) -> Self {
        Self { rules }
    }

    /// Built-in keyword sets, checked in priority order.
    pub fn builtin_rules() -> Vec<SpecRule> {
        let rule = |category, keywords: &[&str]| SpecRule {
            category,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        };

        vec![
            rule(
                SpecCategory::EngineAndPowertrain,
                &["engine", "horse", "torque", "transmission", "fuel type", "displacement", "cylinders"],
            ),
            rule(
                SpecCategory::ConfigurationsAndSubmodels,
                &["drive", "configuration", "submodel", "trim", "body", "door", "seat", "cargo"],
            ),
            rule(
                SpecCategory::FuelEconomy,
                &["mpg", "fuel economy", "city", "highway", "combined"],
            ),
            rule(
                SpecCategory::VehicleWeight,
                &["weight", "payload", "towing", "gvwr"],
            ),
        ]
    }

    /// First category with a keyword starting a word of the key, ignoring case.
    pub fn categorize(&self, key: &str) -> Option<SpecCategory> {
        let key = key.to_lowercase();

        self.rules
            .iter()
            .find(|rule| {
                rule.keywords
                    .iter()
                    .any(|keyword| starts_word_in(&key, &keyword.to_lowercase()))
            })
            .map(|rule| rule.category)
    }

    /// Buckets `key: value` lines from `lines[..limit]`. Uncategorized keys are dropped.
    pub fn extract(&self, lines: &[LineRecord], limit: usize) -> BTreeMap<SpecCategory, SpecTable> {
        let mut specs: BTreeMap<SpecCategory, SpecTable> = BTreeMap::new();

        for line in lines.iter().take(limit) {
            let Some((key, value)) = self.split_candidate(&line.text) else {
                continue;
            };

            if let Some(category) = self.categorize(key) {
                specs
                    .entry(category)
                    .or_default()
                    .insert(key.to_string(), value.to_string());
            }
        }

        specs
    }

    fn split_candidate<'t>(&self, text: &'t str) -> Option<(&'t str, &'t str)> {
        if text.chars().count() >= MAX_LINE_CHARS
            || EXCLUDED_MARKERS.iter().any(|marker| text.contains(marker))
        {
            return None;
        }

        let (key, value) = text.split_once(':')?;
        let (key, value) = (key.trim(), value.trim());

        if key.is_empty()
            || value.is_empty()
            || key.chars().count() >= MAX_KEY_CHARS
            || key.starts_with("Note")
        {
            return None;
        }

        Some((key, value))
    }
}

// "city" must not match inside "capacity".
fn starts_word_in(haystack: &str, needle: &str) -> bool {
    !needle.is_empty()
        && haystack.match_indices(needle).any(|(idx, _)| {
            haystack[..idx]
                .chars()
                .next_back()
                .is_none_or(|c| !c.is_alphanumeric())
        })
}

impl Default for SpecClassifier {
    fn default() -> Self {
        Self::new(Self::builtin_rules())
    }
}
