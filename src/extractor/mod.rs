// file: src/extractor/mod.rs
// description: guide extraction module exports and document-level extractor
// reference: internal module structure

pub mod heading;
pub mod issue;
pub mod parts;
pub mod patterns;
pub mod sections;
pub mod specs;

pub use heading::HeadingExtractor;
pub use issue::IssueParser;
pub use parts::PartResolver;
pub use sections::{IssueSectionSplitter, find_issues_heading, issue_category_for};
pub use specs::SpecClassifier;

use crate::config::{Config, LinkConfig};
use crate::models::VehicleGuide;
use crate::parser::{HyperlinkResolver, LineNormalizer, WordDocument};
use tracing::{debug, info};

// Window used when the common-issues heading is missing
const HEADING_WINDOW: usize = 5;
const MAX_SPEC_SCAN: usize = 50;

/// Turns a loaded document into a [`VehicleGuide`]. Images are not touched.
pub struct GuideExtractor {
    links: LinkConfig,
    normalizer: LineNormalizer,
    heading: HeadingExtractor,
    specs: SpecClassifier,
}

impl GuideExtractor {
    pub fn new(links: LinkConfig, specs: SpecClassifier) -> Self {
        Self {
            links,
            normalizer: LineNormalizer::new(),
            heading: HeadingExtractor::new(),
            specs,
        }
    }

    /// Uses the configured spec keyword rules, or the built-in ones when none are set.
    pub fn from_config(config: &Config) -> Self {
        let rules = if config.extraction.spec_rules.is_empty() {
            SpecClassifier::builtin_rules()
        } else {
            config.extraction.spec_rules.clone()
        };

        Self::new(config.links.clone(), SpecClassifier::new(rules))
    }

    pub fn extract(&self, document: &WordDocument) -> VehicleGuide {
        let lines = self.normalizer.normalize(document);
        let mut guide = VehicleGuide::new();

        let heading = self.heading.find_heading(&lines);
        if let Some(idx) = heading {
            guide.heading = lines[idx].text.clone();
            guide.description = self.heading.extract_description(&lines, idx);
        }

        let issues_heading = find_issues_heading(&lines);
        if let Some(idx) = issues_heading {
            guide.issues_heading = lines[idx].text.clone();
        } else {
            debug!("No common issues heading found");
        }

        let spec_limit = issues_heading
            .or(heading.map(|h| h + HEADING_WINDOW))
            .unwrap_or(MAX_SPEC_SCAN)
            .min(lines.len());
        for (category, table) in self.specs.extract(&lines, spec_limit) {
            guide.specs.insert(category, table);
        }

        let issue_start = issues_heading
            .or(heading.map(|h| h + HEADING_WINDOW))
            .map_or(0, |idx| idx + 1);
        let parser = IssueParser::new(HyperlinkResolver::new(document), PartResolver::new(&self.links));
        for (category, issues) in IssueSectionSplitter::new(parser).split(&lines, issue_start) {
            guide.issues.insert(category, issues);
        }

        info!(
            "Extracted {} lines: {} specs, {} issues",
            lines.len(),
            guide.spec_count(),
            guide.issue_count()
        );

        guide
    }
}

impl Default for GuideExtractor {
    fn default() -> Self {
        Self::new(LinkConfig::default(), SpecClassifier::default())
    }
}
