// file: src/extractor/sections.rs
// description: common-issues section detection and per-category issue splitting
// reference: category header lookup table

use crate::extractor::issue::IssueParser;
use crate::models::{Issue, IssueCategory};
use crate::parser::LineRecord;
use lazy_static::lazy_static;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

const ISSUES_HEADING_MARKERS: [&str; 2] = ["Top Common Issues", "Common Issues"];

lazy_static! {
    // Header spellings seen in guides, keyed lowercase
    static ref CATEGORY_HEADERS: HashMap<&'static str, IssueCategory> = {
        use IssueCategory::*;

        HashMap::from([
            ("brake system", Brakes),
            ("brakes system", Brakes),
            ("brakes", Brakes),
            ("suspension system", Suspension),
            ("suspension", Suspension),
            ("ignition system", Ignition),
            ("ignition", Ignition),
            ("steering system", Steering),
            ("steering", Steering),
            ("engine management system", Engine),
            ("engine system", Engine),
            ("engine", Engine),
            ("fuel delivery system", FuelDelivery),
            ("fuel system", FuelDelivery),
            ("fuel delivery", FuelDelivery),
            ("electrical management system", ElectricalSystem),
            ("electrical systems", ElectricalSystem),
            ("electrical system", ElectricalSystem),
            ("electrical", ElectricalSystem),
            ("driveline", DrivelineTransmission),
            ("driveline system", DrivelineTransmission),
            ("transmission system", DrivelineTransmission),
            ("driveline/transmission system", DrivelineTransmission),
            ("transmission", DrivelineTransmission),
            ("driveline / transmission", DrivelineTransmission),
            ("driveline / transmission system", DrivelineTransmission),
            ("other system", Others),
            ("others", Others),
        ])
    };
}

/// Category named by a header line, matched exactly after trimming,
/// lowercasing and dropping trailing colons.
pub fn issue_category_for(line: &str) -> Option<IssueCategory> {
    let key = line.trim().to_lowercase();
    CATEGORY_HEADERS
        .get(key.trim_end_matches(':').trim_end())
        .copied()
}

/// Index of the first "Common Issues" heading line.
pub fn find_issues_heading(lines: &[LineRecord]) -> Option<usize> {
    lines
        .iter()
        .position(|line| ISSUES_HEADING_MARKERS.iter().any(|m| line.text.contains(m)))
}

pub struct IssueSectionSplitter<'a> {
    parser: IssueParser<'a>,
}

impl<'a> IssueSectionSplitter<'a> {
    pub fn new(parser: IssueParser<'a>) -> Self {
        Self { parser }
    }

    /// Splits `lines[start..]` into issues grouped by category. Lines before
    /// the first category header are ignored.
    pub fn split(&self, lines: &[LineRecord], start: usize) -> BTreeMap<IssueCategory, Vec<Issue>> {
        let mut issues: BTreeMap<IssueCategory, Vec<Issue>> = BTreeMap::new();
        let mut current = None;
        let mut i = start;

        while i < lines.len() {
            if let Some(category) = issue_category_for(&lines[i].text) {
                debug!("Entering issue category {}", category);
                current = Some(category);
                i += 1;
                continue;
            }

            let Some(category) = current else {
                i += 1;
                continue;
            };

            let (issue, next) = self.parser.parse_block(lines, i);
            if let Some(issue) = issue {
                issues.entry(category).or_default().push(issue);
            }
            i = next;
        }

        issues
    }
}
