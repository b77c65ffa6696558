// file: src/extractor/heading.rs
// description: guide title and free-text description extraction
// reference: first lines of a vehicle platform guide

use crate::parser::LineRecord;
use tracing::debug;

const HEADING_PREFIX: &str = "vehicle platform guide";
const DESCRIPTION_STOP_MARKERS: [&str; 4] = ["Specifications", "Common Issues", "Fault Codes", "Top 20"];
const MIN_DESCRIPTION_CHARS: usize = 40;

pub struct HeadingExtractor;

impl HeadingExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Index of the guide title line. Falls back to the first line.
    pub fn find_heading(&self, lines: &[LineRecord]) -> Option<usize> {
        let found = lines
            .iter()
            .position(|line| line.text.to_lowercase().starts_with(HEADING_PREFIX));

        if found.is_none() && !lines.is_empty() {
            debug!("No guide heading found, using the first line");
            return Some(0);
        }
        found
    }

    /// Long lines following the heading, up to the first section marker.
    /// Short lines are stray labels and are skipped.
    pub fn extract_description(&self, lines: &[LineRecord], heading: usize) -> String {
        lines
            .iter()
            .skip(heading + 1)
            .map(|line| line.text.as_str())
            .take_while(|text| !DESCRIPTION_STOP_MARKERS.iter().any(|m| text.contains(m)))
            .filter(|text| text.chars().count() > MIN_DESCRIPTION_CHARS)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Default for HeadingExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParagraphId;

    fn lines(texts: &[&str]) -> Vec<LineRecord> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| LineRecord {
                text: t.to_string(),
                paragraph: ParagraphId(i),
            })
            .collect()
    }

    #[test]
    fn test_heading_prefix_is_case_insensitive() {
        let lines = lines(&["Intro", "VEHICLE PLATFORM GUIDE: BMW X3", "Body"]);
        assert_eq!(HeadingExtractor::new().find_heading(&lines), Some(1));
    }

    #[test]
    fn test_heading_falls_back_to_first_line() {
        let lines = lines(&["Audi Q5 Overview", "Specifications"]);
        assert_eq!(HeadingExtractor::new().find_heading(&lines), Some(0));
        assert_eq!(HeadingExtractor::new().find_heading(&[]), None);
    }

    #[test]
    fn test_description_skips_short_lines_and_stops_at_marker() {
        let lines = lines(&[
            "Vehicle Platform Guide: Audi Q5",
            "Overview",
            "This SUV blends performance with everyday usability in a compact crossover body.",
            "It remains one of the most popular premium crossovers across North America.",
            "Specifications",
            "A long line after the marker that must never be part of the description text.",
        ]);

        let description = HeadingExtractor::new().extract_description(&lines, 0);
        assert_eq!(
            description,
            "This SUV blends performance with everyday usability in a compact crossover body.\n\n\
             It remains one of the most popular premium crossovers across North America."
        );
    }

    #[test]
    fn test_description_empty_when_marker_follows_heading() {
        let lines = lines(&["Vehicle Platform Guide: Audi Q5", "Top 20 Common Issues"]);
        assert!(HeadingExtractor::new().extract_description(&lines, 0).is_empty());
    }
}
