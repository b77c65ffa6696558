// file: src/parser/normalizer.rs
// description: flattens document paragraphs into trimmed, dash-normalized text lines
// reference: line stream consumed by the extractors

use crate::parser::document::{ParagraphId, WordDocument};

/// One non-empty line of text and the paragraph it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRecord {
    pub text: String,
    pub paragraph: ParagraphId,
}

pub struct LineNormalizer;

impl LineNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, document: &WordDocument) -> Vec<LineRecord> {
        let mut lines = Vec::new();

        for (index, paragraph) in document.paragraphs().iter().enumerate() {
            let text = self.normalize_dashes(paragraph.text.trim());
            if text.is_empty() {
                continue;
            }

            // A paragraph with soft line breaks carries several fields.
            for line in text.split('\n') {
                let line = line.trim();
                if !line.is_empty() {
                    lines.push(LineRecord {
                        text: line.to_string(),
                        paragraph: ParagraphId(index),
                    });
                }
            }
        }

        lines
    }

    fn normalize_dashes(&self, text: &str) -> String {
        text.replace(['\u{2013}', '\u{2014}'], "-")
    }
}

impl Default for LineNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
