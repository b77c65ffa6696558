// file: src/parser/hyperlink.rs
// description: resolves paragraph hyperlinks to visible text and cleaned target urls
// reference: word/_rels/document.xml.rels relationship lookup

use crate::parser::document::{ParagraphId, WordDocument};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hyperlink {
    pub text: String,
    pub url: String,
}

impl Hyperlink {
    /// True when the visible text is itself a raw URL rather than a label.
    pub fn is_raw_url(&self) -> bool {
        self.text.starts_with("http://") || self.text.starts_with("https://")
    }
}

/// Drops the query string and fragment from a URL.
pub fn clean_url(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    url[..end].trim()
}

pub struct HyperlinkResolver<'a> {
    document: &'a WordDocument,
}

impl<'a> HyperlinkResolver<'a> {
    pub fn new(document: &'a WordDocument) -> Self {
        Self { document }
    }

    /// Resolved hyperlinks of a paragraph in document order. Links that do not
    /// resolve are left out.
    pub fn resolve(&self, paragraph: ParagraphId) -> Vec<Hyperlink> {
        let Some(paragraph) = self.document.paragraph(paragraph) else {
            return Vec::new();
        };

        paragraph
            .hyperlinks
            .iter()
            .filter_map(|link| {
                let text = link.text.trim();
                let rel_id = link.rel_id.as_deref()?;
                if text.is_empty() {
                    return None;
                }

                match self.document.relationship_target(rel_id) {
                    Some(target) if !clean_url(target).is_empty() => Some(Hyperlink {
                        text: text.to_string(),
                        url: clean_url(target).to_string(),
                    }),
                    _ => {
                        debug!("Skipping unresolved hyperlink {} ({})", rel_id, text);
                        None
                    }
                }
            })
            .collect()
    }
}
