// file: src/models/issue.rs
// description: diagnostic issue model with parts and brands
// reference: internal data structures

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub title: String,
    pub fault_codes: String,
    pub why: String,
    pub symptoms: Vec<String>,
    pub parts: Vec<Part>,
    pub brands: Vec<Brand>,
}

impl Issue {
    pub fn new(title: String) -> Self {
        Self {
            title,
            ..Self::default()
        }
    }

    /// True once any field after fault codes holds content.
    pub fn has_content(&self) -> bool {
        !self.why.is_empty() || !self.symptoms.is_empty() || !self.parts.is_empty()
    }
}

/// A replacement part. `description` is the text that directly follows the
/// name in the source line, leading separator included, so `name + description`
/// reads as the original sentence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub name: String,
    pub description: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub name: String,
    pub link: String,
}

impl Brand {
    pub fn new(name: &str, base_url: &str) -> Self {
        Self {
            name: name.to_string(),
            link: format!("{}{}", base_url, name.replace(' ', "-")),
        }
    }
}
