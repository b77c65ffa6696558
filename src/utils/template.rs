// file: src/utils/template.rs
// description: page template loading and named placeholder substitution
// reference: {name} placeholders replaced in a single pass

use crate::error::{ReportError, Result};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const BUILTIN_TEMPLATE: &str = include_str!("../../templates/guide.html");

lazy_static! {
    static ref PLACEHOLDER: Regex =
        Regex::new(r"\{([a-z_]+)\}").expect("PLACEHOLDER regex is valid");
}

#[derive(Debug, Clone)]
pub struct PageTemplate {
    template: String,
}

impl PageTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Template compiled into the binary.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_TEMPLATE)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let template = fs::read_to_string(path).map_err(|source| ReportError::FileOperation {
            path: path.to_path_buf(),
            source,
        })?;

        if template.trim().is_empty() {
            return Err(ReportError::Template(format!(
                "Template is empty: {}",
                path.display()
            )));
        }
        Ok(Self::new(template))
    }

    /// Substitutes every known placeholder. Unknown ones are left as written,
    /// and substituted values are never scanned again.
    pub fn render(&self, values: &HashMap<&str, String>) -> String {
        PLACEHOLDER
            .replace_all(&self.template, |caps: &Captures| match values.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Placeholder names used by the template, in order of first use.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for caps in PLACEHOLDER.captures_iter(&self.template) {
            if let Some(name) = caps.get(1).map(|m| m.as_str())
                && !names.contains(&name)
            {
                names.push(name);
            }
        }
        names
    }
}

impl Default for PageTemplate {
    fn default() -> Self {
        Self::builtin()
    }
}
