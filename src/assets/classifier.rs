// file: src/assets/classifier.rs
// description: car image view detection from file names
// reference: keyword-based file name classification

use crate::models::ViewName;
use std::collections::BTreeMap;
use tracing::debug;

/// Spellings of each view seen in image file names, checked in view order.
const VIEW_KEYWORDS: [(ViewName, &[&str]); 4] = [
    (ViewName::Front, &["front", "fron", "fro", "frnt"]),
    (ViewName::Side, &["side", "sid"]),
    (ViewName::Rear, &["rear", "rea"]),
    (ViewName::Quarter, &["quarter", "quattr", "quater", "quatr", "quar", "qua", "quat"]),
];

pub struct ImageClassifier {
    base_url: String,
}

impl ImageClassifier {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Assigns each image to at most one view. Files naming no view fill the
    /// views still empty afterwards, in view order.
    pub fn classify<S: AsRef<str>>(&self, file_names: &[S]) -> BTreeMap<ViewName, String> {
        let mut views = BTreeMap::new();
        let mut unmatched = Vec::new();

        for file_name in file_names.iter().map(AsRef::as_ref) {
            let mentioned = Self::mentioned_views(file_name);
            if mentioned.is_empty() {
                unmatched.push(file_name);
                continue;
            }

            match mentioned.into_iter().find(|view| !views.contains_key(view)) {
                Some(view) => {
                    views.insert(view, self.url_for(file_name));
                }
                None => debug!("No free view left for image {}", file_name),
            }
        }

        let free: Vec<ViewName> = ViewName::ALL
            .into_iter()
            .filter(|view| !views.contains_key(view))
            .collect();
        for (view, file_name) in free.into_iter().zip(unmatched) {
            debug!("Image {} has no view keyword, using it for {}", file_name, view.as_str());
            views.insert(view, self.url_for(file_name));
        }

        views
    }

    /// Views whose keywords appear in the normalized file name, in view order.
    pub fn mentioned_views(file_name: &str) -> Vec<ViewName> {
        let normalized = normalize(file_name);

        VIEW_KEYWORDS
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|k| normalized.contains(k)))
            .map(|(view, _)| *view)
            .collect()
    }

    fn url_for(&self, file_name: &str) -> String {
        format!("{}{}", self.base_url, file_name)
    }
}

// Lowercase stem with separators removed: "Q5_Front-View.JPG" -> "q5frontview"
fn normalize(file_name: &str) -> String {
    let lower = file_name.to_lowercase();
    let stem = match lower.rfind('.') {
        Some(idx) if idx > 0 => &lower[..idx],
        _ => lower.as_str(),
    };
    stem.chars().filter(|c| !matches!(c, '-' | '_' | ' ')).collect()
}
