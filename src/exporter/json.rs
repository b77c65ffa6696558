// file: src/exporter/json.rs
// description: json export of parsed guides and batch manifests

use crate::error::{ReportError, Result};
use crate::models::VehicleGuide;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_dir: PathBuf,
    pretty: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportManifest {
    pub exported_at: String,
    pub rendered_documents: usize,
    pub failed_documents: usize,
    pub files: Vec<String>,
}

impl ExportManifest {
    /// `files` may hold several outputs per document, so counts are passed in.
    pub fn new(files: Vec<String>, rendered_documents: usize, failed_documents: usize) -> Self {
        Self {
            exported_at: Utc::now().to_rfc3339(),
            rendered_documents,
            failed_documents,
            files,
        }
    }
}

/// Serializes a guide on its own, for callers that print rather than write.
pub fn to_json(guide: &VehicleGuide, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(guide)
    } else {
        serde_json::to_string(guide)
    };
    json.map_err(|e| ReportError::Serialization(e.to_string()))
}

impl JsonExporter {
    pub fn new(output_dir: impl Into<PathBuf>, pretty: bool) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir, pretty })
    }

    /// Writes `<stem>.json` and returns its path.
    pub fn export_guide(&self, guide: &VehicleGuide, stem: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(format!("{}.json", stem));
        self.write(&path, &to_json(guide, self.pretty)?)?;
        Ok(path)
    }

    pub fn export_manifest(&self, manifest: &ExportManifest) -> Result<PathBuf> {
        let json = serde_json::to_string_pretty(manifest)
            .map_err(|e| ReportError::Serialization(e.to_string()))?;
        let path = self.output_dir.join(MANIFEST_FILE);
        self.write(&path, &json)?;

        info!(
            "Export complete: {} documents, {} failed",
            manifest.rendered_documents, manifest.failed_documents
        );
        Ok(path)
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        fs::write(path, contents).map_err(|source| ReportError::FileOperation {
            path: path.to_path_buf(),
            source,
        })
    }
}
