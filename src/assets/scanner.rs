// file: src/assets/scanner.rs
// description: single-level directory listing of guide documents and car images
// reference: https://docs.rs/walkdir

use crate::error::{ReportError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

pub const DOCUMENT_EXTENSIONS: [&str; 1] = ["docx"];
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

pub struct FileScanner {
    max_file_size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub file_name: String,
    pub size: u64,
}

impl FileScanner {
    /// Scanner that skips files larger than `max_file_size_mb`.
    pub fn new(max_file_size_mb: usize) -> Self {
        Self {
            max_file_size: Some((max_file_size_mb as u64) * 1024 * 1024),
        }
    }

    pub fn unbounded() -> Self {
        Self { max_file_size: None }
    }

    /// Guide documents directly inside `root`, sorted by file name.
    pub fn scan_documents(&self, root: &Path) -> Result<Vec<ScannedFile>> {
        let files = self.scan(root, &DOCUMENT_EXTENSIONS)?;
        info!("Found {} guide documents in {}", files.len(), root.display());
        Ok(files)
    }

    /// Car images directly inside `root`. A missing folder has no images.
    pub fn scan_images(&self, root: &Path) -> Result<Vec<ScannedFile>> {
        if !root.exists() {
            debug!("Image folder {} not found", root.display());
            return Ok(Vec::new());
        }
        self.scan(root, &IMAGE_EXTENSIONS)
    }

    /// Files directly inside `root` with one of `extensions`, compared
    /// case-insensitively. Sorted by file name.
    pub fn scan(&self, root: &Path, extensions: &[&str]) -> Result<Vec<ScannedFile>> {
        if root.is_file() {
            return Err(ReportError::Validation(format!(
                "Expected a directory: {}",
                root.display()
            )));
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                debug!("Skipping non UTF-8 file name: {}", path.display());
                continue;
            };

            if !has_extension(path, extensions) || file_name.starts_with("~$") {
                continue;
            }

            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            let size = metadata.len();

            if let Some(max_size) = self.max_file_size
                && size > max_size
            {
                warn!(
                    "Skipping large file ({} MB): {}",
                    size / 1024 / 1024,
                    path.display()
                );
                continue;
            }

            files.push(ScannedFile {
                path: path.to_path_buf(),
                file_name: file_name.to_string(),
                size,
            });
        }

        files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(files)
    }
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| ext.eq_ignore_ascii_case(want)))
}
