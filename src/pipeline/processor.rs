// file: src/pipeline/processor.rs
// description: turns one guide document into a parsed record and an html page
// reference: load, extract, attach images, render

use crate::assets::{FileScanner, ImageClassifier};
use crate::config::Config;
use crate::error::Result;
use crate::exporter::HtmlRenderer;
use crate::extractor::GuideExtractor;
use crate::models::{VehicleGuide, ViewName};
use crate::parser::WordDocument;
use crate::utils::{OperationTimer, Validator};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Folder names searched next to a document when no image folder is given.
const IMAGE_FOLDER_NAMES: [&str; 10] = [
    "Car images",
    "Car image",
    "Car",
    "car images",
    "car image",
    "car",
    "Images",
    "images",
    "Image",
    "image",
];
const SLOW_DOCUMENT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct ProcessingResult {
    pub source: PathBuf,
    pub output: PathBuf,
    pub guide: VehicleGuide,
    pub source_bytes: u64,
}

pub struct GuideProcessor {
    extractor: GuideExtractor,
    renderer: HtmlRenderer,
    classifier: ImageClassifier,
}

impl GuideProcessor {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            extractor: GuideExtractor::from_config(config),
            renderer: HtmlRenderer::from_config(&config.render)?,
            classifier: ImageClassifier::new(config.links.image_base_url.clone()),
        })
    }

    /// Replaces the renderer built from the configured template.
    pub fn with_renderer(mut self, renderer: HtmlRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Parses a guide document and attaches car images. Images come from
    /// `images_dir`, or from a conventionally named folder beside the document.
    pub fn parse(&self, path: &Path, images_dir: Option<&Path>) -> Result<VehicleGuide> {
        Validator::validate_document_path(path)?;
        let timer = OperationTimer::new(format!("parse {}", path.display()));

        let document = WordDocument::open(path)?;
        timer.checkpoint("loaded");

        let mut guide = self.extractor.extract(&document);
        timer.checkpoint("extracted");

        let images_dir = match images_dir {
            Some(dir) => Some(dir.to_path_buf()),
            None => find_image_folder(path),
        };
        if let Some(dir) = images_dir {
            guide.merge_images(self.classify_images(&dir)?);
        }

        timer.warn_if_slow(SLOW_DOCUMENT);
        timer.finish();
        Ok(guide)
    }

    /// Parses `path` and writes the rendered page to `output`.
    pub fn render(&self, path: &Path, images_dir: Option<&Path>, output: &Path) -> Result<ProcessingResult> {
        Validator::validate_output_path(output)?;

        let guide = self.parse(path, images_dir)?;
        self.renderer.write(&guide, output)?;

        let source_bytes = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        info!(
            "Rendered {} -> {} ({} issues)",
            path.display(),
            output.display(),
            guide.issue_count()
        );

        Ok(ProcessingResult {
            source: path.to_path_buf(),
            output: output.to_path_buf(),
            guide,
            source_bytes,
        })
    }

    pub fn classify_images(&self, dir: &Path) -> Result<BTreeMap<ViewName, String>> {
        let files = FileScanner::unbounded().scan_images(dir)?;
        let names: Vec<&str> = files.iter().map(|f| f.file_name.as_str()).collect();
        let views = self.classifier.classify(&names);

        debug!("Matched {} of {} images in {}", views.len(), names.len(), dir.display());
        Ok(views)
    }
}

fn find_image_folder(document: &Path) -> Option<PathBuf> {
    let parent = document_dir(document);

    IMAGE_FOLDER_NAMES
        .iter()
        .map(|name| parent.join(name))
        .find(|candidate| candidate.is_dir())
}

/// Folder holding `document`; a bare file name lives in the working directory.
fn document_dir(document: &Path) -> &Path {
    match document.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
