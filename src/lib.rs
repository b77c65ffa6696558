// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod assets;
pub mod config;
pub mod error;
pub mod exporter;
pub mod extractor;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod utils;

pub use assets::{FileScanner, ImageClassifier, ScannedFile};
pub use config::{Config, ExtractionConfig, LinkConfig, PipelineConfig, RenderConfig, SpecRule};
pub use error::{ReportError, Result};
pub use exporter::{ExportManifest, HtmlRenderer, JsonExporter, to_json};
pub use extractor::GuideExtractor;
pub use models::{
    Brand, Issue, IssueCategory, Part, SpecCategory, SpecEntry, SpecTable, VehicleGuide, ViewName,
};
pub use parser::{LineNormalizer, LineRecord, WordDocument};
pub use pipeline::{
    BatchOptions, BatchOrchestrator, GuideProcessor, PipelineStats, ProcessingResult,
    ProgressTracker,
};
pub use utils::{OperationTimer, PageTemplate, PerformanceMetrics, Validator};
