// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

mod orchestrator;
mod processor;
mod progress;

pub use orchestrator::{BatchOptions, BatchOrchestrator};
pub use processor::{GuideProcessor, ProcessingResult};
pub use progress::{PipelineStats, ProgressTracker};
