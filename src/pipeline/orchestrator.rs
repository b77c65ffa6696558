// file: src/pipeline/orchestrator.rs
// description: renders every guide document of a directory concurrently
// reference: bounded blocking tasks driven by a buffered stream

use crate::assets::{FileScanner, ScannedFile};
use crate::config::Config;
use crate::error::{ReportError, Result};
use crate::exporter::{ExportManifest, JsonExporter};
use crate::pipeline::processor::{GuideProcessor, ProcessingResult};
use crate::pipeline::progress::{PipelineStats, ProgressTracker};
use crate::utils::{OperationTimer, Validator};
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub images_dir: Option<PathBuf>,
    /// Also write `<stem>.json` beside each page.
    pub write_json: bool,
    pub show_progress: bool,
    pub colored: bool,
}

pub struct BatchOrchestrator {
    config: Config,
    processor: Arc<GuideProcessor>,
    max_concurrent_tasks: usize,
}

impl BatchOrchestrator {
    pub fn new(config: Config) -> Result<Self> {
        let processor = Arc::new(GuideProcessor::new(&config)?);
        Ok(Self::with_processor(config, processor))
    }

    pub fn with_processor(config: Config, processor: Arc<GuideProcessor>) -> Self {
        let max_concurrent_tasks = config.pipeline.parallel_workers.max(1);
        Self {
            config,
            processor,
            max_concurrent_tasks,
        }
    }

    /// Renders `<stem>.html` into `output_dir` for each `.docx` directly in
    /// `input_dir`. A failed document is logged and counted, never fatal.
    pub async fn run(&self, input_dir: &Path, output_dir: &Path, options: &BatchOptions) -> Result<PipelineStats> {
        Validator::validate_directory(input_dir)?;
        let timer = OperationTimer::new("batch render");

        let files = self.scan_documents(input_dir).await?;
        if files.is_empty() {
            warn!("No guide documents found in {}", input_dir.display());
            return Ok(PipelineStats::new());
        }

        let progress = Arc::new(if options.show_progress {
            ProgressTracker::new(files.len(), options.colored)
        } else {
            ProgressTracker::hidden(files.len())
        });

        info!(
            "Rendering {} documents with {} concurrent tasks",
            files.len(),
            self.max_concurrent_tasks
        );
        let results = self
            .process_files(files, output_dir, options.images_dir.clone(), progress.clone())
            .await;

        let stats = progress.get_stats();
        progress.finish();

        self.export_results(&results, output_dir, stats.documents_failed, options.write_json)?;
        timer.finish_with_count(stats.documents_rendered);
        self.log_final_stats(&stats);

        Ok(stats)
    }

    async fn scan_documents(&self, input_dir: &Path) -> Result<Vec<ScannedFile>> {
        let root = input_dir.to_path_buf();
        let max_file_size_mb = self.config.pipeline.max_file_size_mb;

        tokio::task::spawn_blocking(move || FileScanner::new(max_file_size_mb).scan_documents(&root))
            .await
            .map_err(|e| ReportError::Validation(format!("Document scanning task failed: {}", e)))?
    }

    async fn process_files(
        &self,
        files: Vec<ScannedFile>,
        output_dir: &Path,
        images_dir: Option<PathBuf>,
        progress: Arc<ProgressTracker>,
    ) -> Vec<ProcessingResult> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_tasks));

        let tasks = files.into_iter().map(|file| {
            let semaphore = semaphore.clone();
            let processor = self.processor.clone();
            let progress = progress.clone();
            let images_dir = images_dir.clone();
            let output = output_dir.join(format!("{}.html", Validator::output_stem(&file.path)));

            async move {
                let permit = semaphore.acquire_owned().await.ok()?;
                progress.set_message(file.file_name.clone());

                let rendered = tokio::task::spawn_blocking({
                    let path = file.path.clone();
                    move || processor.render(&path, images_dir.as_deref(), &output)
                })
                .await;

                drop(permit);

                match rendered {
                    Ok(Ok(result)) => {
                        progress.record_rendered(result.guide.issue_count(), result.source_bytes);
                        Some(result)
                    }
                    Ok(Err(e)) => {
                        progress.record_failed();
                        warn!("Failed to render {}: {}", file.file_name, e);
                        None
                    }
                    Err(e) => {
                        progress.record_failed();
                        error!("Rendering task panicked for {}: {}", file.file_name, e);
                        None
                    }
                }
            }
        });

        stream::iter(tasks)
            .buffer_unordered(self.max_concurrent_tasks)
            .filter_map(|result| async move { result })
            .collect()
            .await
    }

    fn export_results(
        &self,
        results: &[ProcessingResult],
        output_dir: &Path,
        failed: usize,
        write_json: bool,
    ) -> Result<()> {
        let exporter = JsonExporter::new(output_dir, true)?;
        let mut files = Vec::new();

        for result in results {
            if let Some(name) = result.output.file_name() {
                files.push(name.to_string_lossy().to_string());
            }
            if write_json {
                let stem = Validator::output_stem(&result.source);
                let path = exporter.export_guide(&result.guide, &stem)?;
                if let Some(name) = path.file_name() {
                    files.push(name.to_string_lossy().to_string());
                }
            }
        }

        files.sort();
        exporter.export_manifest(&ExportManifest::new(files, results.len(), failed))?;
        Ok(())
    }

    fn log_final_stats(&self, stats: &PipelineStats) {
        info!("=== Batch Summary ===");
        info!("Duration: {:.2} seconds", stats.duration_secs);
        info!("Documents rendered: {}", stats.documents_rendered);
        info!("Documents failed: {}", stats.documents_failed);
        info!("Success rate: {:.2}%", stats.success_rate());
        info!("Issues extracted: {}", stats.issues_extracted);
        info!(
            "Input processed: {:.2} MB",
            stats.total_bytes_processed as f64 / 1_048_576.0
        );
        info!("=====================");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::document::tests::{build_docx, wrap_body};
    use std::fs;
    use tempfile::TempDir;

    fn write_docx(dir: &Path, name: &str, lines: &[&str]) {
        let body: String = lines
            .iter()
            .map(|t| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", t))
            .collect();
        fs::write(dir.join(name), build_docx(&wrap_body(&body), None)).unwrap();
    }

    fn config(workers: usize) -> Config {
        let mut config = Config::default_config();
        config.pipeline.parallel_workers = workers;
        config
    }

    #[test]
    fn test_worker_count_is_at_least_one() {
        let orchestrator = BatchOrchestrator::new(config(0)).unwrap();
        assert_eq!(orchestrator.max_concurrent_tasks, 1);
    }

    #[tokio::test]
    async fn test_batch_renders_and_survives_failures() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_docx(
            input.path(),
            "q5.docx",
            &["Vehicle Platform Guide: Audi Q5", "Common Issues", "Brakes", "Worn pads", "Symptoms: squeal"],
        );
        write_docx(input.path(), "x3.docx", &["Vehicle Platform Guide: BMW X3"]);
        fs::write(input.path().join("broken.docx"), "not a zip").unwrap();

        let orchestrator = BatchOrchestrator::new(config(2)).unwrap();
        let options = BatchOptions {
            write_json: true,
            ..BatchOptions::default()
        };
        let stats = orchestrator.run(input.path(), output.path(), &options).await.unwrap();

        assert_eq!(stats.documents_rendered, 2);
        assert_eq!(stats.documents_failed, 1);
        assert_eq!(stats.issues_extracted, 1);
        assert!(output.path().join("q5.html").exists());
        assert!(output.path().join("x3.json").exists());

        let manifest: ExportManifest = serde_json::from_str(
            &fs::read_to_string(output.path().join("manifest.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(manifest.files, vec!["q5.html", "q5.json", "x3.html", "x3.json"]);
        assert_eq!(manifest.rendered_documents, 2);
        assert_eq!(manifest.failed_documents, 1);
    }

    #[tokio::test]
    async fn test_empty_directory() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();

        let orchestrator = BatchOrchestrator::new(config(1)).unwrap();
        let stats = orchestrator
            .run(input.path(), output.path(), &BatchOptions::default())
            .await
            .unwrap();

        assert_eq!(stats, PipelineStats::new());
    }

    #[tokio::test]
    async fn test_missing_input_directory() {
        let output = TempDir::new().unwrap();
        let orchestrator = BatchOrchestrator::new(config(1)).unwrap();

        let result = orchestrator
            .run(&output.path().join("missing"), output.path(), &BatchOptions::default())
            .await;
        assert!(result.is_err());
    }
}
