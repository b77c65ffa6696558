// file: src/pipeline/progress.rs
// description: batch progress bars and rendering statistics
// reference: uses indicatif for progress bars and tracks processing metrics

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineStats {
    pub documents_rendered: usize,
    pub documents_failed: usize,
    pub issues_extracted: usize,
    pub total_bytes_processed: u64,
    pub duration_secs: f64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents_per_second(&self) -> f64 {
        if self.duration_secs <= 0.0 {
            return 0.0;
        }
        self.documents_rendered as f64 / self.duration_secs
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.documents_rendered + self.documents_failed;
        if total == 0 {
            return 0.0;
        }
        (self.documents_rendered as f64 / total as f64) * 100.0
    }
}

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    documents_rendered: AtomicUsize,
    documents_failed: AtomicUsize,
    issues_extracted: AtomicUsize,
    bytes_processed: AtomicU64,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn new(total_documents: usize, colored: bool) -> Self {
        let multi_progress = MultiProgress::new();
        Self::with_bars(&multi_progress, total_documents, colored)
    }

    /// Tracker that draws nothing, for tests and non-interactive runs.
    pub fn hidden(total_documents: usize) -> Self {
        let multi_progress = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
        Self::with_bars(&multi_progress, total_documents, false)
    }

    fn with_bars(multi_progress: &MultiProgress, total_documents: usize, colored: bool) -> Self {
        Self {
            main_bar: create_progress_bar(multi_progress, total_documents as u64, colored),
            detail_bar: create_detail_bar(multi_progress),
            documents_rendered: AtomicUsize::new(0),
            documents_failed: AtomicUsize::new(0),
            issues_extracted: AtomicUsize::new(0),
            bytes_processed: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_rendered(&self, issues: usize, bytes: u64) {
        self.documents_rendered.fetch_add(1, Ordering::SeqCst);
        self.issues_extracted.fetch_add(issues, Ordering::SeqCst);
        self.bytes_processed.fetch_add(bytes, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn record_failed(&self) {
        self.documents_failed.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn set_message(&self, message: String) {
        self.main_bar.set_message(message);
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Rendering complete");
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> PipelineStats {
        PipelineStats {
            documents_rendered: self.documents_rendered.load(Ordering::SeqCst),
            documents_failed: self.documents_failed.load(Ordering::SeqCst),
            issues_extracted: self.issues_extracted.load(Ordering::SeqCst),
            total_bytes_processed: self.bytes_processed.load(Ordering::SeqCst),
            duration_secs: self.start_time.elapsed().as_secs_f64(),
        }
    }

    fn update_detail_bar(&self) {
        let message = format!(
            "Rendered: {} | Failed: {} | Issues: {}",
            self.documents_rendered.load(Ordering::SeqCst),
            self.documents_failed.load(Ordering::SeqCst),
            self.issues_extracted.load(Ordering::SeqCst)
        );
        self.detail_bar.set_message(message);
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64, colored: bool) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    let (template, chars) = if colored {
        (
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
            "█▓▒░",
        )
    } else {
        ("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({eta}) {msg}", "=>-")
    };

    bar.set_style(
        ProgressStyle::default_bar()
            .template(template)
            .expect("Failed to create progress bar template")
            .progress_chars(chars),
    );
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg}")
            .expect("Failed to create detail bar template"),
    );
    bar
}
