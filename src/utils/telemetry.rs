// file: src/utils/telemetry.rs
// description: operation timing and throughput figures for document processing

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Logs how long an operation took once it finishes.
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: impl Into<String>) -> Self {
        let operation = operation.into();
        debug!("Starting {}", operation);
        Self {
            operation,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn checkpoint(&self, stage: &str) {
        debug!(
            "[{}] {} after {:.3}s",
            self.operation,
            stage,
            self.elapsed().as_secs_f64()
        );
    }

    pub fn warn_if_slow(&self, threshold: Duration) {
        let elapsed = self.elapsed();
        if elapsed > threshold {
            warn!(
                "Slow operation [{}]: {:.2}s (threshold {:.2}s)",
                self.operation,
                elapsed.as_secs_f64(),
                threshold.as_secs_f64()
            );
        }
    }

    pub fn finish(self) -> Duration {
        let elapsed = self.elapsed();
        debug!("Finished {} in {:.3}s", self.operation, elapsed.as_secs_f64());
        elapsed
    }

    /// Finishes and logs throughput for `count` items.
    pub fn finish_with_count(self, count: usize) -> PerformanceMetrics {
        let metrics = PerformanceMetrics::new(&self.operation, count, self.elapsed());
        info!("{}", metrics.format());
        metrics
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub operation: String,
    pub count: usize,
    pub duration_ms: u64,
    pub throughput: f64, // items per second
    pub avg_item_time_ms: f64,
}

impl PerformanceMetrics {
    pub fn new(operation: &str, count: usize, duration: Duration) -> Self {
        let duration_ms = duration.as_millis() as u64;
        let duration_secs = duration.as_secs_f64();

        Self {
            operation: operation.to_string(),
            count,
            duration_ms,
            throughput: if duration_secs > 0.0 {
                count as f64 / duration_secs
            } else {
                0.0
            },
            avg_item_time_ms: if count > 0 {
                duration_ms as f64 / count as f64
            } else {
                0.0
            },
        }
    }

    pub fn format(&self) -> String {
        format!(
            "{}: {} documents in {}ms ({:.2}/sec, {:.1}ms each)",
            self.operation, self.count, self.duration_ms, self.throughput, self.avg_item_time_ms
        )
    }
}
