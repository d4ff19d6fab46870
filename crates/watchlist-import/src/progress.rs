use tracing::{info, warn};

/// Periodic progress lines and a final summary for the import loop,
/// which runs slowly because of the politeness delays.
pub struct ProgressTracker {
    total: usize,
    added: usize,
    failed: usize,
    start_time: std::time::Instant,
    progress_interval: usize,
    last_progress_log: usize,
}

impl ProgressTracker {
    pub fn new(total: usize, progress_interval: usize) -> Self {
        if total > 10 {
            info!("Starting import: {} titles to process", total);
        }
        Self {
            total,
            added: 0,
            failed: 0,
            start_time: std::time::Instant::now(),
            progress_interval,
            last_progress_log: 0,
        }
    }

    pub fn record_added(&mut self) {
        self.added += 1;
    }

    pub fn record_failed(&mut self) {
        self.failed += 1;
    }

    /// Call after each title with a 1-based index.
    pub fn log_progress(&mut self, current: usize) {
        if current - self.last_progress_log >= self.progress_interval || current == self.total {
            let elapsed = self.start_time.elapsed();
            let rate = if elapsed.as_secs_f64() > 0.0 {
                current as f64 / elapsed.as_secs_f64()
            } else {
                0.0
            };
            info!(
                "Progress: {}/{} titles ({:.1}/sec) | Added: {} | Failed: {}",
                current, self.total, rate, self.added, self.failed
            );
            self.last_progress_log = current;
        }
    }

    pub fn log_summary(&self, operation_name: &str) {
        let elapsed = self.start_time.elapsed();
        if self.failed > 0 {
            warn!(
                "{} completed: {} titles in {:.1}s | Added: {} | Failed: {}",
                operation_name,
                self.total,
                elapsed.as_secs_f64(),
                self.added,
                self.failed
            );
        } else {
            info!(
                "{} completed: {} titles in {:.1}s | Added: {} | Failed: {}",
                operation_name,
                self.total,
                elapsed.as_secs_f64(),
                self.added,
                self.failed
            );
        }
    }
}
