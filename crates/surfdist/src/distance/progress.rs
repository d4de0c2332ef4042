//! Progress reporting for long scans.
//!
//! Sinks are driven only from the orchestrator's collecting thread, so they
//! take `&mut self` and need no synchronization.

/// Receives progress as vertices complete.
pub trait ProgressSink {
    /// Called once before any work, with the number of query vertices.
    fn start(&mut self, _total: usize) {}
    /// `done` vertices have been ingested so far (monotone).
    fn advance(&mut self, done: usize, total: usize);
    /// Called once after the last ingest (also after cancellation).
    fn finish(&mut self, _done: usize, _total: usize) {}
}

/// Discards progress.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    #[inline]
    fn advance(&mut self, _done: usize, _total: usize) {}
}

/// Emits `tracing` events at every `step_percent` of completion.
#[derive(Clone, Debug)]
pub struct LogProgress {
    label: String,
    step_percent: usize,
    next_percent: usize,
}

impl LogProgress {
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_step(label, 10)
    }

    pub fn with_step(label: impl Into<String>, step_percent: usize) -> Self {
        let step_percent = step_percent.clamp(1, 100);
        Self {
            label: label.into(),
            step_percent,
            next_percent: step_percent,
        }
    }
}

impl ProgressSink for LogProgress {
    fn start(&mut self, total: usize) {
        self.next_percent = self.step_percent;
        tracing::debug!(label = %self.label, total, "surface distance scan started");
    }

    fn advance(&mut self, done: usize, total: usize) {
        if total == 0 {
            return;
        }
        let percent = done * 100 / total;
        if percent >= self.next_percent {
            tracing::info!(label = %self.label, done, total, percent, "surface distances");
            while self.next_percent <= percent {
                self.next_percent += self.step_percent;
            }
        }
    }

    fn finish(&mut self, done: usize, total: usize) {
        if done < total {
            tracing::warn!(label = %self.label, done, total, "surface distance scan stopped early");
        } else {
            tracing::debug!(label = %self.label, total, "surface distance scan finished");
        }
    }
}
