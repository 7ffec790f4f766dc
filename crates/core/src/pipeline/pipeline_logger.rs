use std::collections::BTreeMap;
use std::time::Instant;

/// Observer for frame-loop events, so use cases stay independent of how
/// progress is shown.
pub trait PipelineLogger: Send {
    /// `current` frames of `total` done; `total` is 0 when unknown.
    fn progress(&mut self, current: usize, total: usize);

    /// Time spent in a named stage for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    fn info(&mut self, message: &str);

    /// End-of-run report. Default: no-op.
    fn summary(&self) {}
}

/// Discards everything.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Logs progress every `throttle_frames` frames through `log::info!` and
/// keeps per-stage timings for a closing summary.
pub struct StdoutPipelineLogger {
    throttle_frames: usize,
    timings: BTreeMap<String, StageTiming>,
    start_time: Instant,
    frames_seen: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct StageTiming {
    calls: usize,
    total_ms: f64,
}

impl StageTiming {
    fn average_ms(&self) -> f64 {
        if self.calls == 0 {
            0.0
        } else {
            self.total_ms / self.calls as f64
        }
    }
}

impl StdoutPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: BTreeMap::new(),
            start_time: Instant::now(),
            frames_seen: 0,
        }
    }

    /// Formatted report, or `None` before any stage was timed.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!(
            "{} frames in {:.1}s",
            self.frames_seen,
            elapsed_ms / 1000.0
        )];

        for (stage, timing) in &self.timings {
            let pct = if elapsed_ms > 0.0 {
                timing.total_ms / elapsed_ms * 100.0
            } else {
                0.0
            };
            lines.push(format!(
                "  {stage:10}: avg {:6.1}ms  total {:7.0}ms  ({pct:4.1}%)",
                timing.average_ms(),
                timing.total_ms
            ));
        }

        if self.frames_seen > 0 && elapsed_ms > 0.0 {
            let fps = self.frames_seen as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  throughput: {fps:.1} fps"));
        }

        Some(lines.join("\n"))
    }

    /// (call count, total ms) for a stage.
    pub fn stage_totals(&self, stage: &str) -> Option<(usize, f64)> {
        self.timings.get(stage).map(|t| (t.calls, t.total_ms))
    }

    pub fn frames_seen(&self) -> usize {
        self.frames_seen
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(100)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.frames_seen = current;
        let at_end = total > 0 && current == total;
        if current % self.throttle_frames != 0 && !at_end {
            return;
        }
        if total > 0 {
            let pct = current as f64 / total as f64 * 100.0;
            log::info!("Processed {current}/{total} frames ({pct:.1}%)");
        } else {
            log::info!("Processed {current} frames");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        let entry = self.timings.entry(stage.to_string()).or_default();
        entry.calls += 1;
        entry.total_ms += duration_ms;
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n{text}");
        }
    }
}
