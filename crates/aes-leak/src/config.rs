//! Orchestrator configuration.

/// Default number of rows below which batches stay on the calling thread.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

/// Knobs that affect how, never what, the orchestrator computes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptureConfig {
    /// Process rows on the rayon pool (requires the `parallel` feature).
    pub parallel: bool,
    /// Minimum batch size before rows are spread across threads.
    pub parallel_threshold: usize,
}

impl CaptureConfig {
    /// Single-threaded configuration.
    pub fn serial() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    pub(crate) fn use_parallel(&self, rows: usize) -> bool {
        cfg!(feature = "parallel") && self.parallel && rows >= self.parallel_threshold
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            parallel: cfg!(feature = "parallel"),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}
