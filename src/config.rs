//! Suite run configuration.

use serde::{Deserialize, Serialize};

/// How a suite run fans out trials.
///
/// # Example
///
/// ```ignore
/// let config = RunConfig::default().with_worker_threads(4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Run each fuzz-active case's trials on a bounded worker pool. Cases
    /// themselves always run one after another.
    pub parallel: bool,
    /// Worker bound for the trial pool; `0` lets the pool pick its default.
    pub worker_threads: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            worker_threads: 0,
        }
    }
}

impl RunConfig {
    /// Strictly sequential trials, deterministic interleaving.
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            worker_threads: 0,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_worker_threads(mut self, worker_threads: usize) -> Self {
        self.worker_threads = worker_threads;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_parallel() {
        let config = RunConfig::default();
        assert!(config.parallel);
        assert_eq!(config.worker_threads, 0);
    }

    #[test]
    fn test_builder() {
        let config = RunConfig::sequential().with_worker_threads(8);
        assert!(!config.parallel);
        assert_eq!(config.worker_threads, 8);

        let config = RunConfig::default().with_parallel(false);
        assert!(!config.parallel);
    }
}
