use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};

use crate::{Result, TieBreak};

/// Worker pool sizing of the parallel phases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelismConfig {
    /// Number of worker threads, 0 lets rayon pick one per core.
    pub worker_count: usize,
}

impl ParallelismConfig {
    pub fn new(worker_count: usize) -> Self {
        Self { worker_count }
    }

    pub fn thread_pool(&self) -> Result<ThreadPool> {
        Ok(ThreadPoolBuilder::new()
            .num_threads(self.worker_count)
            .thread_name(|i| format!("scoring-{}", i))
            .build()?)
    }
}

/// Configuration of a [crate::ScoringPipeline].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub parallelism: ParallelismConfig,
    /// Order among entries of exactly equal IOU.
    pub tie_break: TieBreak,
    /// Number of matches kept by the ranking.
    pub top_k: usize,
    /// Blind every returned ciphertext with a fresh encryption of zero.
    pub rerandomize: bool,
    /// Return intersections packed into slots instead of one ciphertext per entry.
    pub response_packing: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            parallelism: ParallelismConfig::default(),
            tie_break: TieBreak::FirstSeen,
            top_k: 1,
            rerandomize: true,
            response_packing: false,
        }
    }
}
