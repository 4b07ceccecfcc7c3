//! Per-run ranking settings.

use super::allpair::DEFAULT_COMPARISON_CONCURRENCY;
use super::types::Method;

#[derive(Debug, Clone)]
pub struct RankOptions {
    /// Strategy to run.
    pub method: Method,
    /// Keep only the first `top_k` results when positive; keep all otherwise.
    /// For the sliding strategy it also sets the number of passes.
    pub top_k: i64,
    /// Comparisons kept in flight by the all-pairs strategy.
    pub comparison_concurrency: usize,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            method: Method::default(),
            top_k: 0,
            comparison_concurrency: DEFAULT_COMPARISON_CONCURRENCY,
        }
    }
}

impl RankOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    pub fn top_k(mut self, top_k: i64) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn comparison_concurrency(mut self, concurrency: usize) -> Self {
        self.comparison_concurrency = concurrency;
        self
    }
}
