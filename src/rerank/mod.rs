//! Pairwise ranking prompting.
//!
//! Three strategies turn a binary relevance oracle into an ordering:
//! - Allpair: compare every pair, rank by points
//! - Sorting: merge sort driven by pairwise decisions
//! - Sliding: bounded right-to-left bubble passes
//!
//! All of them talk to the oracle only through `PairwiseComparator`, whose
//! standard implementation (`SwapComparator`) asks in both presentation
//! orders to cancel positional bias.

pub mod allpair;
pub mod comparison;
pub mod options;
pub mod oracle;
pub mod sliding;
pub mod sorting;
pub mod trace;
pub mod types;

#[cfg(test)]
mod testing;

use tracing::info;

pub use allpair::allpair;
pub use comparison::{
    parse_verdict, reconcile, ComparisonError, PairwiseComparator, SwapComparator,
};
pub use options::RankOptions;
pub use oracle::{LlmOracle, Oracle};
pub use sliding::{sliding_passes, sliding_window};
pub use sorting::comparator_sort;
pub use trace::{ComparisonTrace, JsonlTraceSink, TraceError, TraceSink};
pub use types::*;

#[derive(Debug, thiserror::Error)]
pub enum RankError {
    #[error("no input units to rank")]
    NoInput,
    #[error(transparent)]
    Comparison(#[from] ComparisonError),
}

/// Rank `units` for `query` with the configured strategy, then truncate.
///
/// Any comparison failure aborts the run; nothing partial is returned.
pub async fn rank(
    comparator: &dyn PairwiseComparator,
    query: &str,
    units: Vec<Unit>,
    options: &RankOptions,
) -> Result<Vec<Unit>, RankError> {
    if units.is_empty() {
        return Err(RankError::NoInput);
    }

    let n = units.len();
    info!(units = n, method = %options.method, top_k = options.top_k, "Ranking");

    let ranked = match options.method {
        Method::Allpair => {
            allpair(comparator, query, units, options.comparison_concurrency).await?
        }
        Method::Sorting => comparator_sort(comparator, query, units).await?,
        Method::Sliding => {
            let passes = sliding_passes(n, options.top_k);
            sliding_window(comparator, query, units, passes).await?
        }
    };

    Ok(select_top_k(ranked, options.top_k))
}

/// Keep the first `top_k` units when `top_k > 0`, all of them otherwise.
pub fn select_top_k(mut ranked: Vec<Unit>, top_k: i64) -> Vec<Unit> {
    if let Ok(k) = usize::try_from(top_k) {
        if k > 0 {
            ranked.truncate(k);
        }
    }
    ranked
}
