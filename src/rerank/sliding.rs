//! PRP-Sliding: bounded bubble passes that float relevant units forward.

use tracing::{debug, info};

use super::comparison::{ComparisonError, PairwiseComparator};
use super::types::{Decision, Unit};

/// Number of passes the dispatcher runs for `n` units and a requested
/// `top_k`: `top_k` when positive, otherwise `n`.
///
/// Asking for fewer results therefore also buys fewer passes, and only the
/// first `passes` positions are guaranteed to settle.
pub fn sliding_passes(n: usize, top_k: i64) -> usize {
    if top_k > 0 {
        usize::try_from(top_k).unwrap_or(usize::MAX)
    } else {
        n
    }
}

/// Run `passes` right-to-left adjacent-swap passes over `units`, starting
/// from input order.
///
/// Each pass compares `(v[i], v[i + 1])` for `i` from `n - 2` down to `0` and
/// swaps on `Second`. Every comparison sees the result of the previous swap,
/// so the whole run is sequential. With `passes >= n - 1` and a transitive
/// oracle the result is the full order.
pub async fn sliding_window(
    comparator: &dyn PairwiseComparator,
    query: &str,
    mut units: Vec<Unit>,
    passes: usize,
) -> Result<Vec<Unit>, ComparisonError> {
    let n = units.len();
    if n < 2 {
        return Ok(units);
    }

    let mut swaps = 0usize;
    for pass in 0..passes {
        let mut pass_swaps = 0usize;
        for i in (0..n - 1).rev() {
            let decision = comparator.compare(query, &units[i], &units[i + 1]).await?;
            if decision == Decision::Second {
                units.swap(i, i + 1);
                pass_swaps += 1;
            }
        }
        debug!(pass = pass + 1, swaps = pass_swaps, "Sliding pass complete");
        swaps += pass_swaps;
    }

    info!(units = n, passes, swaps, "Sliding window complete");
    Ok(units)
}
