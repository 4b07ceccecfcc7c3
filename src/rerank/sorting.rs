//! PRP-Sorting: a stable merge sort whose comparisons are pairwise decisions.
//!
//! `First` orders `a` before `b`, `Second` orders `b` before `a`, `Tie` keeps
//! them as they were. The decisions come from an oracle that need not be
//! transitive, so when its answers contain cycles the output is a best-effort
//! order that depends on which pairs this particular algorithm happened to
//! ask about. It is not a correct total order in that case, only a
//! deterministic one: identical answers always yield identical output.

use futures::future::{BoxFuture, FutureExt};
use tracing::info;

use super::comparison::{ComparisonError, PairwiseComparator};
use super::types::{Decision, Unit};

/// Sort `units` best first using `comparator` as a three-way comparison.
pub async fn comparator_sort(
    comparator: &dyn PairwiseComparator,
    query: &str,
    units: Vec<Unit>,
) -> Result<Vec<Unit>, ComparisonError> {
    let n = units.len();
    let sorted = merge_sort(comparator, query, units).await?;
    info!(units = n, "Comparator sort complete");
    Ok(sorted)
}

fn merge_sort<'a>(
    comparator: &'a dyn PairwiseComparator,
    query: &'a str,
    mut units: Vec<Unit>,
) -> BoxFuture<'a, Result<Vec<Unit>, ComparisonError>> {
    async move {
        if units.len() <= 1 {
            return Ok(units);
        }
        let right = units.split_off(units.len() / 2);
        // The halves share no elements, so they can be sorted concurrently.
        let (left, right) = futures::try_join!(
            merge_sort(comparator, query, units),
            merge_sort(comparator, query, right)
        )?;
        merge(comparator, query, left, right).await
    }
    .boxed()
}

/// Merge two sorted runs. Each comparison depends on the previous one, so
/// this part is strictly sequential. Only `Second` lets the right element
/// go first, which keeps the sort stable.
async fn merge(
    comparator: &dyn PairwiseComparator,
    query: &str,
    left: Vec<Unit>,
    right: Vec<Unit>,
) -> Result<Vec<Unit>, ComparisonError> {
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        let decision = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => comparator.compare(query, l, r).await?,
            _ => break,
        };
        let next = if decision == Decision::Second {
            right.next()
        } else {
            left.next()
        };
        merged.extend(next);
    }
    merged.extend(left);
    merged.extend(right);
    Ok(merged)
}
