//! PRP-Allpair: compare every unordered pair and rank by points.
//!
//! A win is worth 1.0, a tie 0.5 to each side, so the points handed out
//! always sum to n(n-1)/2.

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::info;

use super::comparison::{ComparisonError, PairwiseComparator};
use super::types::{Decision, Unit};

/// Default number of comparisons kept in flight.
pub const DEFAULT_COMPARISON_CONCURRENCY: usize = 8;

/// Score `units` by all-pairs comparison and return them best first.
///
/// Comparisons run `concurrency` at a time; completion order does not affect
/// the result. Equal scores keep their input order.
pub async fn allpair(
    comparator: &dyn PairwiseComparator,
    query: &str,
    units: Vec<Unit>,
    concurrency: usize,
) -> Result<Vec<Unit>, ComparisonError> {
    let n = units.len();
    let pairs = (0..n).flat_map(|i| (i + 1..n).map(move |j| (i, j)));

    let decisions: Vec<(usize, usize, Decision)> = stream::iter(pairs)
        .map(|(i, j)| {
            let (a, b) = (&units[i], &units[j]);
            async move {
                let decision = comparator.compare(query, a, b).await?;
                Ok::<_, ComparisonError>((i, j, decision))
            }
        })
        .buffer_unordered(concurrency.max(1))
        .try_collect()
        .await?;

    let scores = tally(n, &decisions);
    info!(
        units = n,
        comparisons = decisions.len(),
        "All-pairs scoring complete"
    );

    let mut scored: Vec<Unit> = units
        .into_iter()
        .zip(scores)
        .map(|(unit, score)| unit.with_score(score))
        .collect();
    // `sort_by` is stable, which keeps input order among equal scores.
    scored.sort_by(|a, b| {
        let (sa, sb) = (a.score().unwrap_or(0.0), b.score().unwrap_or(0.0));
        sb.total_cmp(&sa)
    });
    Ok(scored)
}

/// Accumulate per-unit points from pair decisions.
pub fn tally(n: usize, decisions: &[(usize, usize, Decision)]) -> Vec<f64> {
    let mut scores = vec![0.0; n];
    for &(i, j, decision) in decisions {
        match decision {
            Decision::First => scores[i] += 1.0,
            Decision::Second => scores[j] += 1.0,
            Decision::Tie => {
                scores[i] += 0.5;
                scores[j] += 0.5;
            }
        }
    }
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rerank::testing::{units, ContentOrder, ConstantComparator, FailAfter};

    fn contents(ranked: &[Unit]) -> Vec<&str> {
        ranked.iter().map(|u| u.content()).collect()
    }

    #[tokio::test]
    async fn ranks_by_points() {
        let comparator = ContentOrder::new(&["monkey", "dog", "cat"]);
        let ranked = allpair(&comparator, "q", units(&["cat", "dog", "monkey"]), 4)
            .await
            .unwrap();
        assert_eq!(contents(&ranked), vec!["monkey", "dog", "cat"]);
        let scores: Vec<f64> = ranked.iter().map(|u| u.score().unwrap()).collect();
        assert_eq!(scores, vec![2.0, 1.0, 0.0]);
    }

    #[tokio::test]
    async fn issues_one_comparison_per_unordered_pair() {
        let comparator = ContentOrder::new(&["a", "b", "c", "d", "e"]);
        allpair(&comparator, "q", units(&["e", "d", "c", "b", "a"]), 3)
            .await
            .unwrap();
        assert_eq!(comparator.calls(), 10);
    }

    #[tokio::test]
    async fn score_mass_is_conserved() {
        for decision in [Decision::First, Decision::Second, Decision::Tie] {
            let comparator = ConstantComparator(decision);
            let ranked = allpair(&comparator, "q", units(&["a", "b", "c", "d"]), 2)
                .await
                .unwrap();
            let total: f64 = ranked.iter().filter_map(|u| u.score()).sum();
            assert_eq!(total, 6.0);
        }
    }

    #[tokio::test]
    async fn all_ties_keep_input_order() {
        let comparator = ConstantComparator(Decision::Tie);
        let ranked = allpair(&comparator, "q", units(&["x", "y", "z", "w"]), 8)
            .await
            .unwrap();
        assert_eq!(contents(&ranked), vec!["x", "y", "z", "w"]);
        assert!(ranked.iter().all(|u| u.score() == Some(1.5)));
    }

    #[tokio::test]
    async fn first_always_wins_means_earlier_units_rank_higher() {
        let comparator = ConstantComparator(Decision::First);
        let ranked = allpair(&comparator, "q", units(&["x", "y", "z"]), 1)
            .await
            .unwrap();
        assert_eq!(contents(&ranked), vec!["x", "y", "z"]);
    }

    #[tokio::test]
    async fn single_and_empty_inputs_make_no_calls() {
        let comparator = ContentOrder::new(&["a"]);
        let ranked = allpair(&comparator, "q", units(&["a"]), 4).await.unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].score(), Some(0.0));
        assert!(allpair(&comparator, "q", Vec::new(), 4).await.unwrap().is_empty());
        assert_eq!(comparator.calls(), 0);
    }

    #[tokio::test]
    async fn comparator_error_aborts_the_run() {
        let comparator = FailAfter::new(2);
        let result = allpair(&comparator, "q", units(&["a", "b", "c", "d"]), 1).await;
        assert!(result.is_err());
    }

    #[test]
    fn tally_counts_wins_and_halves() {
        let scores = tally(
            3,
            &[
                (0, 1, Decision::First),
                (0, 2, Decision::Tie),
                (1, 2, Decision::Second),
            ],
        );
        assert_eq!(scores, vec![1.5, 0.0, 1.5]);
    }
}
