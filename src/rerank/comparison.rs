//! Bias-mitigated pairwise comparison.
//!
//! Every comparison asks the oracle twice, once per presentation order, and
//! only commits to a winner when the same unit wins both times. An oracle that
//! simply prefers whatever it sees first therefore produces ties, not a
//! ranking.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::gateway::ProviderError;

use super::oracle::Oracle;
use super::trace::{now_epoch_ms, ComparisonTrace, TraceError, TraceSink};
use super::types::{Decision, Unit, Verdict};

/// Error type for comparison operations.
///
/// Malformed oracle answers are not errors; they reconcile to `Tie`.
#[derive(Debug, thiserror::Error)]
pub enum ComparisonError {
    #[error("oracle error: {0}")]
    Oracle(#[from] ProviderError),
    #[error("trace error: {0}")]
    Trace(#[from] TraceError),
}

/// The one comparison capability the ranking strategies depend on.
#[async_trait::async_trait]
pub trait PairwiseComparator: Send + Sync {
    /// Decide whether `a` (`First`) or `b` (`Second`) is more relevant to
    /// `query`, or neither (`Tie`).
    ///
    /// Nothing guarantees the answers are transitive across pairs.
    async fn compare(&self, query: &str, a: &Unit, b: &Unit) -> Result<Decision, ComparisonError>;
}

// =============================================================================
// Parsing and reconciliation
// =============================================================================

/// Read a raw oracle answer by its leading token.
pub fn parse_verdict(raw: &str) -> Verdict {
    let normalized = raw.trim_start().to_lowercase();
    if normalized.starts_with("line a") {
        Verdict::LineA
    } else if normalized.starts_with("line b") {
        Verdict::LineB
    } else {
        Verdict::Unclear
    }
}

/// Combine the verdict for `(a, b)` with the verdict for the swapped
/// presentation `(b, a)`.
pub fn reconcile(forward: Verdict, reverse: Verdict) -> Decision {
    match (forward, reverse) {
        (Verdict::LineA, Verdict::LineB) => Decision::First,
        (Verdict::LineB, Verdict::LineA) => Decision::Second,
        _ => Decision::Tie,
    }
}

// =============================================================================
// Swap comparator
// =============================================================================

/// `PairwiseComparator` that asks an `Oracle` in both orders.
pub struct SwapComparator<O: Oracle> {
    oracle: O,
    trace: Option<Arc<dyn TraceSink>>,
    comparisons: AtomicUsize,
    unclear: AtomicUsize,
}

impl<O: Oracle> SwapComparator<O> {
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            trace: None,
            comparisons: AtomicUsize::new(0),
            unclear: AtomicUsize::new(0),
        }
    }

    pub fn with_trace(mut self, sink: Arc<dyn TraceSink>) -> Self {
        self.trace = Some(sink);
        self
    }

    /// Completed comparisons (each one is two oracle calls).
    pub fn comparisons(&self) -> usize {
        self.comparisons.load(Ordering::Relaxed)
    }

    /// Oracle answers whose leading token was neither "Line A" nor "Line B".
    pub fn unclear_answers(&self) -> usize {
        self.unclear.load(Ordering::Relaxed)
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }
}

#[async_trait::async_trait]
impl<O: Oracle> PairwiseComparator for SwapComparator<O> {
    async fn compare(&self, query: &str, a: &Unit, b: &Unit) -> Result<Decision, ComparisonError> {
        let (forward_raw, reverse_raw) = futures::try_join!(
            self.oracle.judge(query, a.content(), b.content()),
            self.oracle.judge(query, b.content(), a.content())
        )?;

        let forward = parse_verdict(&forward_raw);
        let reverse = parse_verdict(&reverse_raw);
        for (verdict, raw) in [(forward, &forward_raw), (reverse, &reverse_raw)] {
            if verdict == Verdict::Unclear {
                self.unclear.fetch_add(1, Ordering::Relaxed);
                debug!(answer = %raw, "Oracle answer has no Line A/Line B prefix; counting as a tie");
            }
        }

        let decision = reconcile(forward, reverse);
        let index = self.comparisons.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(
            comparison = index,
            a = a.id(),
            b = b.id(),
            ?forward,
            ?reverse,
            ?decision,
            "Compared pair"
        );

        if let Some(sink) = &self.trace {
            sink.record(ComparisonTrace {
                timestamp_ms: now_epoch_ms(),
                comparison_index: index,
                unit_a_id: a.id().to_string(),
                unit_b_id: b.id().to_string(),
                forward_response: forward_raw,
                forward_verdict: forward,
                reverse_response: reverse_raw,
                reverse_verdict: reverse,
                decision,
            })?;
        }

        Ok(decision)
    }
}
