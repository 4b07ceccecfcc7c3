//! Stub comparators shared by the strategy tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::gateway::ProviderError;

use super::comparison::{ComparisonError, PairwiseComparator};
use super::types::{Decision, Unit};

pub fn units(contents: &[&str]) -> Vec<Unit> {
    contents
        .iter()
        .enumerate()
        .map(|(i, c)| Unit::new(i.to_string(), *c))
        .collect()
}

/// Strict total order: earlier in `best_first` is more relevant.
pub struct ContentOrder {
    best_first: Vec<String>,
    calls: AtomicUsize,
}

impl ContentOrder {
    pub fn new(best_first: &[&str]) -> Self {
        Self {
            best_first: best_first.iter().map(|s| s.to_string()).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn position(&self, unit: &Unit) -> Option<usize> {
        self.best_first.iter().position(|c| c == unit.content())
    }
}

#[async_trait::async_trait]
impl PairwiseComparator for ContentOrder {
    async fn compare(&self, _query: &str, a: &Unit, b: &Unit) -> Result<Decision, ComparisonError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(match (self.position(a), self.position(b)) {
            (Some(pa), Some(pb)) if pa < pb => Decision::First,
            (Some(pa), Some(pb)) if pa > pb => Decision::Second,
            _ => Decision::Tie,
        })
    }
}

pub struct ConstantComparator(pub Decision);

#[async_trait::async_trait]
impl PairwiseComparator for ConstantComparator {
    async fn compare(&self, _query: &str, _a: &Unit, _b: &Unit) -> Result<Decision, ComparisonError> {
        Ok(self.0)
    }
}

/// Ties until `limit` calls have been made, then fails every call.
pub struct FailAfter {
    limit: usize,
    calls: AtomicUsize,
}

impl FailAfter {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl PairwiseComparator for FailAfter {
    async fn compare(&self, _query: &str, _a: &Unit, _b: &Unit) -> Result<Decision, ComparisonError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) >= self.limit {
            return Err(ProviderError::provider("stub", "connection reset", false).into());
        }
        Ok(Decision::Tie)
    }
}
