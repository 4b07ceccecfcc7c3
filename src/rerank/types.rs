//! Data model shared by the ranking strategies.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

// =============================================================================
// Units
// =============================================================================

/// One text unit being ranked.
///
/// Identity and content are fixed at construction. `score` is only ever set
/// by the all-pairs strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    id: String,
    content: String,
    score: Option<f64>,
}

impl Unit {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            score: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Accumulated all-pairs points, `None` for the other strategies.
    pub fn score(&self) -> Option<f64> {
        self.score
    }

    pub(crate) fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}

// =============================================================================
// Judgements
// =============================================================================

/// What a single oracle answer said, read from its leading token only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The argument shown first ("Line A") is more relevant.
    LineA,
    /// The argument shown second ("Line B") is more relevant.
    LineB,
    /// Anything else.
    Unclear,
}

/// Reconciled outcome of comparing an ordered pair `(a, b)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// `a` is more relevant.
    First,
    /// `b` is more relevant.
    Second,
    /// No consistent preference.
    Tie,
}

impl Decision {
    /// Three-way ordering where `Less` means `a` ranks before `b`.
    pub fn ordering(self) -> Ordering {
        match self {
            Decision::First => Ordering::Less,
            Decision::Second => Ordering::Greater,
            Decision::Tie => Ordering::Equal,
        }
    }
}

// =============================================================================
// Methods
// =============================================================================

/// Which pairwise ranking prompting strategy to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Method {
    /// Compare every pair and aggregate points.
    Allpair,
    /// Merge sort driven by pairwise decisions.
    #[default]
    Sorting,
    /// Repeated right-to-left adjacent-swap passes.
    Sliding,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::Allpair, Method::Sorting, Method::Sliding];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Allpair => "allpair",
            Method::Sorting => "sorting",
            Method::Sliding => "sliding",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ranking method '{0}'; expected one of: allpair, sorting, sliding")]
pub struct UnknownMethod(pub String);

impl FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}
