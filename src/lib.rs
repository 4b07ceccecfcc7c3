#![forbid(unsafe_code)]

//! # prp-rank
//!
//! Rerank lines of text by relevance to a query when all you have is an LLM
//! that can say which of two lines fits better.
//!
//! Every comparison is asked twice with the two lines swapped, and only a
//! winner that survives the swap counts; anything else is a tie. Three
//! pairwise ranking prompting strategies build on that comparison:
//! all-pairs scoring, a comparator-driven merge sort, and bounded sliding
//! bubble passes.

pub mod gateway;
pub mod input;
pub mod prompts;
pub mod rerank;

pub use gateway::{ChatGateway, GatewayConfig, ProviderError, ProviderGateway};
pub use input::{load_sources, units_from_lines, InputError};
pub use prompts::PromptTemplate;
pub use rerank::{
    rank, select_top_k, ComparisonError, Decision, JsonlTraceSink, LlmOracle, Method, Oracle,
    PairwiseComparator, RankError, RankOptions, SwapComparator, TraceSink, Unit,
};
