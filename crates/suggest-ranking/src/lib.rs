//! # suggest-ranking
//!
//! Ranking pipeline that turns seed topics into categorized suggestions.
//!
//! ## Stages
//! 1. [`CandidateGenerator`]: rough weights from link overlap with the seeds
//! 2. [`SuggestionRefiner`]: relatedness filtering and re-ranking, bounded by
//!    a search-space cap
//! 3. [`CategoryAggregator`]: grouping by parent category, cross-category
//!    deduplication, and pruning
//!
//! The link graph, page repository, category index and relatedness oracle
//! are reached through the async traits in [`ports`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use suggest_ranking::{SeedSet, SuggestPipeline};
//!
//! let pipeline = SuggestPipeline::from_store(store);
//! let seeds = SeedSet::resolve(&[147313, 4913064], pipeline.topics()).await?;
//! let result = pipeline.run(&seeds, &SuggestConfig::default()).await?;
//! ```

pub mod cache;
pub mod candidates;
pub mod categories;
pub mod pipeline;
pub mod ports;
pub mod refine;
pub mod seeds;

pub use cache::RelatednessCache;
pub use candidates::{Candidate, CandidateGenerator};
pub use categories::{
    rank_groups, AggregateConfig, Aggregation, CategoryAggregator, SuggestionGroup,
    CREDITED_MEMBER_LIMIT,
};
pub use pipeline::{SuggestPipeline, SuggestionSet};
pub use ports::{CategoryIndex, LinkGraph, MockPorts, Relatedness, TopicDirectory};
pub use refine::{RefineConfig, Suggestion, SuggestionRefiner};
pub use seeds::SeedSet;
