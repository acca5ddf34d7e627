//! End-to-end ranking pipeline.
//!
//! Runs the three stages strictly in order: candidate generation, refinement,
//! category aggregation. Each stage fully consumes the previous stage's
//! output; all ranking state is owned by the request.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument};

use suggest_types::{SuggestConfig, SuggestError};

use crate::candidates::CandidateGenerator;
use crate::categories::{AggregateConfig, CategoryAggregator, SuggestionGroup};
use crate::ports::{CategoryIndex, LinkGraph, Relatedness, TopicDirectory};
use crate::refine::{RefineConfig, Suggestion, SuggestionRefiner};
use crate::seeds::SeedSet;

/// Categorized and uncategorized suggestions for one request.
#[derive(Debug, Clone, Default)]
pub struct SuggestionSet {
    /// Surviving category groups, best first
    pub groups: Vec<SuggestionGroup>,
    /// Refined suggestions not listed by any group, in rank order
    pub uncategorized: Vec<Suggestion>,
    /// All refined suggestions, in rank order
    pub refined: Vec<Suggestion>,
    /// Number of rough candidates gathered
    pub candidate_count: usize,
}

impl SuggestionSet {
    /// Check if nothing was suggested.
    pub fn is_empty(&self) -> bool {
        self.refined.is_empty()
    }
}

/// The ports a pipeline reads from.
#[derive(Clone)]
pub struct SuggestPipeline {
    graph: Arc<dyn LinkGraph>,
    topics: Arc<dyn TopicDirectory>,
    categories: Arc<dyn CategoryIndex>,
    relatedness: Arc<dyn Relatedness>,
}

impl SuggestPipeline {
    /// Create a pipeline over the given ports.
    pub fn new(
        graph: Arc<dyn LinkGraph>,
        topics: Arc<dyn TopicDirectory>,
        categories: Arc<dyn CategoryIndex>,
        relatedness: Arc<dyn Relatedness>,
    ) -> Self {
        Self {
            graph,
            topics,
            categories,
            relatedness,
        }
    }

    /// Create a pipeline from a single value implementing every port.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: LinkGraph + TopicDirectory + CategoryIndex + Relatedness + 'static,
    {
        Self::new(store.clone(), store.clone(), store.clone(), store)
    }

    /// Replace the relatedness oracle, e.g. with a shared cache.
    pub fn with_relatedness(mut self, relatedness: Arc<dyn Relatedness>) -> Self {
        self.relatedness = relatedness;
        self
    }

    /// The relatedness oracle in use.
    pub fn relatedness(&self) -> Arc<dyn Relatedness> {
        self.relatedness.clone()
    }

    /// The page repository, for resolving seeds.
    pub fn topics(&self) -> &dyn TopicDirectory {
        self.topics.as_ref()
    }

    /// Run all three stages for a non-empty seed set.
    #[instrument(skip_all, fields(seeds = seeds.len()))]
    pub async fn run(
        &self,
        seeds: &SeedSet,
        config: &SuggestConfig,
    ) -> Result<SuggestionSet, SuggestError> {
        if seeds.is_empty() {
            return Err(SuggestError::InvalidInput(
                "no valid query topic ids specified".to_string(),
            ));
        }
        let start = Instant::now();

        let candidates = CandidateGenerator::new(self.graph.clone())
            .generate(seeds)
            .await?;

        let refined = SuggestionRefiner::new(
            self.topics.clone(),
            self.relatedness.clone(),
            RefineConfig::from(config),
        )
        .refine(&candidates, seeds)
        .await;

        let aggregation =
            CategoryAggregator::new(self.categories.clone(), AggregateConfig::from(config))
                .aggregate(&refined)
                .await?;
        let uncategorized = aggregation.uncategorized(&refined);

        info!(
            candidates = candidates.len(),
            refined = refined.len(),
            categories = aggregation.groups.len(),
            uncategorized = uncategorized.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Suggestions ranked"
        );

        Ok(SuggestionSet {
            groups: aggregation.groups,
            uncategorized,
            refined,
            candidate_count: candidates.len(),
        })
    }
}
