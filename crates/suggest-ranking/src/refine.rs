//! Relatedness-based filtering and re-ranking of candidates.
//!
//! Candidates are examined in rough-weight order until the search space is
//! exhausted. Each examined article is scored against every seed; a single
//! score below the individual threshold rejects it without scoring the
//! remaining seeds, and the mean score must clear the average threshold.
//! Survivors are re-ranked by mean relatedness alone.

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use suggest_types::{SuggestConfig, SuggestError, Topic, TopicId};

use crate::candidates::Candidate;
use crate::ports::{Relatedness, TopicDirectory};
use crate::seeds::SeedSet;

/// A candidate that survived refinement.
///
/// `weight` is the mean relatedness to the seed set. Ordered by weight
/// descending, then id ascending.
#[derive(Debug, Clone)]
pub struct Suggestion {
    /// The suggested topic
    pub topic: Topic,
    /// Mean relatedness to the seeds
    pub weight: f64,
}

impl Suggestion {
    /// Create a new suggestion.
    pub fn new(topic: Topic, weight: f64) -> Self {
        Self { topic, weight }
    }

    /// Suggested topic id.
    pub fn id(&self) -> TopicId {
        self.topic.id
    }
}

impl Ord for Suggestion {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .total_cmp(&self.weight)
            .then_with(|| self.topic.id.cmp(&other.topic.id))
    }
}

impl PartialOrd for Suggestion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Suggestion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Suggestion {}

/// Refinement thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefineConfig {
    /// Maximum number of candidates examined
    pub search_space: usize,
    /// Minimum relatedness to every seed
    pub min_individual: f64,
    /// Minimum mean relatedness across seeds
    pub min_average: f64,
    /// Maximum number of suggestions kept
    pub max_suggestions: usize,
}

impl From<&SuggestConfig> for RefineConfig {
    fn from(config: &SuggestConfig) -> Self {
        Self {
            search_space: config.search_space,
            min_individual: config.min_individual_relatedness,
            min_average: config.min_average_relatedness,
            max_suggestions: config.max_suggestions,
        }
    }
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self::from(&SuggestConfig::default())
    }
}

/// Filters and re-scores candidates using the relatedness oracle.
pub struct SuggestionRefiner {
    topics: Arc<dyn TopicDirectory>,
    relatedness: Arc<dyn Relatedness>,
    config: RefineConfig,
}

impl SuggestionRefiner {
    /// Create a refiner.
    pub fn new(
        topics: Arc<dyn TopicDirectory>,
        relatedness: Arc<dyn Relatedness>,
        config: RefineConfig,
    ) -> Self {
        Self {
            topics,
            relatedness,
            config,
        }
    }

    /// Refine candidates into ranked suggestions.
    ///
    /// At most `search_space + 1` candidates are examined. Failures while
    /// scoring a candidate are logged and only drop that candidate.
    #[instrument(skip_all, fields(candidates = candidates.len(), seeds = seeds.len()))]
    pub async fn refine(&self, candidates: &[Candidate], seeds: &SeedSet) -> Vec<Suggestion> {
        if seeds.is_empty() {
            return Vec::new();
        }

        let mut accepted = Vec::new();
        let mut failures = 0usize;

        for (examined, candidate) in candidates.iter().enumerate() {
            if examined > self.config.search_space {
                debug!(examined, "Search space exhausted");
                break;
            }

            match self.evaluate(candidate, seeds).await {
                Ok(Some(suggestion)) => accepted.push(suggestion),
                Ok(None) => {}
                Err(e) => {
                    failures += 1;
                    warn!(candidate = candidate.id, error = %e, "Skipping candidate");
                }
            }
        }

        accepted.sort_unstable();
        accepted.truncate(self.config.max_suggestions);

        debug!(refined = accepted.len(), failures, "Refined suggestions");
        accepted
    }

    /// Score one candidate; `Ok(None)` means it was rejected.
    async fn evaluate(
        &self,
        candidate: &Candidate,
        seeds: &SeedSet,
    ) -> Result<Option<Suggestion>, SuggestError> {
        let topic = match self.topics.resolve(candidate.id).await? {
            Some(topic) if topic.is_article() => topic,
            _ => return Ok(None),
        };

        let mut total = 0.0;
        for seed in seeds.iter() {
            let score = self.relatedness.score(seed.id, topic.id).await?;
            if score < self.config.min_individual {
                return Ok(None);
            }
            total += score;
        }

        let mean = total / seeds.len() as f64;
        if mean < self.config.min_average {
            return Ok(None);
        }

        Ok(Some(Suggestion::new(topic, mean)))
    }
}
