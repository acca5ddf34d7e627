//! Candidate generation from link overlap.
//!
//! Every topic linked to or from a seed gets a rough weight: the number of
//! sentences the link occurs in, summed over both directions and all seeds.
//! Nothing is discarded here for having a low weight; the rough order only
//! decides which candidates the refiner spends relatedness lookups on.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, instrument};

use suggest_types::{LinkOccurrences, SuggestError, TopicId};

use crate::ports::LinkGraph;
use crate::seeds::SeedSet;

/// A topic reachable from the seeds, with its rough link weight.
///
/// Ordered by weight descending, then id ascending. The order is total so
/// candidates with equal weight are never merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Candidate {
    /// Candidate topic id
    pub id: TopicId,
    /// Summed link occurrences across all seeds
    pub weight: u64,
}

impl Candidate {
    /// Create a new candidate.
    pub fn new(id: TopicId, weight: u64) -> Self {
        Self { id, weight }
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Aggregates link-overlap weight per candidate across the seed set.
pub struct CandidateGenerator {
    graph: Arc<dyn LinkGraph>,
}

impl CandidateGenerator {
    /// Create a generator reading from the given link graph.
    pub fn new(graph: Arc<dyn LinkGraph>) -> Self {
        Self { graph }
    }

    /// Generate candidates for the seeds, in rank order.
    ///
    /// Link lookup failures propagate and fail the request.
    #[instrument(skip_all, fields(seeds = seeds.len()))]
    pub async fn generate(&self, seeds: &SeedSet) -> Result<Vec<Candidate>, SuggestError> {
        let mut weights: HashMap<TopicId, u64> = HashMap::new();

        for seed in seeds.iter() {
            let outbound = self.graph.links_out(seed.id).await?;
            let inbound = self.graph.links_in(seed.id).await?;
            accumulate(&mut weights, &outbound);
            accumulate(&mut weights, &inbound);
        }

        let mut candidates: Vec<Candidate> = weights
            .into_iter()
            .filter(|(id, _)| !seeds.contains(*id))
            .map(|(id, weight)| Candidate::new(id, weight))
            .collect();
        candidates.sort_unstable();

        debug!(candidates = candidates.len(), "Gathered rough candidates");
        Ok(candidates)
    }
}

fn accumulate(weights: &mut HashMap<TopicId, u64>, links: &[LinkOccurrences]) {
    for link in links {
        *weights.entry(link.target).or_insert(0) += u64::from(link.occurrences);
    }
}
