//! Suggestion request handler.
//!
//! Resolves request parameters against configured defaults, builds the seed
//! set, runs the ranking pipeline and assembles the response. Input errors
//! become structured responses; port failures propagate.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use suggest_ranking::{RelatednessCache, SeedSet, SuggestPipeline};
use suggest_types::{SuggestConfig, SuggestError, TopicId};

use crate::request::SuggestRequest;
use crate::response::SuggestResponse;

/// Message returned when none of the supplied seed ids is a known article.
pub const NO_VALID_SEEDS: &str = "no valid query topic ids specified";

/// Built-in example query.
#[derive(Debug, Clone, PartialEq)]
pub struct ExampleQuery {
    pub description: &'static str,
    pub query_topics: &'static [TopicId],
}

/// Description of the suggestion service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDescription {
    pub name: &'static str,
    pub summary: &'static str,
    pub examples: Vec<ExampleQuery>,
}

/// Handler for suggestion requests.
///
/// Cheap to clone; clones share the relatedness cache.
#[derive(Clone)]
pub struct SuggestHandler {
    pipeline: SuggestPipeline,
    cache: Arc<RelatednessCache>,
    defaults: SuggestConfig,
}

impl SuggestHandler {
    /// Create a handler over a pipeline, inserting a shared relatedness cache
    /// sized by `defaults.relatedness_cache_size`.
    pub fn new(pipeline: SuggestPipeline, defaults: SuggestConfig) -> Self {
        let cache = Arc::new(RelatednessCache::new(
            pipeline.relatedness(),
            defaults.relatedness_cache_size,
        ));
        Self {
            pipeline: pipeline.with_relatedness(cache.clone()),
            cache,
            defaults,
        }
    }

    /// Default pipeline parameters.
    pub fn defaults(&self) -> &SuggestConfig {
        &self.defaults
    }

    /// Number of memoized relatedness scores.
    pub fn cached_scores(&self) -> usize {
        self.cache.len()
    }

    /// Answer a suggestion request.
    #[instrument(skip_all, fields(seeds = request.query_topics.len()))]
    pub async fn suggest(&self, request: &SuggestRequest) -> Result<SuggestResponse, SuggestError> {
        if request.query_topics.is_empty() {
            debug!("Suggest request without query topics");
            return Ok(SuggestResponse::UnspecifiedParameters);
        }

        let config = request.resolve_config(&self.defaults)?;

        let seeds = SeedSet::resolve(&request.query_topics, self.pipeline.topics()).await?;
        if seeds.is_empty() {
            debug!(ids = ?request.query_topics, "No query topic resolved to an article");
            return Ok(SuggestResponse::error(NO_VALID_SEEDS));
        }

        let set = self.pipeline.run(&seeds, &config).await?;
        info!(
            seeds = seeds.len(),
            categories = set.groups.len(),
            suggestions = set.refined.len(),
            cached_scores = self.cache.len(),
            "Suggest request complete"
        );

        Ok(SuggestResponse::from(&set))
    }

    /// Describe the service and its example query.
    pub fn describe() -> ServiceDescription {
        ServiceDescription {
            name: "suggest",
            summary: "Suggests topics that are related to a set of seed topics, \
                      weighted by their relatedness to the query and organized \
                      by the categories they belong to",
            examples: vec![ExampleQuery {
                description: "hiking new zealand",
                query_topics: &[147313, 4913064],
            }],
        }
    }
}
