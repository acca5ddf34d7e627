//! Suggestion request parameters.

use serde::{Deserialize, Serialize};

use suggest_types::{SuggestConfig, SuggestError, TopicId};

/// A request for suggestions related to a set of seed topics.
///
/// Every numeric parameter is optional and falls back to the handler's
/// configured defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestRequest {
    /// Seed topic ids
    #[serde(default)]
    pub query_topics: Vec<TopicId>,
    /// Maximum number of suggested topics to return
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_suggestions: Option<usize>,
    /// Maximum number of categories to organize suggestions under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_categories: Option<usize>,
    /// Maximum number of rough suggestions to search
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_space: Option<usize>,
    /// Minimum relatedness a suggestion must have to each query topic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_individual_relatedness: Option<f64>,
    /// Minimum average relatedness a suggestion must have to all query topics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_average_relatedness: Option<f64>,
}

impl SuggestRequest {
    /// Create a request for the given seeds with default parameters.
    pub fn new(query_topics: impl IntoIterator<Item = TopicId>) -> Self {
        Self {
            query_topics: query_topics.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Set the suggestion limit.
    pub fn with_max_suggestions(mut self, limit: usize) -> Self {
        self.max_suggestions = Some(limit);
        self
    }

    /// Set the category limit.
    pub fn with_max_categories(mut self, limit: usize) -> Self {
        self.max_categories = Some(limit);
        self
    }

    /// Set the search space.
    pub fn with_search_space(mut self, search_space: usize) -> Self {
        self.search_space = Some(search_space);
        self
    }

    /// Set both relatedness thresholds.
    pub fn with_thresholds(mut self, min_individual: f64, min_average: f64) -> Self {
        self.min_individual_relatedness = Some(min_individual);
        self.min_average_relatedness = Some(min_average);
        self
    }

    /// Merge the request's overrides onto `defaults` and validate the result.
    pub fn resolve_config(&self, defaults: &SuggestConfig) -> Result<SuggestConfig, SuggestError> {
        let config = SuggestConfig {
            max_suggestions: self.max_suggestions.unwrap_or(defaults.max_suggestions),
            max_categories: self.max_categories.unwrap_or(defaults.max_categories),
            search_space: self.search_space.unwrap_or(defaults.search_space),
            min_individual_relatedness: self
                .min_individual_relatedness
                .unwrap_or(defaults.min_individual_relatedness),
            min_average_relatedness: self
                .min_average_relatedness
                .unwrap_or(defaults.min_average_relatedness),
            relatedness_cache_size: defaults.relatedness_cache_size,
        };
        config.validate()?;
        Ok(config)
    }
}
