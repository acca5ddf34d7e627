//! Category aggregation with cross-category deduplication.
//!
//! Refined suggestions are grouped under every parent category they belong
//! to. Groups are weighted by their best few members, pruned, and then
//! walked best-first so each suggestion's weight is credited to exactly one
//! group: the highest-ranked one that lists it. Lower-ranked groups keep the
//! suggestion as an ignored member. After reweighting, only groups with
//! enough credited weight and members survive.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, instrument};

use suggest_types::{Category, SuggestConfig, SuggestError, TopicId};

use crate::ports::CategoryIndex;
use crate::refine::Suggestion;

/// Number of leading credited members that count toward a group's weight.
pub const CREDITED_MEMBER_LIMIT: usize = 4;

/// Groups need more members than this to survive the initial prune.
pub const MIN_GROUP_MEMBERS: usize = 3;

/// Groups need more weight than this to survive the initial prune.
pub const MIN_GROUP_WEIGHT: f64 = 1.0;

/// Groups need more weight than this after deduplication.
pub const MIN_FINAL_WEIGHT: f64 = 1.5;

/// Groups need more credited members than this after deduplication.
pub const MIN_FINAL_CREDITED_MEMBERS: usize = 2;

/// Suggestions sharing a parent category.
///
/// The weight is recomputed from the members and ignored set on every
/// change and is never adjusted directly.
#[derive(Debug, Clone)]
pub struct SuggestionGroup {
    category: Category,
    members: Vec<Suggestion>,
    ignored: HashSet<TopicId>,
    weight: f64,
}

impl SuggestionGroup {
    /// Create an empty group for a category.
    pub fn new(category: Category) -> Self {
        Self {
            category,
            members: Vec::new(),
            ignored: HashSet::new(),
            weight: 0.0,
        }
    }

    /// Category id.
    pub fn id(&self) -> TopicId {
        self.category.id
    }

    /// Category title.
    pub fn title(&self) -> &str {
        &self.category.title
    }

    /// The category this group is built around.
    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Members in insertion order, including ignored ones.
    pub fn members(&self) -> &[Suggestion] {
        &self.members
    }

    /// Current weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Append a member.
    pub fn push(&mut self, suggestion: Suggestion) {
        self.members.push(suggestion);
        self.recalculate_weight();
    }

    /// Stop crediting a member's weight to this group.
    ///
    /// Returns false if the id is not a member.
    pub fn ignore(&mut self, id: TopicId) -> bool {
        if !self.members.iter().any(|m| m.id() == id) {
            return false;
        }
        if self.ignored.insert(id) {
            self.recalculate_weight();
        }
        true
    }

    /// Check whether a member is ignored.
    pub fn is_ignored(&self, id: TopicId) -> bool {
        self.ignored.contains(&id)
    }

    /// Number of ignored members.
    pub fn ignored_count(&self) -> usize {
        self.ignored.len()
    }

    /// Number of members whose weight is credited here.
    pub fn credited_count(&self) -> usize {
        self.members.len() - self.ignored.len()
    }

    fn recalculate_weight(&mut self) {
        self.weight = self
            .members
            .iter()
            .filter(|m| !self.ignored.contains(&m.id()))
            .take(CREDITED_MEMBER_LIMIT)
            .map(|m| m.weight)
            .sum();
    }
}

/// Weight descending, then category id ascending.
fn by_rank(a: &SuggestionGroup, b: &SuggestionGroup) -> Ordering {
    b.weight
        .total_cmp(&a.weight)
        .then_with(|| a.id().cmp(&b.id()))
}

/// Aggregation limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateConfig {
    /// Maximum number of groups returned
    pub max_categories: usize,
}

impl From<&SuggestConfig> for AggregateConfig {
    fn from(config: &SuggestConfig) -> Self {
        Self {
            max_categories: config.max_categories,
        }
    }
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self::from(&SuggestConfig::default())
    }
}

/// Surviving groups plus the ids of every suggestion they list.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// Groups in final rank order
    pub groups: Vec<SuggestionGroup>,
    /// Ids of all members of surviving groups, ignored or not
    pub categorized_ids: HashSet<TopicId>,
}

impl Aggregation {
    /// Suggestions not listed by any surviving group, in their original order.
    pub fn uncategorized(&self, suggestions: &[Suggestion]) -> Vec<Suggestion> {
        suggestions
            .iter()
            .filter(|s| !self.categorized_ids.contains(&s.id()))
            .cloned()
            .collect()
    }
}

/// Groups refined suggestions by parent category.
pub struct CategoryAggregator {
    categories: Arc<dyn CategoryIndex>,
    config: AggregateConfig,
}

impl CategoryAggregator {
    /// Create an aggregator.
    pub fn new(categories: Arc<dyn CategoryIndex>, config: AggregateConfig) -> Self {
        Self { categories, config }
    }

    /// Build, rank, deduplicate and prune category groups.
    ///
    /// Category lookup failures propagate and fail the request.
    #[instrument(skip_all, fields(suggestions = suggestions.len()))]
    pub async fn aggregate(&self, suggestions: &[Suggestion]) -> Result<Aggregation, SuggestError> {
        let groups = self.build_groups(suggestions).await?;
        debug!(groups = groups.len(), "Gathered categories");
        Ok(rank_groups(groups, self.config.max_categories))
    }

    async fn build_groups(
        &self,
        suggestions: &[Suggestion],
    ) -> Result<Vec<SuggestionGroup>, SuggestError> {
        let mut by_id: HashMap<TopicId, SuggestionGroup> = HashMap::new();

        for suggestion in suggestions {
            let mut seen = HashSet::new();
            for category in self.categories.parent_categories(suggestion.id()).await? {
                if !seen.insert(category.id) {
                    continue;
                }
                by_id
                    .entry(category.id)
                    .or_insert_with(|| SuggestionGroup::new(category))
                    .push(suggestion.clone());
            }
        }

        Ok(by_id.into_values().collect())
    }
}

/// Prune, deduplicate and order groups.
///
/// 1. Keep groups with more than [`MIN_GROUP_MEMBERS`] members and more than
///    [`MIN_GROUP_WEIGHT`] weight, ranked best-first.
/// 2. Walk them in rank order; a member already credited to an earlier
///    group is ignored here.
/// 3. Re-rank and keep up to `max_categories` groups with more than
///    [`MIN_FINAL_WEIGHT`] weight and [`MIN_FINAL_CREDITED_MEMBERS`]
///    credited members.
pub fn rank_groups(groups: Vec<SuggestionGroup>, max_categories: usize) -> Aggregation {
    let mut ranked: Vec<SuggestionGroup> = groups
        .into_iter()
        .filter(|g| g.members.len() > MIN_GROUP_MEMBERS && g.weight > MIN_GROUP_WEIGHT)
        .collect();
    ranked.sort_by(by_rank);

    let mut credited: HashSet<TopicId> = HashSet::new();
    for group in ranked.iter_mut() {
        let member_ids: Vec<TopicId> = group.members.iter().map(Suggestion::id).collect();
        for id in member_ids {
            if !credited.insert(id) {
                group.ignore(id);
            }
        }
    }
    ranked.sort_by(by_rank);

    let groups: Vec<SuggestionGroup> = ranked
        .into_iter()
        .filter(|g| g.weight > MIN_FINAL_WEIGHT && g.credited_count() > MIN_FINAL_CREDITED_MEMBERS)
        .take(max_categories)
        .collect();

    let categorized_ids = groups
        .iter()
        .flat_map(|g| g.members.iter().map(Suggestion::id))
        .collect();

    Aggregation {
        groups,
        categorized_ids,
    }
}
