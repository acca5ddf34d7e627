//! The set of seed topics anchoring a suggestion query.

use std::collections::BTreeMap;

use tracing::debug;

use suggest_types::{SuggestError, Topic, TopicId};

use crate::ports::TopicDirectory;

/// Seed topics supplied by the caller.
///
/// Only articles are admitted and duplicates collapse by id. Seeds iterate
/// in ascending id order so relatedness lookups happen in a stable order.
#[derive(Debug, Clone, Default)]
pub struct SeedSet {
    topics: BTreeMap<TopicId, Topic>,
}

impl SeedSet {
    /// Build a seed set from already-resolved topics, dropping non-articles.
    pub fn new(topics: impl IntoIterator<Item = Topic>) -> Self {
        let topics = topics
            .into_iter()
            .filter(Topic::is_article)
            .map(|t| (t.id, t))
            .collect();
        Self { topics }
    }

    /// Resolve seed ids through the page repository.
    ///
    /// Ids that do not exist or are not articles are skipped. Lookup
    /// failures propagate.
    pub async fn resolve(
        ids: &[TopicId],
        directory: &dyn TopicDirectory,
    ) -> Result<Self, SuggestError> {
        let mut topics = BTreeMap::new();
        for &id in ids {
            if topics.contains_key(&id) {
                continue;
            }
            match directory.resolve(id).await? {
                Some(topic) if topic.is_article() => {
                    topics.insert(id, topic);
                }
                Some(topic) => {
                    debug!(id, kind = %topic.kind, "Ignoring non-article seed");
                }
                None => {
                    debug!(id, "Ignoring unknown seed");
                }
            }
        }
        Ok(Self { topics })
    }

    /// Check whether an id is a seed.
    pub fn contains(&self, id: TopicId) -> bool {
        self.topics.contains_key(&id)
    }

    /// Number of seeds.
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// Check if there are no seeds.
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Seeds in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Topic> {
        self.topics.values()
    }

    /// Seed ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = TopicId> + '_ {
        self.topics.keys().copied()
    }
}
