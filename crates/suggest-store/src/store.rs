//! Indexed, read-only view over a graph snapshot.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use suggest_ranking::{CategoryIndex, LinkGraph, Relatedness, TopicDirectory};
use suggest_types::{Category, LinkOccurrences, SuggestError, Topic, TopicId};

use crate::error::StoreError;
use crate::snapshot::GraphSnapshot;

/// Counts of indexed records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of topics
    pub topic_count: usize,
    /// Number of links
    pub link_count: usize,
    /// Number of categories
    pub category_count: usize,
    /// Number of relatedness pairs
    pub relatedness_count: usize,
}

/// In-memory store answering every ranking port from a snapshot.
///
/// Built once and never mutated, so it can be shared freely between
/// concurrent requests.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    topics: HashMap<TopicId, Topic>,
    links_out: HashMap<TopicId, Vec<LinkOccurrences>>,
    links_in: HashMap<TopicId, Vec<LinkOccurrences>>,
    parents: HashMap<TopicId, Vec<Category>>,
    relatedness: HashMap<(TopicId, TopicId), f64>,
    stats: StoreStats,
}

impl SnapshotStore {
    /// Index a snapshot.
    pub fn new(snapshot: GraphSnapshot) -> Self {
        let mut store = SnapshotStore {
            stats: StoreStats {
                topic_count: snapshot.topics.len(),
                link_count: snapshot.links.len(),
                category_count: snapshot.categories.len(),
                relatedness_count: snapshot.relatedness.len(),
            },
            ..Default::default()
        };

        for topic in snapshot.topics {
            store.topics.insert(topic.id, topic);
        }

        for link in &snapshot.links {
            let occurrences = link.occurrences();
            store
                .links_out
                .entry(link.source)
                .or_default()
                .push(LinkOccurrences::new(link.target, occurrences));
            store
                .links_in
                .entry(link.target)
                .or_default()
                .push(LinkOccurrences::new(link.source, occurrences));
        }

        for category in snapshot.categories {
            let parent = Category::new(category.id, category.title);
            for member in category.members {
                store
                    .parents
                    .entry(member)
                    .or_default()
                    .push(parent.clone());
            }
        }

        for record in snapshot.relatedness {
            store.relatedness.insert(pair_key(record.a, record.b), record.score);
        }

        store
    }

    /// Load and index a snapshot file.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        info!("Loading graph snapshot from {:?}", path);
        let store = Self::new(GraphSnapshot::load(path)?);
        info!(
            topics = store.stats.topic_count,
            links = store.stats.link_count,
            categories = store.stats.category_count,
            "Graph snapshot loaded"
        );
        Ok(store)
    }

    /// Record counts.
    pub fn stats(&self) -> StoreStats {
        self.stats
    }

    /// Look up a topic synchronously.
    pub fn topic(&self, id: TopicId) -> Option<&Topic> {
        self.topics.get(&id)
    }

    /// Outbound links of a topic.
    pub fn outbound(&self, id: TopicId) -> &[LinkOccurrences] {
        self.links_out.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Inbound links of a topic.
    pub fn inbound(&self, id: TopicId) -> &[LinkOccurrences] {
        self.links_in.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Parent categories of a topic.
    pub fn categories_of(&self, id: TopicId) -> &[Category] {
        self.parents.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Relatedness of two topics: 1.0 for a topic with itself, 0.0 if unknown.
    pub fn relatedness_of(&self, a: TopicId, b: TopicId) -> f64 {
        if a == b {
            return 1.0;
        }
        self.relatedness
            .get(&pair_key(a, b))
            .copied()
            .unwrap_or(0.0)
    }
}

fn pair_key(a: TopicId, b: TopicId) -> (TopicId, TopicId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[async_trait]
impl LinkGraph for SnapshotStore {
    async fn links_out(&self, id: TopicId) -> Result<Vec<LinkOccurrences>, SuggestError> {
        Ok(self.outbound(id).to_vec())
    }

    async fn links_in(&self, id: TopicId) -> Result<Vec<LinkOccurrences>, SuggestError> {
        Ok(self.inbound(id).to_vec())
    }
}

#[async_trait]
impl TopicDirectory for SnapshotStore {
    async fn resolve(&self, id: TopicId) -> Result<Option<Topic>, SuggestError> {
        Ok(self.topic(id).cloned())
    }
}

#[async_trait]
impl CategoryIndex for SnapshotStore {
    async fn parent_categories(&self, id: TopicId) -> Result<Vec<Category>, SuggestError> {
        Ok(self.categories_of(id).to_vec())
    }
}

#[async_trait]
impl Relatedness for SnapshotStore {
    async fn score(&self, seed: TopicId, candidate: TopicId) -> Result<f64, SuggestError> {
        Ok(self.relatedness_of(seed, candidate))
    }
}
