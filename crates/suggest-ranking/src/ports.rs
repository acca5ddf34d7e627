//! Ports to the collaborators the pipeline reads from.
//!
//! The link graph, page repository, category index and relatedness oracle
//! all live outside this crate. Each is an async trait so that
//! implementations backed by a database or a remote service can be plugged
//! in without changing the pipeline.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use suggest_types::{Category, LinkOccurrences, SuggestError, Topic, TopicId, TopicKind};

/// Per-topic link lookups with occurrence counts.
///
/// Unknown ids yield an empty list, never an error.
#[async_trait]
pub trait LinkGraph: Send + Sync {
    /// Links from the given topic to other topics.
    async fn links_out(&self, id: TopicId) -> Result<Vec<LinkOccurrences>, SuggestError>;

    /// Links from other topics to the given topic.
    async fn links_in(&self, id: TopicId) -> Result<Vec<LinkOccurrences>, SuggestError>;
}

/// Page repository used to resolve ids into topics.
#[async_trait]
pub trait TopicDirectory: Send + Sync {
    /// Resolve a topic id, returning `None` if no such page exists.
    async fn resolve(&self, id: TopicId) -> Result<Option<Topic>, SuggestError>;
}

/// Parent-category membership lookup.
#[async_trait]
pub trait CategoryIndex: Send + Sync {
    /// Categories the given topic belongs to.
    async fn parent_categories(&self, id: TopicId) -> Result<Vec<Category>, SuggestError>;
}

/// Pairwise semantic relatedness oracle.
#[async_trait]
pub trait Relatedness: Send + Sync {
    /// Relatedness of `candidate` to `seed`, in [0, 1].
    async fn score(&self, seed: TopicId, candidate: TopicId) -> Result<f64, SuggestError>;
}

/// Mock ports for testing.
///
/// Implements every port over in-memory maps, records relatedness calls,
/// and can be told to fail specific lookups.
#[derive(Default)]
pub struct MockPorts {
    /// Topics by id
    pub topics: HashMap<TopicId, Topic>,
    /// Outbound links by source id
    pub links_out: HashMap<TopicId, Vec<LinkOccurrences>>,
    /// Inbound links by target id
    pub links_in: HashMap<TopicId, Vec<LinkOccurrences>>,
    /// Parent categories by topic id
    pub parents: HashMap<TopicId, Vec<Category>>,
    /// Relatedness scores by (seed, candidate); missing pairs score 0.0
    pub scores: HashMap<(TopicId, TopicId), f64>,
    /// Pairs whose relatedness lookup fails
    pub failing_pairs: HashSet<(TopicId, TopicId)>,
    /// Topic ids whose directory lookup fails
    pub failing_topics: HashSet<TopicId>,
    /// Whether link lookups fail
    pub fail_graph: bool,
    /// Whether category lookups fail
    pub fail_categories: bool,
    calls: AtomicUsize,
    scored: Mutex<Vec<(TopicId, TopicId)>>,
}

impl MockPorts {
    /// Add a topic.
    pub fn with_topic(mut self, topic: Topic) -> Self {
        self.topics.insert(topic.id, topic);
        self
    }

    /// Add an article topic.
    pub fn with_article(self, id: TopicId, title: &str) -> Self {
        self.with_topic(Topic::new(id, TopicKind::Article, title))
    }

    /// Add a link occurring in `occurrences` sentences of `source`.
    pub fn with_link(mut self, source: TopicId, target: TopicId, occurrences: u32) -> Self {
        self.links_out
            .entry(source)
            .or_default()
            .push(LinkOccurrences::new(target, occurrences));
        self.links_in
            .entry(target)
            .or_default()
            .push(LinkOccurrences::new(source, occurrences));
        self
    }

    /// Put a topic in a category.
    pub fn with_parent(mut self, id: TopicId, category: TopicId, title: &str) -> Self {
        self.parents
            .entry(id)
            .or_default()
            .push(Category::new(category, title));
        self
    }

    /// Set the relatedness of `candidate` to `seed`.
    pub fn with_score(mut self, seed: TopicId, candidate: TopicId, score: f64) -> Self {
        self.scores.insert((seed, candidate), score);
        self
    }

    /// Make the relatedness lookup for a pair fail.
    pub fn with_failing_pair(mut self, seed: TopicId, candidate: TopicId) -> Self {
        self.failing_pairs.insert((seed, candidate));
        self
    }

    /// Make the directory lookup for a topic fail.
    pub fn with_failing_topic(mut self, id: TopicId) -> Self {
        self.failing_topics.insert(id);
        self
    }

    /// Make every link lookup fail.
    pub fn with_graph_failure(mut self) -> Self {
        self.fail_graph = true;
        self
    }

    /// Make every category lookup fail.
    pub fn with_category_failure(mut self) -> Self {
        self.fail_categories = true;
        self
    }

    /// Number of relatedness lookups performed so far.
    pub fn score_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Pairs scored so far, in call order.
    pub fn scored_pairs(&self) -> Vec<(TopicId, TopicId)> {
        self.scored.lock().expect("scored mutex poisoned").clone()
    }

    /// Distinct candidates that reached relatedness scoring.
    pub fn scored_candidates(&self) -> HashSet<TopicId> {
        self.scored_pairs().into_iter().map(|(_, c)| c).collect()
    }
}

#[async_trait]
impl LinkGraph for MockPorts {
    async fn links_out(&self, id: TopicId) -> Result<Vec<LinkOccurrences>, SuggestError> {
        if self.fail_graph {
            return Err(SuggestError::Graph(format!("links_out({}) unavailable", id)));
        }
        Ok(self.links_out.get(&id).cloned().unwrap_or_default())
    }

    async fn links_in(&self, id: TopicId) -> Result<Vec<LinkOccurrences>, SuggestError> {
        if self.fail_graph {
            return Err(SuggestError::Graph(format!("links_in({}) unavailable", id)));
        }
        Ok(self.links_in.get(&id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl TopicDirectory for MockPorts {
    async fn resolve(&self, id: TopicId) -> Result<Option<Topic>, SuggestError> {
        if self.failing_topics.contains(&id) {
            return Err(SuggestError::TopicLookup(format!("resolve({}) unavailable", id)));
        }
        Ok(self.topics.get(&id).cloned())
    }
}

#[async_trait]
impl CategoryIndex for MockPorts {
    async fn parent_categories(&self, id: TopicId) -> Result<Vec<Category>, SuggestError> {
        if self.fail_categories {
            return Err(SuggestError::Category(format!(
                "parent_categories({}) unavailable",
                id
            )));
        }
        Ok(self.parents.get(&id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl Relatedness for MockPorts {
    async fn score(&self, seed: TopicId, candidate: TopicId) -> Result<f64, SuggestError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.scored
            .lock()
            .expect("scored mutex poisoned")
            .push((seed, candidate));

        if self.failing_pairs.contains(&(seed, candidate)) {
            return Err(SuggestError::Relatedness {
                seed,
                candidate,
                reason: "comparer unavailable".to_string(),
            });
        }
        Ok(self.scores.get(&(seed, candidate)).copied().unwrap_or(0.0))
    }
}
