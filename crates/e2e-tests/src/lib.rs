//! End-to-end test infrastructure for the topic suggestion engine.
//!
//! Provides a snapshot builder, a shared TestHarness that writes snapshots
//! to a temp directory and opens them through the store, a random graph
//! generator for property tests, and a relatedness wrapper that records
//! which candidates were scored.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::Rng;

use suggest_ranking::{Relatedness, SuggestPipeline};
use suggest_service::SuggestHandler;
use suggest_store::{CategoryRecord, GraphSnapshot, LinkRecord, RelatednessRecord, SnapshotStore};
use suggest_types::{SuggestConfig, SuggestError, Topic, TopicId, TopicKind};

/// Builder for graph snapshots.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    snapshot: GraphSnapshot,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an article.
    pub fn article(self, id: TopicId, title: &str) -> Self {
        self.topic(Topic::article(id, title))
    }

    /// Add a topic of any kind.
    pub fn topic(mut self, topic: Topic) -> Self {
        self.snapshot.topics.push(topic);
        self
    }

    /// Add a link occurring in `occurrences` sentences of `source`.
    pub fn link(mut self, source: TopicId, target: TopicId, occurrences: u32) -> Self {
        self.snapshot.links.push(LinkRecord {
            source,
            target,
            sentences: (0..occurrences).collect(),
        });
        self
    }

    /// Add a category with its members.
    pub fn category(mut self, id: TopicId, title: &str, members: &[TopicId]) -> Self {
        self.snapshot.categories.push(CategoryRecord {
            id,
            title: title.to_string(),
            members: members.to_vec(),
        });
        self
    }

    /// Add a symmetric relatedness score.
    pub fn score(mut self, a: TopicId, b: TopicId, score: f64) -> Self {
        self.snapshot
            .relatedness
            .push(RelatednessRecord { a, b, score });
        self
    }

    pub fn build(self) -> GraphSnapshot {
        self.snapshot
    }
}

/// The documented ranking scenario.
///
/// Seeds A=1 and B=2. Rough weights give candidate order C(3), D(4), E(5),
/// F(6). D and F fail the individual threshold, so refinement keeps C (.55)
/// and E (.325). C and E share category 100, which is too small to survive.
pub fn scenario_graph() -> GraphSnapshot {
    GraphBuilder::new()
        .article(1, "A")
        .article(2, "B")
        .article(3, "C")
        .article(4, "D")
        .article(5, "E")
        .article(6, "F")
        .link(1, 3, 2)
        .link(3, 2, 1)
        .link(1, 4, 1)
        .link(2, 4, 2)
        .link(5, 1, 3)
        .link(2, 6, 1)
        .score(1, 3, 0.6)
        .score(2, 3, 0.5)
        .score(1, 4, 0.1)
        .score(1, 5, 0.4)
        .score(2, 5, 0.25)
        .score(1, 6, 0.5)
        .score(2, 6, 0.1)
        .category(100, "Shared", &[3, 5])
        .build()
}

/// Shape of a randomly generated graph.
#[derive(Debug, Clone, Copy)]
pub struct RandomGraph {
    pub topics: u32,
    pub links: usize,
    pub categories: u32,
    pub max_category_size: usize,
}

impl Default for RandomGraph {
    fn default() -> Self {
        Self {
            topics: 60,
            links: 400,
            categories: 12,
            max_category_size: 12,
        }
    }
}

/// Category ids in random graphs start here, above every topic id.
pub const RANDOM_CATEGORY_BASE: TopicId = 10_000;

/// Generate a random graph.
///
/// Topics are numbered from 1. About one in ten is not an article. Every
/// pair of topics gets a relatedness score, biased towards passing the
/// default thresholds so that categories form.
pub fn random_graph(rng: &mut StdRng, shape: RandomGraph) -> GraphSnapshot {
    let mut builder = GraphBuilder::new();

    for id in 1..=shape.topics {
        let kind = if rng.random_ratio(1, 10) {
            TopicKind::Other
        } else {
            TopicKind::Article
        };
        builder = builder.topic(Topic::new(id, kind, format!("Topic {id}")));
    }

    for _ in 0..shape.links {
        let source = rng.random_range(1..=shape.topics);
        let target = rng.random_range(1..=shape.topics);
        if source != target {
            builder = builder.link(source, target, rng.random_range(1..=4));
        }
    }

    for n in 0..shape.categories {
        let size = rng.random_range(1..=shape.max_category_size);
        let members: Vec<TopicId> = (1..=shape.topics).choose_multiple(rng, size);
        builder = builder.category(RANDOM_CATEGORY_BASE + n, &format!("Category {n}"), &members);
    }

    for a in 1..=shape.topics {
        for b in (a + 1)..=shape.topics {
            builder = builder.score(a, b, rng.random_range(0.1..1.0));
        }
    }

    builder.build()
}

/// Shared test harness for E2E tests.
///
/// Writes a snapshot to a temp directory and opens it through the store,
/// exercising the same loading path as the CLI.
pub struct TestHarness {
    /// Keeps temp dir alive for the lifetime of the harness
    pub _temp_dir: tempfile::TempDir,
    /// Path of the written snapshot
    pub snapshot_path: PathBuf,
    /// Store opened from the snapshot
    pub store: Arc<SnapshotStore>,
}

impl TestHarness {
    /// Write `snapshot` to disk and open it.
    pub fn new(snapshot: &GraphSnapshot) -> Self {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let snapshot_path = temp_dir.path().join("graph.json");
        snapshot
            .save(&snapshot_path)
            .expect("Failed to write snapshot");
        let store =
            Arc::new(SnapshotStore::open(&snapshot_path).expect("Failed to open test snapshot"));

        Self {
            _temp_dir: temp_dir,
            snapshot_path,
            store,
        }
    }

    /// Pipeline over the store.
    pub fn pipeline(&self) -> SuggestPipeline {
        SuggestPipeline::from_store(self.store.clone())
    }

    /// Pipeline whose relatedness lookups are recorded.
    pub fn counting_pipeline(&self) -> (SuggestPipeline, Arc<CountingRelatedness>) {
        let counter = Arc::new(CountingRelatedness::new(self.store.clone()));
        (self.pipeline().with_relatedness(counter.clone()), counter)
    }

    /// Handler with default parameters.
    pub fn handler(&self) -> SuggestHandler {
        self.handler_with(SuggestConfig::default())
    }

    /// Handler with the given default parameters.
    pub fn handler_with(&self, defaults: SuggestConfig) -> SuggestHandler {
        SuggestHandler::new(self.pipeline(), defaults)
    }
}

/// Relatedness wrapper that records every lookup.
pub struct CountingRelatedness {
    inner: Arc<dyn Relatedness>,
    calls: AtomicUsize,
    candidates: Mutex<HashSet<TopicId>>,
}

impl CountingRelatedness {
    pub fn new(inner: Arc<dyn Relatedness>) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
            candidates: Mutex::new(HashSet::new()),
        }
    }

    /// Total lookups.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Distinct candidates that were scored.
    pub fn candidates(&self) -> HashSet<TopicId> {
        self.candidates
            .lock()
            .expect("candidate set poisoned")
            .clone()
    }
}

#[async_trait]
impl Relatedness for CountingRelatedness {
    async fn score(&self, seed: TopicId, candidate: TopicId) -> Result<f64, SuggestError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.candidates
            .lock()
            .expect("candidate set poisoned")
            .insert(candidate);
        self.inner.score(seed, candidate).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_scenario_graph_is_valid() {
        let snapshot = scenario_graph();
        assert!(snapshot.validate().is_ok());
        assert_eq!(snapshot.topics.len(), 6);
    }

    #[test]
    fn test_random_graph_is_deterministic() {
        let a = random_graph(&mut StdRng::seed_from_u64(7), RandomGraph::default());
        let b = random_graph(&mut StdRng::seed_from_u64(7), RandomGraph::default());
        assert!(a.validate().is_ok());
        assert_eq!(a.topics, b.topics);
        assert_eq!(a.links, b.links);
        assert_eq!(a.categories, b.categories);
    }

    #[test]
    fn test_harness_opens_snapshot() {
        let harness = TestHarness::new(&scenario_graph());
        assert!(harness.snapshot_path.exists());
        assert_eq!(harness.store.stats().topic_count, 6);
    }
}
