//! Randomized property tests over generated graphs.
//!
//! Each case builds a graph from a fixed RNG seed, picks random seeds and
//! parameters, and checks the ranking invariants that must hold for any
//! input.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use e2e_tests::{random_graph, RandomGraph, TestHarness};
use suggest_ranking::{SeedSet, SuggestionSet, CREDITED_MEMBER_LIMIT};
use suggest_service::SuggestRequest;
use suggest_store::SnapshotStore;
use suggest_types::{SuggestConfig, TopicId};

const CASES: u64 = 40;

struct Case {
    harness: TestHarness,
    seed_ids: Vec<TopicId>,
    config: SuggestConfig,
}

fn random_case(case: u64) -> Case {
    let mut rng = StdRng::seed_from_u64(case);
    let shape = RandomGraph::default();
    let harness = TestHarness::new(&random_graph(&mut rng, shape));

    let seed_count = rng.random_range(1..=3);
    let seed_ids = (0..seed_count)
        .map(|_| rng.random_range(1..=shape.topics))
        .collect();

    let config = SuggestConfig {
        max_suggestions: rng.random_range(0..=40),
        max_categories: rng.random_range(0..=6),
        search_space: rng.random_range(1..=50),
        min_individual_relatedness: rng.random_range(0.1..0.4),
        min_average_relatedness: rng.random_range(0.2..0.6),
        ..SuggestConfig::default()
    };

    Case {
        harness,
        seed_ids,
        config,
    }
}

async fn run_case(case: &Case) -> Option<(SeedSet, SuggestionSet, usize)> {
    let (pipeline, counter) = case.harness.counting_pipeline();
    let seeds = SeedSet::resolve(&case.seed_ids, pipeline.topics())
        .await
        .unwrap();
    if seeds.is_empty() {
        return None;
    }
    let set = pipeline.run(&seeds, &case.config).await.unwrap();
    Some((seeds, set, counter.candidates().len()))
}

fn mean_relatedness(store: &SnapshotStore, seeds: &SeedSet, id: TopicId) -> f64 {
    let total: f64 = seeds.ids().map(|seed| store.relatedness_of(seed, id)).sum();
    total / seeds.len() as f64
}

#[tokio::test]
async fn test_no_self_suggestion() {
    for n in 0..CASES {
        let case = random_case(n);
        let Some((seeds, set, _)) = run_case(&case).await else {
            continue;
        };

        for suggestion in &set.refined {
            assert!(!seeds.contains(suggestion.id()), "case {n}: seed suggested");
        }
        for group in &set.groups {
            assert!(group.members().iter().all(|m| !seeds.contains(m.id())));
        }
    }
}

#[tokio::test]
async fn test_size_caps_and_bounded_work() {
    for n in 0..CASES {
        let case = random_case(n);
        let Some((_, set, scored)) = run_case(&case).await else {
            continue;
        };

        assert!(set.refined.len() <= case.config.max_suggestions, "case {n}");
        assert!(set.groups.len() <= case.config.max_categories, "case {n}");
        assert!(
            scored <= case.config.search_space + 1,
            "case {n}: scored {scored} candidates with search space {}",
            case.config.search_space
        );
    }
}

#[tokio::test]
async fn test_refined_suggestions_meet_thresholds() {
    for n in 0..CASES {
        let case = random_case(n);
        let Some((seeds, set, _)) = run_case(&case).await else {
            continue;
        };
        let store = &case.harness.store;

        for suggestion in &set.refined {
            for seed in seeds.ids() {
                assert!(
                    store.relatedness_of(seed, suggestion.id())
                        >= case.config.min_individual_relatedness,
                    "case {n}: {} below individual threshold",
                    suggestion.id()
                );
            }
            let mean = mean_relatedness(store, &seeds, suggestion.id());
            assert!(mean >= case.config.min_average_relatedness);
            assert!((suggestion.weight - mean).abs() < 1e-12);
        }
    }
}

#[tokio::test]
async fn test_rank_order_is_total() {
    for n in 0..CASES {
        let case = random_case(n);
        let Some((_, set, _)) = run_case(&case).await else {
            continue;
        };

        assert!(set.refined.windows(2).all(|w| w[0] < w[1]), "case {n}");
        for pair in set.groups.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                a.weight() > b.weight() || (a.weight() == b.weight() && a.id() < b.id()),
                "case {n}: groups {} and {} out of order",
                a.id(),
                b.id()
            );
        }
    }
}

#[tokio::test]
async fn test_partition_completeness() {
    for n in 0..CASES {
        let case = random_case(n);
        let Some((_, set, _)) = run_case(&case).await else {
            continue;
        };

        let refined: HashSet<TopicId> = set.refined.iter().map(|s| s.id()).collect();
        let categorized: HashSet<TopicId> = set
            .groups
            .iter()
            .flat_map(|g| g.members().iter().map(|m| m.id()))
            .collect();
        let uncategorized: HashSet<TopicId> = set.uncategorized.iter().map(|s| s.id()).collect();

        assert!(categorized.is_disjoint(&uncategorized), "case {n}");
        let union: HashSet<TopicId> = categorized.union(&uncategorized).copied().collect();
        assert_eq!(union, refined, "case {n}");

        // Uncategorized keeps refined order
        let expected: Vec<TopicId> = set
            .refined
            .iter()
            .map(|s| s.id())
            .filter(|id| !categorized.contains(id))
            .collect();
        let actual: Vec<TopicId> = set.uncategorized.iter().map(|s| s.id()).collect();
        assert_eq!(actual, expected, "case {n}");
    }
}

#[tokio::test]
async fn test_surviving_groups_are_consistent() {
    for n in 0..CASES {
        let case = random_case(n);
        let Some((_, set, _)) = run_case(&case).await else {
            continue;
        };

        let mut credited = HashSet::new();
        for group in &set.groups {
            assert!(group.weight() > 1.5, "case {n}: weak group {}", group.id());
            assert!(group.credited_count() > 2, "case {n}");

            let expected: f64 = group
                .members()
                .iter()
                .filter(|m| !group.is_ignored(m.id()))
                .take(CREDITED_MEMBER_LIMIT)
                .map(|m| m.weight)
                .sum();
            assert!((group.weight() - expected).abs() < 1e-12, "case {n}");

            for member in group.members() {
                if !group.is_ignored(member.id()) {
                    assert!(
                        credited.insert(member.id()),
                        "case {n}: {} credited twice",
                        member.id()
                    );
                }
            }
        }
    }
}

#[tokio::test]
async fn test_identical_requests_identical_output() {
    for n in 0..CASES / 4 {
        let case = random_case(n);
        let request = SuggestRequest {
            query_topics: case.seed_ids.clone(),
            max_suggestions: Some(case.config.max_suggestions),
            max_categories: Some(case.config.max_categories),
            search_space: Some(case.config.search_space),
            min_individual_relatedness: Some(case.config.min_individual_relatedness),
            min_average_relatedness: Some(case.config.min_average_relatedness),
        };

        let first = case.harness.handler().suggest(&request).await.unwrap();
        let second = case.harness.handler().suggest(&request).await.unwrap();

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap(),
            "case {n}"
        );
    }
}
