//! End-to-end ranking tests for the topic suggestion engine.
//!
//! Runs hand-built graphs through snapshot loading, the ranking pipeline and
//! the request handler, checking the exact categorized and uncategorized
//! output.

use pretty_assertions::assert_eq;
use serde_json::json;

use e2e_tests::{scenario_graph, GraphBuilder, TestHarness};
use suggest_ranking::SeedSet;
use suggest_service::{SuggestRequest, SuggestResponse};
use suggest_store::GraphSnapshot;
use suggest_types::{SuggestConfig, Topic, TopicId, TopicKind};

/// Single seed 1; every candidate's mean relatedness is its score to 1.
///
/// Alpha lists 10-14 and Beta lists 10, 11 and 15-17. Gamma lists 11-13 and
/// 18 and survives the initial prune, but after Alpha and Beta take credit
/// for 11-13 it is left with only 18 and is dropped.
fn overlapping_categories() -> GraphSnapshot {
    let scores = [
        (10, 0.9),
        (11, 0.85),
        (12, 0.8),
        (13, 0.75),
        (14, 0.7),
        (15, 0.65),
        (16, 0.6),
        (17, 0.55),
        (18, 0.5),
    ];

    let mut builder = GraphBuilder::new().article(1, "Seed");
    for (id, score) in scores {
        builder = builder
            .article(id, &format!("Topic {id}"))
            .link(1, id, 1)
            .score(1, id, score);
    }
    builder
        .category(100, "Alpha", &[10, 11, 12, 13, 14])
        .category(200, "Beta", &[10, 11, 15, 16, 17])
        .category(300, "Gamma", &[11, 12, 13, 18])
        .build()
}

#[tokio::test]
async fn test_scenario_end_to_end() {
    let harness = TestHarness::new(&scenario_graph());
    let (pipeline, counter) = harness.counting_pipeline();
    let seeds = SeedSet::resolve(&[1, 2], pipeline.topics()).await.unwrap();

    let set = pipeline.run(&seeds, &SuggestConfig::default()).await.unwrap();

    assert_eq!(set.candidate_count, 4);
    assert_eq!(
        set.refined.iter().map(|s| s.id()).collect::<Vec<_>>(),
        vec![3, 5]
    );
    assert!((set.refined[0].weight - 0.55).abs() < 1e-9);
    assert!((set.refined[1].weight - 0.325).abs() < 1e-9);
    assert!(set.groups.is_empty());
    assert_eq!(
        set.uncategorized.iter().map(|s| s.id()).collect::<Vec<_>>(),
        vec![3, 5]
    );

    // D fails on the first seed and F on the second
    assert_eq!(counter.calls(), 7);
}

#[tokio::test]
async fn test_scenario_response_json() {
    let harness = TestHarness::new(&scenario_graph());
    let response = harness
        .handler()
        .suggest(&SuggestRequest::new([1, 2]))
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({
            "status": "suggestions",
            "categories": [],
            "uncategorized": {
                "totalSuggestions": 2,
                "suggestions": [
                    {"id": 3, "title": "C", "weight": 0.55},
                    {"id": 5, "title": "E", "weight": 0.325}
                ]
            }
        })
    );
}

#[tokio::test]
async fn test_overlapping_categories_credit_once() {
    let harness = TestHarness::new(&overlapping_categories());
    let pipeline = harness.pipeline();
    let seeds = SeedSet::resolve(&[1], pipeline.topics()).await.unwrap();

    let set = pipeline.run(&seeds, &SuggestConfig::default()).await.unwrap();

    let group_ids: Vec<TopicId> = set.groups.iter().map(|g| g.id()).collect();
    assert_eq!(group_ids, vec![100, 200]);

    let alpha = &set.groups[0];
    assert!((alpha.weight() - 3.3).abs() < 1e-9);
    assert_eq!(alpha.ignored_count(), 0);

    let beta = &set.groups[1];
    assert!((beta.weight() - 1.8).abs() < 1e-9);
    assert_eq!(beta.members().len(), 5);
    assert!(beta.is_ignored(10));
    assert!(beta.is_ignored(11));
    assert_eq!(beta.credited_count(), 3);

    // Gamma was pruned, so its only credited member stays uncategorized
    assert_eq!(
        set.uncategorized.iter().map(|s| s.id()).collect::<Vec<_>>(),
        vec![18]
    );
}

#[tokio::test]
async fn test_overlapping_categories_response() {
    let harness = TestHarness::new(&overlapping_categories());
    let response = harness
        .handler()
        .suggest(&SuggestRequest::new([1]))
        .await
        .unwrap();

    let SuggestResponse::Suggestions {
        categories,
        uncategorized,
    } = response
    else {
        panic!("expected suggestions");
    };

    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].title, "Alpha");
    assert_eq!(categories[0].total_suggestions, 5);
    assert_eq!(categories[1].title, "Beta");
    // Ignored members are still listed
    assert_eq!(
        categories[1].suggestions.iter().map(|s| s.id).collect::<Vec<_>>(),
        vec![10, 11, 15, 16, 17]
    );
    assert_eq!(uncategorized.total_suggestions, 1);
    assert_eq!(uncategorized.suggestions[0].id, 18);
}

#[tokio::test]
async fn test_max_categories_keeps_best() {
    let harness = TestHarness::new(&overlapping_categories());
    let response = harness
        .handler()
        .suggest(&SuggestRequest::new([1]).with_max_categories(1))
        .await
        .unwrap();

    let SuggestResponse::Suggestions {
        categories,
        uncategorized,
    } = response
    else {
        panic!("expected suggestions");
    };

    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].id, 100);
    assert_eq!(
        uncategorized.suggestions.iter().map(|s| s.id).collect::<Vec<_>>(),
        vec![15, 16, 17, 18]
    );
}

#[tokio::test]
async fn test_tight_thresholds_shrink_output() {
    let harness = TestHarness::new(&overlapping_categories());
    let response = harness
        .handler()
        .suggest(&SuggestRequest::new([1]).with_thresholds(0.2, 0.78))
        .await
        .unwrap();

    let SuggestResponse::Suggestions {
        categories,
        uncategorized,
    } = response
    else {
        panic!("expected suggestions");
    };

    assert!(categories.is_empty());
    assert_eq!(
        uncategorized.suggestions.iter().map(|s| s.id).collect::<Vec<_>>(),
        vec![10, 11, 12]
    );
}

#[tokio::test]
async fn test_non_article_candidates_skipped() {
    let snapshot = GraphBuilder::new()
        .article(1, "Seed")
        .article(2, "Article")
        .topic(Topic::new(3, TopicKind::Category, "Category:Things"))
        .link(1, 2, 1)
        .link(1, 3, 5)
        .score(1, 2, 0.9)
        .score(1, 3, 0.9)
        .build();
    let harness = TestHarness::new(&snapshot);
    let (pipeline, counter) = harness.counting_pipeline();
    let seeds = SeedSet::resolve(&[1], pipeline.topics()).await.unwrap();

    let set = pipeline.run(&seeds, &SuggestConfig::default()).await.unwrap();

    assert_eq!(set.candidate_count, 2);
    assert_eq!(set.refined.iter().map(|s| s.id()).collect::<Vec<_>>(), vec![2]);
    assert!(!counter.candidates().contains(&3));
}
