//! Command implementations for the suggestion tool.
//!
//! Handles:
//! - query: Load config and snapshot, answer a suggestion request
//! - topic: Show a topic's kind, categories and link counts
//! - config: Print the effective settings

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use suggest_ranking::SuggestPipeline;
use suggest_service::{SuggestHandler, SuggestRequest, SuggestResponse};
use suggest_store::{SnapshotStore, StoreStats};
use suggest_types::{Category, Settings, Topic, TopicId};

use crate::cli::QueryArgs;

/// Load settings and apply the global CLI overrides.
pub fn load_settings(config_path: Option<&str>, log_level: Option<&str>) -> Result<Settings> {
    let mut settings = Settings::load(config_path).context("Failed to load configuration")?;
    if let Some(level) = log_level {
        settings.log_level = level.to_string();
    }
    Ok(settings)
}

/// Install the tracing subscriber.
///
/// Logs go to stderr so stdout carries only command output. `RUST_LOG`
/// takes precedence over the configured level.
pub fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Pick the snapshot path from the CLI flag, falling back to settings.
pub fn snapshot_path(flag: Option<&Path>, settings: &Settings) -> Result<PathBuf> {
    flag.map(Path::to_path_buf)
        .or_else(|| settings.expanded_snapshot_path())
        .context("No snapshot given: pass --snapshot or set snapshot_path in the config")
}

fn open_store(path: &Path) -> Result<Arc<SnapshotStore>> {
    let store = SnapshotStore::open(path)
        .with_context(|| format!("Failed to open snapshot {}", path.display()))?;
    Ok(Arc::new(store))
}

/// Build a request from `suggest query` arguments.
pub fn build_request(args: &QueryArgs) -> SuggestRequest {
    SuggestRequest {
        query_topics: args.topics.clone(),
        max_suggestions: args.max_suggestions,
        max_categories: args.max_categories,
        search_space: args.search_space,
        min_individual_relatedness: args.min_individual,
        min_average_relatedness: args.min_average,
    }
}

/// Answer a suggestion query against a snapshot.
pub async fn run_query(settings: &Settings, args: &QueryArgs) -> Result<SuggestResponse> {
    let path = snapshot_path(args.snapshot.as_deref(), settings)?;
    let store = open_store(&path)?;

    let handler = SuggestHandler::new(
        SuggestPipeline::from_store(store),
        settings.pipeline.clone(),
    );
    let response = handler
        .suggest(&build_request(args))
        .await
        .context("Suggestion request failed")?;
    Ok(response)
}

/// A topic with its categories and link counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicReport {
    pub topic: Topic,
    pub categories: Vec<Category>,
    pub links_out: usize,
    pub links_in: usize,
}

/// Look up a topic in a snapshot.
pub fn describe_topic(settings: &Settings, flag: Option<&Path>, id: TopicId) -> Result<TopicReport> {
    let path = snapshot_path(flag, settings)?;
    let store = open_store(&path)?;
    let StoreStats { topic_count, .. } = store.stats();

    let topic = store
        .topic(id)
        .cloned()
        .with_context(|| format!("Topic {} not found among {} topics", id, topic_count))?;

    Ok(TopicReport {
        topic,
        categories: store.categories_of(id).to_vec(),
        links_out: store.outbound(id).len(),
        links_in: store.inbound(id).len(),
    })
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("Failed to serialize output")
}

/// Handle `suggest query`.
pub async fn handle_query(settings: &Settings, args: QueryArgs) -> Result<()> {
    info!(seeds = ?args.topics, "Running suggestion query");
    let response = run_query(settings, &args).await?;
    println!("{}", to_json(&response, args.pretty)?);
    Ok(())
}

/// Handle `suggest topic`.
pub fn handle_topic(settings: &Settings, snapshot: Option<&Path>, id: TopicId) -> Result<()> {
    let report = describe_topic(settings, snapshot, id)?;
    println!("{}", to_json(&report, true)?);
    Ok(())
}

/// Handle `suggest config`.
pub fn show_config(settings: &Settings) -> Result<()> {
    println!("{}", to_json(settings, true)?);
    Ok(())
}
