//! CLI argument parsing for the suggestion tool.
//!
//! CLI flags override all other config sources.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use suggest_types::TopicId;

/// Topic Suggestion Engine
///
/// Suggests topics related to a set of seed topics, organized by category.
#[derive(Parser, Debug)]
#[command(name = "suggest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/topic-suggest/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Suggestion commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Suggest topics related to one or more seed topics
    Query(QueryArgs),

    /// Show a topic with its categories and link counts
    Topic {
        /// Graph snapshot file (default from config)
        #[arg(short, long)]
        snapshot: Option<PathBuf>,

        /// Topic id to show
        id: TopicId,
    },

    /// Print the effective settings
    Config,
}

/// Arguments for `suggest query`
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Graph snapshot file (default from config)
    #[arg(short, long)]
    pub snapshot: Option<PathBuf>,

    /// Seed topic ids
    pub topics: Vec<TopicId>,

    /// Maximum number of suggested topics to return
    #[arg(long)]
    pub max_suggestions: Option<usize>,

    /// Maximum number of categories to organize suggestions under
    #[arg(long)]
    pub max_categories: Option<usize>,

    /// Maximum number of rough suggestions to search
    #[arg(long)]
    pub search_space: Option<usize>,

    /// Minimum relatedness to each seed topic
    #[arg(long)]
    pub min_individual: Option<f64>,

    /// Minimum average relatedness to all seed topics
    #[arg(long)]
    pub min_average: Option<f64>,

    /// Pretty-print the JSON response
    #[arg(long)]
    pub pretty: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_query() {
        let cli = Cli::parse_from(["suggest", "query", "-s", "graph.json", "147313", "4913064"]);
        match cli.command {
            Commands::Query(args) => {
                assert_eq!(args.snapshot, Some(PathBuf::from("graph.json")));
                assert_eq!(args.topics, vec![147313, 4913064]);
                assert_eq!(args.max_suggestions, None);
                assert!(!args.pretty);
            }
            _ => panic!("Expected Query command"),
        }
    }

    #[test]
    fn test_cli_query_without_topics() {
        let cli = Cli::parse_from(["suggest", "query"]);
        match cli.command {
            Commands::Query(args) => assert!(args.topics.is_empty()),
            _ => panic!("Expected Query command"),
        }
    }

    #[test]
    fn test_cli_query_overrides() {
        let cli = Cli::parse_from([
            "suggest",
            "query",
            "1",
            "--max-suggestions",
            "10",
            "--max-categories",
            "3",
            "--search-space",
            "500",
            "--min-individual",
            "0.1",
            "--min-average",
            "0.25",
            "--pretty",
        ]);
        match cli.command {
            Commands::Query(args) => {
                assert_eq!(args.topics, vec![1]);
                assert_eq!(args.max_suggestions, Some(10));
                assert_eq!(args.max_categories, Some(3));
                assert_eq!(args.search_space, Some(500));
                assert_eq!(args.min_individual, Some(0.1));
                assert_eq!(args.min_average, Some(0.25));
                assert!(args.pretty);
            }
            _ => panic!("Expected Query command"),
        }
    }

    #[test]
    fn test_cli_topic() {
        let cli = Cli::parse_from(["suggest", "topic", "--snapshot", "/data/graph.json", "42"]);
        match cli.command {
            Commands::Topic { snapshot, id } => {
                assert_eq!(snapshot, Some(PathBuf::from("/data/graph.json")));
                assert_eq!(id, 42);
            }
            _ => panic!("Expected Topic command"),
        }
    }

    #[test]
    fn test_cli_config() {
        let cli = Cli::parse_from(["suggest", "config"]);
        assert!(matches!(cli.command, Commands::Config));
    }

    #[test]
    fn test_cli_with_config() {
        let cli = Cli::parse_from(["suggest", "--config", "/path/to/config.toml", "config"]);
        assert_eq!(cli.config, Some("/path/to/config.toml".to_string()));
    }

    #[test]
    fn test_cli_with_log_level() {
        let cli = Cli::parse_from(["suggest", "query", "1", "--log-level", "debug"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_rejects_non_numeric_topic() {
        assert!(Cli::try_parse_from(["suggest", "query", "hiking"]).is_err());
    }
}
