//! Suggestion CLI library exports.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (query, topic, config)

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands, QueryArgs};
pub use commands::{
    build_request, describe_topic, handle_query, handle_topic, init_logging, load_settings,
    run_query, show_config, snapshot_path, TopicReport,
};
