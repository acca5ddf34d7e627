//! Topic Suggestion CLI
//!
//! Suggests topics related to a set of seed topics, using a link graph
//! snapshot.
//!
//! # Usage
//!
//! ```bash
//! suggest query --snapshot graph.json 147313 4913064 [--max-suggestions N] [--pretty]
//! suggest topic --snapshot graph.json 147313
//! suggest config
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/topic-suggest/config.toml)
//! 3. Environment variables (SUGGEST_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use suggest_daemon::{
    handle_query, handle_topic, init_logging, load_settings, show_config, Cli, Commands,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = load_settings(cli.config.as_deref(), cli.log_level.as_deref())?;
    init_logging(&settings.log_level)?;

    match cli.command {
        Commands::Query(args) => {
            handle_query(&settings, args).await?;
        }
        Commands::Topic { snapshot, id } => {
            handle_topic(&settings, snapshot.as_deref(), id)?;
        }
        Commands::Config => {
            show_config(&settings)?;
        }
    }

    Ok(())
}
