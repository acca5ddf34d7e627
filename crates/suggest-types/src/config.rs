//! Configuration loading for the suggestion engine.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at ~/.config/topic-suggest/config.{toml,json,yaml}.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::SuggestError;

/// Thresholds and caps for the ranking pipeline.
///
/// Every field can be overridden per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestConfig {
    /// Maximum number of suggested topics to return
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,

    /// Maximum number of categories to organize suggestions under
    #[serde(default = "default_max_categories")]
    pub max_categories: usize,

    /// Maximum number of rough candidates examined during refinement.
    /// Larger values give better suggestions at the cost of more relatedness lookups.
    #[serde(default = "default_search_space")]
    pub search_space: usize,

    /// Minimum relatedness a suggestion must have to each seed topic
    #[serde(default = "default_min_individual_relatedness")]
    pub min_individual_relatedness: f64,

    /// Minimum average relatedness a suggestion must have to all seed topics
    #[serde(default = "default_min_average_relatedness")]
    pub min_average_relatedness: f64,

    /// Maximum number of (seed, candidate) scores kept by the shared
    /// relatedness cache. Applies per handler, not per request.
    #[serde(default = "default_relatedness_cache_size")]
    pub relatedness_cache_size: usize,
}

fn default_max_suggestions() -> usize {
    250
}

fn default_max_categories() -> usize {
    25
}

fn default_search_space() -> usize {
    100_000
}

fn default_min_individual_relatedness() -> f64 {
    0.2
}

fn default_min_average_relatedness() -> f64 {
    0.3
}

fn default_relatedness_cache_size() -> usize {
    100_000
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            max_suggestions: default_max_suggestions(),
            max_categories: default_max_categories(),
            search_space: default_search_space(),
            min_individual_relatedness: default_min_individual_relatedness(),
            min_average_relatedness: default_min_average_relatedness(),
            relatedness_cache_size: default_relatedness_cache_size(),
        }
    }
}

impl SuggestConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), SuggestError> {
        if !(0.0..=1.0).contains(&self.min_individual_relatedness) {
            return Err(SuggestError::Config(format!(
                "min_individual_relatedness must be 0.0-1.0, got {}",
                self.min_individual_relatedness
            )));
        }
        if !(0.0..=1.0).contains(&self.min_average_relatedness) {
            return Err(SuggestError::Config(format!(
                "min_average_relatedness must be 0.0-1.0, got {}",
                self.min_average_relatedness
            )));
        }
        if self.relatedness_cache_size == 0 {
            return Err(SuggestError::Config(
                "relatedness_cache_size must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Graph snapshot used when no `--snapshot` flag is given
    #[serde(default)]
    pub snapshot_path: Option<String>,

    /// Pipeline defaults applied to requests that leave a parameter unset
    #[serde(default)]
    pub pipeline: SuggestConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            snapshot_path: None,
            pipeline: SuggestConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/topic-suggest/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (SUGGEST_LOG_LEVEL, SUGGEST_PIPELINE__SEARCH_SPACE, ...)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, SuggestError> {
        let default_config_path = default_config_dir().join("config");

        let mut builder = Config::builder()
            // 1. Built-in defaults
            .set_default("log_level", default_log_level())
            .map_err(|e| SuggestError::Config(e.to_string()))?
            .set_default("pipeline.max_suggestions", default_max_suggestions() as i64)
            .map_err(|e| SuggestError::Config(e.to_string()))?
            .set_default("pipeline.max_categories", default_max_categories() as i64)
            .map_err(|e| SuggestError::Config(e.to_string()))?
            .set_default("pipeline.search_space", default_search_space() as i64)
            .map_err(|e| SuggestError::Config(e.to_string()))?
            .set_default(
                "pipeline.min_individual_relatedness",
                default_min_individual_relatedness(),
            )
            .map_err(|e| SuggestError::Config(e.to_string()))?
            .set_default(
                "pipeline.min_average_relatedness",
                default_min_average_relatedness(),
            )
            .map_err(|e| SuggestError::Config(e.to_string()))?
            .set_default(
                "pipeline.relatedness_cache_size",
                default_relatedness_cache_size() as i64,
            )
            .map_err(|e| SuggestError::Config(e.to_string()))?
            // 2. Default config file
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        // 3. CLI-specified config file (higher precedence than default)
        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // 4. Environment variables (highest precedence before CLI flags)
        builder = builder.add_source(
            Environment::with_prefix("SUGGEST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| SuggestError::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| SuggestError::Config(e.to_string()))?;

        settings.pipeline.validate()?;
        Ok(settings)
    }

    /// Expand ~ in snapshot_path to the home directory
    pub fn expanded_snapshot_path(&self) -> Option<PathBuf> {
        let path = self.snapshot_path.as_deref()?;
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(dirs) = directories::BaseDirs::new() {
                return Some(dirs.home_dir().join(rest));
            }
        }
        Some(PathBuf::from(path))
    }
}

/// Directory holding the default config file.
pub fn default_config_dir() -> PathBuf {
    ProjectDirs::from("", "", "topic-suggest")
        .map(|p| p.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
