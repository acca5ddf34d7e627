//! # suggest-types
//!
//! Shared domain types for the topic suggestion engine.
//!
//! This crate defines the data structures passed between the pipeline,
//! the snapshot store, and the request handler:
//! - Topics: addressable articles and categories in the link graph
//! - Links: per-topic link targets with occurrence counts
//! - Settings: layered configuration, including pipeline thresholds
//!
//! ## Usage
//!
//! ```rust
//! use suggest_types::{Topic, TopicKind};
//!
//! let topic = Topic::article(147313, "Hiking");
//! assert_eq!(topic.kind, TopicKind::Article);
//! ```

pub mod config;
pub mod error;
pub mod topic;

pub use config::{Settings, SuggestConfig};
pub use error::SuggestError;
pub use topic::{Category, LinkOccurrences, Topic, TopicId, TopicKind};
