//! Snapshot file format.
//!
//! ```json
//! {
//!   "topics": [{"id": 1, "kind": "article", "title": "Hiking"}],
//!   "links": [{"source": 1, "target": 3, "sentences": [0, 4]}],
//!   "categories": [{"id": 100, "title": "Walking", "members": [3, 5]}],
//!   "relatedness": [{"a": 1, "b": 3, "score": 0.6}]
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use suggest_types::{Topic, TopicId};

use crate::error::StoreError;

/// A link between two topics and the sentences of `source` it occurs in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Linking topic
    pub source: TopicId,
    /// Linked topic
    pub target: TopicId,
    /// Sentence indexes within `source` where the link occurs
    #[serde(default)]
    pub sentences: Vec<u32>,
}

impl LinkRecord {
    /// Number of positions the link occurs at.
    pub fn occurrences(&self) -> u32 {
        self.sentences.len() as u32
    }
}

/// A category and the topics directly inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    /// Category page id
    pub id: TopicId,
    /// Category title
    pub title: String,
    /// Member topic ids
    #[serde(default)]
    pub members: Vec<TopicId>,
}

/// A precomputed relatedness score, valid in both directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatednessRecord {
    /// One topic
    pub a: TopicId,
    /// The other topic
    pub b: TopicId,
    /// Score in [0, 1]
    pub score: f64,
}

/// Serialized form of a link graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// All known pages
    #[serde(default)]
    pub topics: Vec<Topic>,
    /// Links with occurrence positions
    #[serde(default)]
    pub links: Vec<LinkRecord>,
    /// Category memberships
    #[serde(default)]
    pub categories: Vec<CategoryRecord>,
    /// Pairwise relatedness scores
    #[serde(default)]
    pub relatedness: Vec<RelatednessRecord>,
}

impl GraphSnapshot {
    /// Parse a snapshot from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let snapshot: GraphSnapshot = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Read and validate a snapshot file.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Write the snapshot as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Check for duplicate topic ids and out-of-range scores.
    pub fn validate(&self) -> Result<(), StoreError> {
        let mut ids = HashSet::new();
        for topic in &self.topics {
            if !ids.insert(topic.id) {
                return Err(StoreError::Invalid(format!(
                    "duplicate topic id {}",
                    topic.id
                )));
            }
        }

        let mut category_ids = HashSet::new();
        for category in &self.categories {
            if !category_ids.insert(category.id) {
                return Err(StoreError::Invalid(format!(
                    "duplicate category id {}",
                    category.id
                )));
            }
        }

        for record in &self.relatedness {
            if !(0.0..=1.0).contains(&record.score) {
                return Err(StoreError::Invalid(format!(
                    "relatedness of ({}, {}) must be 0.0-1.0, got {}",
                    record.a, record.b, record.score
                )));
            }
        }

        Ok(())
    }
}
