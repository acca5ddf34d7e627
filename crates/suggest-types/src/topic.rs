//! Topic data types.
//!
//! Topics are the addressable entities of the link graph. They carry no
//! ranking state; each pipeline stage wraps them in its own weighted value.

use serde::{Deserialize, Serialize};

/// A unique identifier for a topic (page id).
pub type TopicId = u32;

/// Kind of page a topic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TopicKind {
    /// A regular article; the only kind that can seed or be suggested
    #[default]
    Article,
    /// A category page
    Category,
    /// Redirects, disambiguations, templates and anything else
    Other,
}

impl std::fmt::Display for TopicKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopicKind::Article => write!(f, "article"),
            TopicKind::Category => write!(f, "category"),
            TopicKind::Other => write!(f, "other"),
        }
    }
}

/// An addressable entity in the knowledge graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Topic {
    /// Page identifier
    pub id: TopicId,
    /// Page kind
    #[serde(default)]
    pub kind: TopicKind,
    /// Display title
    pub title: String,
}

impl Topic {
    /// Create a new topic.
    pub fn new(id: TopicId, kind: TopicKind, title: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            title: title.into(),
        }
    }

    /// Create an article topic.
    pub fn article(id: TopicId, title: impl Into<String>) -> Self {
        Self::new(id, TopicKind::Article, title)
    }

    /// Check if the topic is an article.
    pub fn is_article(&self) -> bool {
        self.kind == TopicKind::Article
    }
}

/// A parent category of a topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    /// Category page identifier
    pub id: TopicId,
    /// Category title
    pub title: String,
}

impl Category {
    /// Create a new category reference.
    pub fn new(id: TopicId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

/// A link from (or to) a topic, with the number of positions it occurs at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkOccurrences {
    /// The topic at the other end of the link
    pub target: TopicId,
    /// Number of sentences the link occurs in
    pub occurrences: u32,
}

impl LinkOccurrences {
    /// Create a new link occurrence record.
    pub fn new(target: TopicId, occurrences: u32) -> Self {
        Self {
            target,
            occurrences,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_article() {
        let topic = Topic::article(7, "Tramping");
        assert!(topic.is_article());
        assert_eq!(topic.title, "Tramping");
    }

    #[test]
    fn test_topic_kind_serialization() {
        let json = serde_json::to_string(&TopicKind::Category).unwrap();
        assert_eq!(json, "\"category\"");
        let kind: TopicKind = serde_json::from_str("\"other\"").unwrap();
        assert_eq!(kind, TopicKind::Other);
    }

    #[test]
    fn test_topic_kind_defaults_to_article() {
        let topic: Topic = serde_json::from_str(r#"{"id": 3, "title": "C"}"#).unwrap();
        assert_eq!(topic.kind, TopicKind::Article);
    }

    #[test]
    fn test_topic_kind_display() {
        assert_eq!(format!("{}", TopicKind::Article), "article");
        assert_eq!(format!("{}", TopicKind::Category), "category");
        assert_eq!(format!("{}", TopicKind::Other), "other");
    }
}
