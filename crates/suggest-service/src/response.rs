//! Serializable suggestion responses.

use serde::{Deserialize, Serialize, Serializer};

use suggest_ranking::{Suggestion, SuggestionGroup, SuggestionSet};
use suggest_types::TopicId;

/// Round a weight to three decimal places for display.
pub fn format_weight(weight: f64) -> f64 {
    (weight * 1000.0).round() / 1000.0
}

fn serialize_weight<S: Serializer>(weight: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(format_weight(*weight))
}

/// One suggested topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionView {
    pub id: TopicId,
    pub title: String,
    #[serde(serialize_with = "serialize_weight")]
    pub weight: f64,
}

impl From<&Suggestion> for SuggestionView {
    fn from(suggestion: &Suggestion) -> Self {
        Self {
            id: suggestion.id(),
            title: suggestion.topic.title.clone(),
            weight: suggestion.weight,
        }
    }
}

/// A category and every suggestion filed under it, credited or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub id: TopicId,
    pub title: String,
    #[serde(serialize_with = "serialize_weight")]
    pub weight: f64,
    pub total_suggestions: usize,
    pub suggestions: Vec<SuggestionView>,
}

impl From<&SuggestionGroup> for CategoryView {
    fn from(group: &SuggestionGroup) -> Self {
        Self {
            id: group.id(),
            title: group.title().to_string(),
            weight: group.weight(),
            total_suggestions: group.members().len(),
            suggestions: group.members().iter().map(SuggestionView::from).collect(),
        }
    }
}

/// Suggestions not listed under any surviving category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UncategorizedView {
    pub total_suggestions: usize,
    pub suggestions: Vec<SuggestionView>,
}

impl UncategorizedView {
    fn new(suggestions: &[Suggestion]) -> Self {
        Self {
            total_suggestions: suggestions.len(),
            suggestions: suggestions.iter().map(SuggestionView::from).collect(),
        }
    }
}

/// Outcome of a suggestion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SuggestResponse {
    /// No seed ids were supplied.
    UnspecifiedParameters,
    /// The request could not be answered.
    Error { message: String },
    /// Categorized suggestions followed by the uncategorized remainder.
    Suggestions {
        categories: Vec<CategoryView>,
        uncategorized: UncategorizedView,
    },
}

impl SuggestResponse {
    /// Build an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Check if this response carries suggestions.
    pub fn is_suggestions(&self) -> bool {
        matches!(self, Self::Suggestions { .. })
    }
}

impl From<&SuggestionSet> for SuggestResponse {
    fn from(set: &SuggestionSet) -> Self {
        Self::Suggestions {
            categories: set.groups.iter().map(CategoryView::from).collect(),
            uncategorized: UncategorizedView::new(&set.uncategorized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use suggest_types::Topic;

    #[test]
    fn test_format_weight() {
        assert_eq!(format_weight(0.325), 0.325);
        assert_eq!(format_weight(0.55000000001), 0.55);
        assert_eq!(format_weight(1.23456), 1.235);
        assert_eq!(format_weight(0.0), 0.0);
    }

    #[test]
    fn test_unspecified_parameters_json() {
        let json = serde_json::to_value(SuggestResponse::UnspecifiedParameters).unwrap();
        assert_eq!(json, json!({"status": "unspecifiedParameters"}));
    }

    #[test]
    fn test_error_json() {
        let json =
            serde_json::to_value(SuggestResponse::error("no valid query topic ids specified"))
                .unwrap();
        assert_eq!(
            json,
            json!({"status": "error", "message": "no valid query topic ids specified"})
        );
    }

    #[test]
    fn test_suggestions_json() {
        let c = Suggestion::new(Topic::article(3, "C"), 0.55000000001);
        let e = Suggestion::new(Topic::article(5, "E"), 0.325);
        let set = SuggestionSet {
            uncategorized: vec![c.clone(), e.clone()],
            refined: vec![c, e],
            candidate_count: 4,
            ..Default::default()
        };

        let response = SuggestResponse::from(&set);
        assert!(response.is_suggestions());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
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
}
