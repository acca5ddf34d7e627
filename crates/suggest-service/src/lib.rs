//! Request handling for the topic suggestion engine.
//!
//! Provides:
//! - `SuggestRequest`: seed ids plus optional per-request overrides
//! - `SuggestHandler`: resolves seeds, runs the ranking pipeline and shares a
//!   relatedness cache across requests
//! - `SuggestResponse`: the serializable outcome, including the structured
//!   input-error responses

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{ExampleQuery, ServiceDescription, SuggestHandler, NO_VALID_SEEDS};
pub use request::SuggestRequest;
pub use response::{
    format_weight, CategoryView, SuggestResponse, SuggestionView, UncategorizedView,
};
