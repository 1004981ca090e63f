//! Request types

use serde::{Deserialize, Serialize};

/// Search request, accepted both as JSON and as a URL-encoded form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// The question to answer
    pub query: String,

    /// Run the completeness critique and blend its score (default: true)
    #[serde(default = "default_true")]
    pub include_confidence: bool,

    /// Generate enrichment suggestions (default: true)
    #[serde(default = "default_true")]
    pub include_enrichment: bool,
}

fn default_true() -> bool {
    true
}

impl SearchRequest {
    /// Create a request with both analysis flags enabled
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            include_confidence: true,
            include_enrichment: true,
        }
    }

    /// Disable the completeness critique
    pub fn without_confidence(mut self) -> Self {
        self.include_confidence = false;
        self
    }

    /// Disable enrichment suggestions
    pub fn without_enrichment(mut self) -> Self {
        self.include_enrichment = false;
        self
    }
}

/// User rating of an answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRating {
    /// The query that was answered
    pub query: String,
    /// 1-5
    pub rating: u8,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub improvement_suggestions: Option<String>,
}
