//! Response types for knowledge-base queries

use serde::{Deserialize, Serialize};

use super::document::RetrievedChunk;
use crate::config::ConfidenceConfig;

/// Characters of chunk text shown in a source preview
const PREVIEW_CHARS: usize = 200;

/// Coarse confidence bucket shown to users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    /// Map a confidence number to a level; both thresholds are inclusive
    pub fn from_score(confidence: f32, thresholds: &ConfidenceConfig) -> Self {
        if confidence >= thresholds.high_threshold {
            Self::High
        } else if confidence >= thresholds.medium_threshold {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Category of a knowledge gap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingInfoKind {
    Document,
    Data,
    Context,
    SpecificFact,
}

impl MissingInfoKind {
    /// Parse the wire name; unknown names yield `None`
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "document" => Some(Self::Document),
            "data" => Some(Self::Data),
            "context" => Some(Self::Context),
            "specific_fact" => Some(Self::SpecificFact),
            _ => None,
        }
    }
}

/// A specific gap found in the available context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingInfoItem {
    #[serde(rename = "type")]
    pub kind: MissingInfoKind,
    pub description: String,
    pub suggested_action: String,
    /// 1-5, 5 being the most urgent
    pub priority: u8,
}

impl MissingInfoItem {
    /// Create an item, clamping priority into 1..=5
    pub fn new(
        kind: MissingInfoKind,
        description: impl Into<String>,
        suggested_action: impl Into<String>,
        priority: i64,
    ) -> Self {
        Self {
            kind,
            description: description.into(),
            suggested_action: suggested_action.into(),
            priority: priority.clamp(1, 5) as u8,
        }
    }
}

/// Effort estimate attached to an enrichment suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    Medium,
    High,
}

/// A recommended action to close a knowledge gap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentSuggestion {
    /// Suggestion type, unique within a response (e.g. `procedure_document`)
    #[serde(rename = "type")]
    pub suggestion_type: String,
    pub description: String,
    pub action: String,
    /// 0.0-1.0
    pub confidence: f32,
    pub estimated_effort: Effort,
}

impl EnrichmentSuggestion {
    /// Create a suggestion, clamping confidence into [0, 1]
    pub fn new(
        suggestion_type: impl Into<String>,
        description: impl Into<String>,
        action: impl Into<String>,
        confidence: f32,
        estimated_effort: Effort,
    ) -> Self {
        Self {
            suggestion_type: suggestion_type.into(),
            description: description.into(),
            action: action.into(),
            confidence: confidence.clamp(0.0, 1.0),
            estimated_effort,
        }
    }
}

/// Retrieved chunk as presented in a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub filename: String,
    pub similarity_score: f32,
    pub chunk_index: u32,
    pub content_preview: String,
}

impl From<&RetrievedChunk> for SourceRef {
    fn from(chunk: &RetrievedChunk) -> Self {
        Self {
            filename: chunk.filename.clone(),
            similarity_score: chunk.similarity_score,
            chunk_index: chunk.chunk_index,
            content_preview: preview(&chunk.content),
        }
    }
}

/// First 200 characters of a chunk, with an ellipsis when cut
fn preview(content: &str) -> String {
    match content.char_indices().nth(PREVIEW_CHARS) {
        Some((byte_pos, _)) => format!("{}...", &content[..byte_pos]),
        None => content.to_string(),
    }
}

/// Final answer returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub answer: String,
    /// 0.0-1.0 after merging with the completeness score
    pub confidence: f32,
    pub confidence_level: ConfidenceLevel,
    pub sources: Vec<SourceRef>,
    pub missing_info: Vec<MissingInfoItem>,
    pub enrichment_suggestions: Vec<EnrichmentSuggestion>,
    /// Wall-clock seconds from request entry to response
    pub processing_time: f64,
}

impl SearchResponse {
    /// Response when retrieval found nothing to answer from
    pub fn empty(processing_time: f64) -> Self {
        Self {
            answer: "I couldn't find any relevant documents to answer your question. \
                     Please upload some documents first."
                .to_string(),
            confidence: 0.0,
            confidence_level: ConfidenceLevel::Low,
            sources: Vec::new(),
            missing_info: vec![MissingInfoItem::new(
                MissingInfoKind::Document,
                "No relevant documents found in the knowledge base",
                "Upload documents related to your question",
                5,
            )],
            enrichment_suggestions: vec![EnrichmentSuggestion::new(
                "document_upload",
                "Upload relevant documents to the knowledge base",
                "Use the document upload feature to add files related to your question",
                1.0,
                Effort::Low,
            )],
            processing_time,
        }
    }

    /// Minimal response for a failure the pipeline could not recover from
    pub fn error(message: impl std::fmt::Display, processing_time: f64) -> Self {
        Self {
            answer: format!("Error processing your query: {}", message),
            confidence: 0.0,
            confidence_level: ConfidenceLevel::Low,
            sources: Vec::new(),
            missing_info: Vec::new(),
            enrichment_suggestions: Vec::new(),
            processing_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_level_boundaries() {
        let thresholds = ConfidenceConfig::default();
        assert_eq!(ConfidenceLevel::from_score(0.8, &thresholds), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(0.79, &thresholds), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(0.6, &thresholds), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(0.59, &thresholds), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_score(0.0, &thresholds), ConfidenceLevel::Low);
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = ConfidenceConfig {
            high_threshold: 0.9,
            medium_threshold: 0.5,
        };
        assert_eq!(ConfidenceLevel::from_score(0.85, &thresholds), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(0.5, &thresholds), ConfidenceLevel::Medium);
    }

    #[test]
    fn test_priority_clamped() {
        assert_eq!(MissingInfoItem::new(MissingInfoKind::Data, "d", "a", 9).priority, 5);
        assert_eq!(MissingInfoItem::new(MissingInfoKind::Data, "d", "a", 0).priority, 1);
    }

    #[test]
    fn test_missing_info_wire_format() {
        let item = MissingInfoItem::new(MissingInfoKind::SpecificFact, "d", "a", 2);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "specific_fact");
        assert_eq!(MissingInfoKind::parse(" Specific_Fact "), Some(MissingInfoKind::SpecificFact));
        assert_eq!(MissingInfoKind::parse("rumor"), None);
    }

    #[test]
    fn test_preview_truncation() {
        let short = RetrievedChunk {
            id: "c".into(),
            content: "short text".into(),
            similarity_score: 0.9,
            filename: "a.txt".into(),
            chunk_index: 0,
        };
        assert_eq!(SourceRef::from(&short).content_preview, "short text");

        let long = RetrievedChunk {
            content: "é".repeat(250),
            ..short
        };
        let preview = SourceRef::from(&long).content_preview;
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 203);
    }

    #[test]
    fn test_empty_response_shape() {
        let response = SearchResponse::empty(0.01);
        assert_eq!(response.confidence, 0.0);
        assert_eq!(response.confidence_level, ConfidenceLevel::Low);
        assert!(response.sources.is_empty());
        assert_eq!(response.missing_info.len(), 1);
        assert_eq!(response.missing_info[0].kind, MissingInfoKind::Document);
        assert_eq!(response.missing_info[0].priority, 5);
    }
}
