//! Structured answer generation

use serde_json::{Map, Value};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use crate::config::LlmConfig;
use crate::providers::{CompletionOptions, LlmProvider};
use crate::types::{EnrichmentSuggestion, MissingInfoItem, MissingInfoKind};

use super::output::{self, StructuredOutputParser};
use super::prompt::PromptBuilder;
use super::complete_with_timeout;

/// Answer text used when the model omitted one
pub const DEFAULT_ANSWER: &str = "I couldn't generate a proper answer.";

/// Confidence of a degraded answer after a failed model call
pub const DEGRADED_CONFIDENCE: f32 = 0.3;

const DEFAULT_PRIORITY: i64 = 3;

/// The model's answer with its self-assessment, before completeness merging
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerDraft {
    pub answer: String,
    /// 0.0-1.0
    pub confidence: f32,
    pub missing_info: Vec<MissingInfoItem>,
    pub enrichment_suggestions: Vec<EnrichmentSuggestion>,
}

impl AnswerDraft {
    /// Decode a parsed mapping field by field; absent or mistyped fields take defaults
    ///
    /// Suggestions proposed by the model are not carried over.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let missing_info = output::object_list_field(map, "missing_info")
            .into_iter()
            .map(missing_info_from_map)
            .collect();

        Self {
            answer: output::str_field(map, "answer")
                .unwrap_or(DEFAULT_ANSWER)
                .to_string(),
            confidence: output::f32_field(map, "confidence")
                .unwrap_or(output::FALLBACK_CONFIDENCE)
                .clamp(0.0, 1.0),
            missing_info,
            enrichment_suggestions: Vec::new(),
        }
    }

    /// Draft returned when the model call itself failed
    pub fn degraded(error: impl Display) -> Self {
        Self {
            answer: format!(
                "Based on the available documents, I found some relevant information, \
                 but encountered an error processing the structured response: {}",
                error
            ),
            confidence: DEGRADED_CONFIDENCE,
            missing_info: Vec::new(),
            enrichment_suggestions: Vec::new(),
        }
    }
}

fn missing_info_from_map(item: &Map<String, Value>) -> MissingInfoItem {
    MissingInfoItem::new(
        output::str_field(item, "type")
            .and_then(MissingInfoKind::parse)
            .unwrap_or(MissingInfoKind::Context),
        output::str_field(item, "description").unwrap_or_default(),
        output::str_field(item, "suggested_action").unwrap_or_default(),
        output::i64_field(item, "priority").unwrap_or(DEFAULT_PRIORITY),
    )
}

/// Asks the model for a grounded, self-assessed answer
pub struct AnswerGenerator {
    llm: Arc<dyn LlmProvider>,
    options: CompletionOptions,
    timeout: Duration,
}

impl AnswerGenerator {
    /// Create a generator using the answer sampling settings
    pub fn new(llm: Arc<dyn LlmProvider>, config: &LlmConfig) -> Self {
        Self {
            llm,
            options: CompletionOptions {
                temperature: config.temperature,
                max_tokens: config.max_tokens,
            },
            timeout: config.timeout(),
        }
    }

    /// Generate a draft; never fails
    pub async fn generate(&self, question: &str, context: &str) -> AnswerDraft {
        let prompt = PromptBuilder::answer_prompt(question, context);
        tracing::debug!("Answer prompt: {} chars", prompt.len());

        match complete_with_timeout(self.llm.as_ref(), &prompt, self.options, self.timeout, "answer generation").await {
            Ok(text) => AnswerDraft::from_map(&StructuredOutputParser::parse(&text)),
            Err(e) => {
                tracing::warn!("Answer generation failed: {}", e);
                AnswerDraft::degraded(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_map_full() {
        let map = json!({
            "answer": "Reset with the red button.",
            "confidence": 0.85,
            "missing_info": [
                {"type": "specific_fact", "description": "Reset timeout", "suggested_action": "Check manual", "priority": 4}
            ],
            "enrichment_suggestions": [
                {"type": "manual", "description": "d", "action": "a", "confidence": 0.9, "estimated_effort": "low"}
            ]
        });
        let draft = AnswerDraft::from_map(map.as_object().unwrap());

        assert_eq!(draft.answer, "Reset with the red button.");
        assert!((draft.confidence - 0.85).abs() < 1e-6);
        assert_eq!(draft.missing_info.len(), 1);
        assert_eq!(draft.missing_info[0].kind, MissingInfoKind::SpecificFact);
        assert_eq!(draft.missing_info[0].priority, 4);
        assert!(draft.enrichment_suggestions.is_empty());
    }

    #[test]
    fn test_from_map_defaults() {
        let map = json!({
            "confidence": 7,
            "missing_info": [{"type": "gossip", "priority": 99}, "not an object", {}]
        });
        let draft = AnswerDraft::from_map(map.as_object().unwrap());

        assert_eq!(draft.answer, DEFAULT_ANSWER);
        assert_eq!(draft.confidence, 1.0);
        assert_eq!(draft.missing_info.len(), 2);
        assert_eq!(draft.missing_info[0].kind, MissingInfoKind::Context);
        assert_eq!(draft.missing_info[0].priority, 5);
        assert_eq!(draft.missing_info[1].priority, 3);
        assert_eq!(draft.missing_info[1].description, "");
    }

    #[test]
    fn test_from_map_wrong_types() {
        let map = json!({"answer": 42, "confidence": "high", "missing_info": "none"});
        let draft = AnswerDraft::from_map(map.as_object().unwrap());

        assert_eq!(draft.answer, DEFAULT_ANSWER);
        assert_eq!(draft.confidence, 0.5);
        assert!(draft.missing_info.is_empty());
    }

    #[test]
    fn test_degraded_draft() {
        let draft = AnswerDraft::degraded("LLM error: connection refused");
        assert_eq!(draft.confidence, 0.3);
        assert!(draft.answer.starts_with("Based on the available documents"));
        assert!(draft.answer.ends_with("structured response: LLM error: connection refused"));
    }
}
