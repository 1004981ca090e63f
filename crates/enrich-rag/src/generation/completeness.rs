//! Second-pass review of how completely an answer covers the question

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use crate::config::LlmConfig;
use crate::providers::{CompletionOptions, LlmProvider};

use super::output::{self, StructuredOutputParser};
use super::prompt::PromptBuilder;
use super::complete_with_timeout;

/// Reviewer's assessment of an answer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletenessReport {
    /// 0.0-1.0
    pub completeness_score: f32,
    pub missing_aspects: Vec<String>,
    pub confidence_issues: Vec<String>,
    pub suggested_improvements: Vec<String>,
}

impl CompletenessReport {
    /// Decode a parsed mapping; absent or mistyped fields take defaults
    pub fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            completeness_score: output::f32_field(map, "completeness_score")
                .unwrap_or(output::FALLBACK_CONFIDENCE)
                .clamp(0.0, 1.0),
            missing_aspects: output::string_list_field(map, "missing_aspects"),
            confidence_issues: output::string_list_field(map, "confidence_issues"),
            suggested_improvements: output::string_list_field(map, "suggested_improvements"),
        }
    }

    /// Neutral report used when the review call failed
    pub fn failed(error: impl Display) -> Self {
        Self {
            completeness_score: output::FALLBACK_CONFIDENCE,
            missing_aspects: Vec::new(),
            confidence_issues: vec![format!("Error analyzing completeness: {}", error)],
            suggested_improvements: Vec::new(),
        }
    }
}

/// Asks the model to critique an answer against the question and context
pub struct CompletenessAnalyzer {
    llm: Arc<dyn LlmProvider>,
    options: CompletionOptions,
    timeout: Duration,
}

impl CompletenessAnalyzer {
    /// Create an analyzer using the review sampling settings
    pub fn new(llm: Arc<dyn LlmProvider>, config: &LlmConfig) -> Self {
        Self {
            llm,
            options: CompletionOptions {
                temperature: config.analysis_temperature,
                max_tokens: config.analysis_max_tokens,
            },
            timeout: config.timeout(),
        }
    }

    /// Review an answer; never fails
    pub async fn analyze(&self, question: &str, answer: &str, context: &str) -> CompletenessReport {
        let prompt = PromptBuilder::completeness_prompt(question, answer, context);

        match complete_with_timeout(self.llm.as_ref(), &prompt, self.options, self.timeout, "completeness analysis").await {
            Ok(text) => CompletenessReport::from_map(&StructuredOutputParser::parse(&text)),
            Err(e) => {
                tracing::warn!("Completeness analysis failed: {}", e);
                CompletenessReport::failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_map() {
        let map = json!({
            "completeness_score": 0.6,
            "missing_aspects": ["warranty terms", 5],
            "confidence_issues": ["date unclear"]
        });
        let report = CompletenessReport::from_map(map.as_object().unwrap());

        assert!((report.completeness_score - 0.6).abs() < 1e-6);
        assert_eq!(report.missing_aspects, vec!["warranty terms"]);
        assert_eq!(report.confidence_issues, vec!["date unclear"]);
        assert!(report.suggested_improvements.is_empty());
    }

    #[test]
    fn test_fallback_mapping_gives_neutral_score() {
        let report = CompletenessReport::from_map(&StructuredOutputParser::parse("not json"));
        assert_eq!(report.completeness_score, 0.5);
        assert!(report.missing_aspects.is_empty());
    }

    #[test]
    fn test_score_clamped() {
        let map = json!({"completeness_score": -2.0});
        assert_eq!(CompletenessReport::from_map(map.as_object().unwrap()).completeness_score, 0.0);
    }

    #[test]
    fn test_failed_report() {
        let report = CompletenessReport::failed("completion timed out after 5s");
        assert_eq!(report.completeness_score, 0.5);
        assert_eq!(
            report.confidence_issues,
            vec!["Error analyzing completeness: completion timed out after 5s"]
        );
    }
}
