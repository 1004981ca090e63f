//! Enrichment advice: which documents would close the gaps in an answer
//!
//! The advisor runs a pluggable [`EnrichmentStrategy`] and then enforces the
//! response contract: suggestion types are unique (first wins) and the list
//! is capped. The default strategy evaluates configurable rules in order.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::EnrichmentConfig;
use crate::types::{Effort, EnrichmentSuggestion, MissingInfoItem, MissingInfoKind};

const FALLBACK_ACTION: &str = "Find relevant documents";

/// Hard upper bound on suggestions in any response
pub const MAX_SUGGESTIONS: usize = 5;

/// Fixed suggestion emitted by a keyword rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionTemplate {
    #[serde(rename = "type")]
    pub suggestion_type: String,
    pub description: String,
    pub action: String,
    pub confidence: f32,
    pub estimated_effort: Effort,
}

impl SuggestionTemplate {
    fn to_suggestion(&self) -> EnrichmentSuggestion {
        EnrichmentSuggestion::new(
            self.suggestion_type.clone(),
            self.description.clone(),
            self.action.clone(),
            self.confidence,
            self.estimated_effort,
        )
    }
}

/// One enrichment heuristic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum EnrichmentRule {
    /// Fires when any keyword occurs in the lower-cased query
    QueryKeywords {
        keywords: Vec<String>,
        suggestion: SuggestionTemplate,
    },
    /// Fires once per missing-info item of the given kind
    MissingInfo {
        kind: MissingInfoKind,
        #[serde(rename = "type")]
        suggestion_type: String,
        confidence: f32,
        estimated_effort: Effort,
    },
}

impl EnrichmentRule {
    /// Built-in rule set
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::keywords(
                &["how", "process", "steps", "procedure"],
                "procedure_document",
                "Step-by-step procedure or manual",
                "Upload procedure documents, user manuals, or process guides",
                0.8,
                Effort::Medium,
            ),
            Self::keywords(
                &["what", "definition", "meaning", "is"],
                "reference_document",
                "Glossary, definitions, or reference material",
                "Upload reference documents, glossaries, or specification sheets",
                0.7,
                Effort::Low,
            ),
            Self::keywords(
                &["when", "date", "time", "schedule"],
                "temporal_document",
                "Timeline, schedule, or date-specific information",
                "Upload schedules, timelines, or historical records",
                0.8,
                Effort::Medium,
            ),
            Self::MissingInfo {
                kind: MissingInfoKind::SpecificFact,
                suggestion_type: "factual_document".to_string(),
                confidence: 0.6,
                estimated_effort: Effort::High,
            },
        ]
    }

    fn keywords(
        keywords: &[&str],
        suggestion_type: &str,
        description: &str,
        action: &str,
        confidence: f32,
        estimated_effort: Effort,
    ) -> Self {
        Self::QueryKeywords {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            suggestion: SuggestionTemplate {
                suggestion_type: suggestion_type.to_string(),
                description: description.to_string(),
                action: action.to_string(),
                confidence,
                estimated_effort,
            },
        }
    }

    /// Suggestions this rule produces for a query and its gaps
    pub fn apply(&self, query_lower: &str, missing_info: &[MissingInfoItem]) -> Vec<EnrichmentSuggestion> {
        match self {
            Self::QueryKeywords { keywords, suggestion } => {
                // Substring match, so "is" also fires inside "this"
                if keywords.iter().any(|k| query_lower.contains(&k.to_lowercase())) {
                    vec![suggestion.to_suggestion()]
                } else {
                    Vec::new()
                }
            }
            Self::MissingInfo {
                kind,
                suggestion_type,
                confidence,
                estimated_effort,
            } => missing_info
                .iter()
                .filter(|item| item.kind == *kind)
                .map(|item| {
                    let action = if item.suggested_action.trim().is_empty() {
                        FALLBACK_ACTION
                    } else {
                        item.suggested_action.as_str()
                    };
                    EnrichmentSuggestion::new(
                        suggestion_type.clone(),
                        format!("Document containing: {}", item.description),
                        action,
                        *confidence,
                        *estimated_effort,
                    )
                })
                .collect(),
        }
    }
}

/// Source of raw (not yet deduplicated) enrichment suggestions
pub trait EnrichmentStrategy: Send + Sync {
    /// Propose suggestions for a query and the gaps found in its answer
    fn suggest(&self, query: &str, missing_info: &[MissingInfoItem]) -> Vec<EnrichmentSuggestion>;

    /// Strategy name for logging
    fn name(&self) -> &str;
}

/// Evaluates rules in order; every rule may fire
#[derive(Debug, Clone)]
pub struct RuleBasedStrategy {
    rules: Vec<EnrichmentRule>,
}

impl RuleBasedStrategy {
    pub fn new(rules: Vec<EnrichmentRule>) -> Self {
        Self { rules }
    }
}

impl Default for RuleBasedStrategy {
    fn default() -> Self {
        Self::new(EnrichmentRule::defaults())
    }
}

impl EnrichmentStrategy for RuleBasedStrategy {
    fn suggest(&self, query: &str, missing_info: &[MissingInfoItem]) -> Vec<EnrichmentSuggestion> {
        let query_lower = query.to_lowercase();
        self.rules
            .iter()
            .flat_map(|rule| rule.apply(&query_lower, missing_info))
            .collect()
    }

    fn name(&self) -> &str {
        "rule-based"
    }
}

/// Produces the final, deduplicated and capped suggestion list
pub struct EnrichmentAdvisor {
    strategy: Box<dyn EnrichmentStrategy>,
    max_suggestions: usize,
}

impl EnrichmentAdvisor {
    /// Create an advisor over any strategy; the cap never exceeds [`MAX_SUGGESTIONS`]
    pub fn new(strategy: Box<dyn EnrichmentStrategy>, max_suggestions: usize) -> Self {
        Self {
            strategy,
            max_suggestions: max_suggestions.min(MAX_SUGGESTIONS),
        }
    }

    /// Rule-based advisor from configuration
    pub fn from_config(config: &EnrichmentConfig) -> Self {
        Self::new(
            Box::new(RuleBasedStrategy::new(config.rules.clone())),
            config.max_suggestions,
        )
    }

    /// Suggestions with unique types, first occurrence kept, at most the cap
    pub fn advise(&self, query: &str, missing_info: &[MissingInfoItem]) -> Vec<EnrichmentSuggestion> {
        let mut seen = HashSet::new();
        let suggestions: Vec<EnrichmentSuggestion> = self
            .strategy
            .suggest(query, missing_info)
            .into_iter()
            .filter(|s| seen.insert(s.suggestion_type.clone()))
            .take(self.max_suggestions)
            .collect();

        tracing::debug!(
            "{} produced {} enrichment suggestions",
            self.strategy.name(),
            suggestions.len()
        );
        suggestions
    }
}
