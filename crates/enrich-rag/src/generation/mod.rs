//! Answer generation, completeness review, and enrichment advice

pub mod answer;
pub mod completeness;
pub mod enrichment;
pub mod merge;
pub mod output;
pub mod pipeline;
pub mod prompt;

use std::time::Duration;

use crate::error::{Error, Result};
use crate::providers::{CompletionOptions, LlmProvider};

pub use answer::{AnswerDraft, AnswerGenerator};
pub use completeness::{CompletenessAnalyzer, CompletenessReport};
pub use enrichment::{EnrichmentAdvisor, EnrichmentRule, EnrichmentStrategy, RuleBasedStrategy};
pub use merge::merge_completeness;
pub use output::StructuredOutputParser;
pub use pipeline::RagPipeline;
pub use prompt::PromptBuilder;

/// One model call bounded by a deadline; a timeout is reported as an error
pub(crate) async fn complete_with_timeout(
    llm: &dyn LlmProvider,
    prompt: &str,
    options: CompletionOptions,
    timeout: Duration,
    operation: &str,
) -> Result<String> {
    match tokio::time::timeout(timeout, llm.complete(prompt, options)).await {
        Ok(result) => result,
        Err(_) => Err(Error::timeout(operation, timeout.as_secs())),
    }
}
