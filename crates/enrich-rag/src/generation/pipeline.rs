//! End-to-end query pipeline: retrieve, answer, review, advise

use std::sync::Arc;
use std::time::Instant;

use crate::config::{ConfidenceConfig, RagConfig, ScoringConfig};
use crate::error::Result;
use crate::providers::{EmbeddingProvider, LlmProvider, VectorStoreProvider};
use crate::retrieval::Retriever;
use crate::types::{ConfidenceLevel, SearchResponse, SourceRef};

use super::answer::AnswerGenerator;
use super::completeness::CompletenessAnalyzer;
use super::enrichment::EnrichmentAdvisor;
use super::merge::merge_completeness;
use super::prompt::PromptBuilder;

/// Knowledge-base question answering with completeness scoring
///
/// Holds no mutable state; concurrent queries share one instance.
pub struct RagPipeline {
    retriever: Retriever,
    generator: AnswerGenerator,
    analyzer: CompletenessAnalyzer,
    advisor: EnrichmentAdvisor,
    scoring: ScoringConfig,
    thresholds: ConfidenceConfig,
    top_k: usize,
}

impl RagPipeline {
    /// Wire the pipeline from configuration and shared providers
    pub fn new(
        config: &RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStoreProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Self {
        Self {
            retriever: Retriever::new(embedder, store),
            generator: AnswerGenerator::new(llm.clone(), &config.llm),
            analyzer: CompletenessAnalyzer::new(llm, &config.llm),
            advisor: EnrichmentAdvisor::from_config(&config.enrichment),
            scoring: config.scoring,
            thresholds: config.confidence,
            top_k: config.retrieval.top_k,
        }
    }

    /// Replace the enrichment advisor
    pub fn with_advisor(mut self, advisor: EnrichmentAdvisor) -> Self {
        self.advisor = advisor;
        self
    }

    /// Answer a query from the knowledge base; always returns a response
    ///
    /// Completeness review runs when either flag is set, enrichment only when
    /// `include_enrichment` is set.
    pub async fn search_and_answer(
        &self,
        query: &str,
        include_confidence: bool,
        include_enrichment: bool,
    ) -> SearchResponse {
        let start = Instant::now();

        let response = match self
            .answer(query, include_confidence, include_enrichment, start)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Query failed: {}", e);
                SearchResponse::error(e, start.elapsed().as_secs_f64())
            }
        };

        tracing::info!(
            confidence = response.confidence,
            level = ?response.confidence_level,
            sources = response.sources.len(),
            "Answered query in {:.2}s",
            response.processing_time
        );
        response
    }

    async fn answer(
        &self,
        query: &str,
        include_confidence: bool,
        include_enrichment: bool,
        start: Instant,
    ) -> Result<SearchResponse> {
        let chunks = self.retriever.search(query, self.top_k).await?;
        if chunks.is_empty() {
            tracing::info!("No documents matched the query");
            return Ok(SearchResponse::empty(start.elapsed().as_secs_f64()));
        }

        let context = PromptBuilder::build_context(&chunks);
        let mut draft = self.generator.generate(query, &context).await;

        if include_confidence || include_enrichment {
            let report = self.analyzer.analyze(query, &draft.answer, &context).await;
            merge_completeness(&mut draft, &report, &self.scoring);
        }

        if include_enrichment {
            draft.enrichment_suggestions = self.advisor.advise(query, &draft.missing_info);
        }

        Ok(SearchResponse {
            confidence_level: ConfidenceLevel::from_score(draft.confidence, &self.thresholds),
            answer: draft.answer,
            confidence: draft.confidence,
            sources: chunks.iter().map(SourceRef::from).collect(),
            missing_info: draft.missing_info,
            enrichment_suggestions: draft.enrichment_suggestions,
            processing_time: start.elapsed().as_secs_f64(),
        })
    }
}
