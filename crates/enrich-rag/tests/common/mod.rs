//! Deterministic providers for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use enrich_rag::config::RagConfig;
use enrich_rag::providers::{
    CompletionOptions, EmbeddingProvider, InMemoryVectorStore, LlmProvider, VectorRecord,
    VectorStoreProvider,
};
use enrich_rag::types::ChunkMetadata;
use enrich_rag::{Error, RagPipeline, Result};

/// Embeds text onto three topic axes: pumps, valves, everything else
pub struct TopicEmbedder {
    pub fail: bool,
}

#[async_trait]
impl EmbeddingProvider for TopicEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if self.fail {
            return Err(Error::embedding("embedding service unreachable"));
        }
        let text = text.to_lowercase();
        let pump = if text.contains("pump") { 1.0 } else { 0.0 };
        let valve = if text.contains("valve") { 1.0 } else { 0.0 };
        Ok(vec![pump, valve, 0.1])
    }

    fn dimensions(&self) -> usize {
        3
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(!self.fail)
    }

    fn name(&self) -> &str {
        "topic"
    }
}

/// How the scripted model behaves for one kind of prompt
#[derive(Clone)]
pub enum Reply {
    Text(String),
    Fail,
    Hang,
}

/// Model that answers answer prompts and review prompts from a script
pub struct ScriptedLlm {
    pub answer: Reply,
    pub review: Reply,
    pub calls: AtomicUsize,
}

impl ScriptedLlm {
    pub fn new(answer: Reply, review: Reply) -> Self {
        Self {
            answer,
            review,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn complete(&self, prompt: &str, _options: CompletionOptions) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = if prompt.contains("\"completeness_score\"") {
            &self.review
        } else {
            &self.answer
        };

        match reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail => Err(Error::llm("model overloaded")),
            Reply::Hang => std::future::pending().await,
        }
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-1"
    }
}

pub const ANSWER_JSON: &str = r#"Sure, here is the JSON:
{
    "answer": "Hold the reset button for five seconds, then restart the pump.",
    "confidence": 0.9,
    "missing_info": [
        {"type": "specific_fact", "description": "Reset button location", "suggested_action": "Check the wiring diagram", "priority": 4}
    ],
    "enrichment_suggestions": [
        {"type": "ignored", "description": "d", "action": "a", "confidence": 0.9, "estimated_effort": "low"}
    ]
}"#;

pub const REVIEW_JSON: &str = r#"{
    "completeness_score": 0.5,
    "missing_aspects": ["Restart interval"],
    "confidence_issues": [],
    "suggested_improvements": ["Cite the manual section"]
}"#;

/// Configuration with no on-disk index
pub fn test_config() -> RagConfig {
    let mut config = RagConfig::default();
    config.storage.index_path = None;
    config
}

fn record(id: &str, filename: &str, embedding: Vec<f32>, text: &str) -> VectorRecord {
    VectorRecord {
        id: id.to_string(),
        embedding,
        document: text.to_string(),
        metadata: ChunkMetadata {
            filename: filename.to_string(),
            chunk_index: 0,
            total_chunks: 1,
            upload_date: chrono::Utc::now(),
            content_type: "text/plain".to_string(),
            file_size: text.len() as u64,
            content_hash: String::new(),
        },
    }
}

/// Store holding one pump chunk and one valve chunk
pub async fn seeded_store() -> Arc<InMemoryVectorStore> {
    let store = Arc::new(InMemoryVectorStore::new());
    store
        .add(vec![
            record(
                "pump_chunk_0",
                "pump-manual.txt",
                vec![1.0, 0.0, 0.1],
                "To reset the pump, hold the reset button for five seconds.",
            ),
            record(
                "valve_chunk_0",
                "valves.txt",
                vec![0.0, 1.0, 0.1],
                "Valves are inspected every quarter.",
            ),
        ])
        .await
        .expect("seed store");
    store
}

/// Pipeline over the seeded store and a scripted model
pub async fn pipeline(config: &RagConfig, llm: Arc<ScriptedLlm>) -> RagPipeline {
    RagPipeline::new(
        config,
        Arc::new(TopicEmbedder { fail: false }),
        seeded_store().await,
        llm,
    )
}

pub fn happy_llm() -> Arc<ScriptedLlm> {
    Arc::new(ScriptedLlm::new(
        Reply::Text(ANSWER_JSON.to_string()),
        Reply::Text(REVIEW_JSON.to_string()),
    ))
}
