//! Configuration for the RAG system

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::generation::enrichment::{EnrichmentRule, MAX_SUGGESTIONS};

/// Main RAG system configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Upload validation
    pub upload: UploadConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Embedding configuration
    pub embeddings: EmbeddingConfig,
    /// LLM configuration
    pub llm: LlmConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Confidence merge weights
    pub scoring: ScoringConfig,
    /// Confidence level thresholds
    pub confidence: ConfidenceConfig,
    /// Enrichment advisor rules
    pub enrichment: EnrichmentConfig,
    /// Vector index persistence
    pub storage: StorageConfig,
}

impl RagConfig {
    /// Load configuration from `.env`, an optional TOML file named by
    /// `RAG_CONFIG`, and environment overrides
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut config = match std::env::var("RAG_CONFIG") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML configuration file; missing sections take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.trim().is_empty() {
                self.llm.api_key = Some(key);
            }
        }

        if let Ok(url) = std::env::var("OLLAMA_BASE_URL") {
            self.embeddings.base_url = url.clone();
            if self.llm.backend == LlmBackend::Ollama {
                self.llm.base_url = url;
            }
        }

        if let Ok(port) = std::env::var("RAG_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| Error::Config(format!("RAG_PORT must be a valid port, got '{}'", port)))?;
        }

        Ok(())
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }

        if self.confidence.medium_threshold > self.confidence.high_threshold {
            return Err(Error::Config(
                "confidence.medium_threshold must not exceed confidence.high_threshold".to_string(),
            ));
        }

        if self.enrichment.max_suggestions > MAX_SUGGESTIONS {
            return Err(Error::Config(format!(
                "enrichment.max_suggestions ({}) must not exceed {}",
                self.enrichment.max_suggestions, MAX_SUGGESTIONS
            )));
        }

        if self.retrieval.top_k == 0 {
            return Err(Error::Config("retrieval.top_k must be at least 1".to_string()));
        }

        if self.llm.backend == LlmBackend::OpenAi && self.llm.api_key.is_none() {
            return Err(Error::Config(
                "OpenAI backend selected but no API key configured (set OPENAI_API_KEY)".to_string(),
            ));
        }

        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
        }
    }
}

/// Upload validation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Maximum upload size in bytes (default: 10MB)
    pub max_file_size: usize,
    /// Accepted file extensions, lowercase with leading dot
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
            allowed_extensions: [".pdf", ".txt", ".docx", ".xlsx", ".csv"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl UploadConfig {
    /// Check whether a filename carries an accepted extension
    pub fn is_allowed(&self, filename: &str) -> bool {
        match extension_of(filename) {
            Some(ext) => self.allowed_extensions.iter().any(|a| a.eq_ignore_ascii_case(&ext)),
            None => false,
        }
    }
}

/// Lowercase extension including the leading dot
pub fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Embedding configuration (Ollama)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub model: String,
    /// Embedding dimensions (768 for nomic-embed-text)
    pub dimensions: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "nomic-embed-text".to_string(),
            dimensions: 768,
            timeout_secs: 30,
            max_retries: 2,
        }
    }
}

/// Which service answers completion requests
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackend {
    /// Local Ollama server
    #[default]
    Ollama,
    /// OpenAI-compatible chat completions API
    #[serde(rename = "openai")]
    OpenAi,
}

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Backend selection
    pub backend: LlmBackend,
    /// Base URL of the backend API
    pub base_url: String,
    /// API key (OpenAI backend only)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Generation model name
    pub model: String,
    /// Temperature for answer generation
    pub temperature: f32,
    /// Token limit for answer generation
    pub max_tokens: u32,
    /// Temperature for the completeness critique
    pub analysis_temperature: f32,
    /// Token limit for the completeness critique
    pub analysis_max_tokens: u32,
    /// Per-call timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: LlmBackend::Ollama,
            base_url: "http://localhost:11434".to_string(),
            api_key: None,
            model: "llama3.2:3b".to_string(),
            temperature: 0.1,
            max_tokens: 2000,
            analysis_temperature: 0.1,
            analysis_max_tokens: 1000,
            timeout_secs: 120,
            max_retries: 2,
        }
    }
}

impl LlmConfig {
    /// Per-call timeout as a duration
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of chunks to retrieve per query
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

/// Weights for blending model confidence with the completeness score
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Weight of the answer generator's own confidence
    pub answer_weight: f32,
    /// Weight of the completeness score
    pub completeness_weight: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            answer_weight: 0.7,
            completeness_weight: 0.3,
        }
    }
}

/// Thresholds mapping a confidence number to a level
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    /// At or above: high
    pub high_threshold: f32,
    /// At or above: medium
    pub medium_threshold: f32,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            high_threshold: 0.8,
            medium_threshold: 0.6,
        }
    }
}

/// Enrichment advisor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Maximum suggestions returned per query
    pub max_suggestions: usize,
    /// Rules, evaluated in order
    pub rules: Vec<EnrichmentRule>,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            max_suggestions: 5,
            rules: EnrichmentRule::defaults(),
        }
    }
}

/// Vector index persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON snapshot of the vector index; `None` keeps it in memory only
    pub index_path: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let index_path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("enrich-rag")
            .join("index.json");

        Self {
            index_path: Some(index_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = RagConfig::default();
        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.chunking.chunk_overlap, 200);
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.upload.max_file_size, 10 * 1024 * 1024);
        assert!((config.scoring.answer_weight - 0.7).abs() < f32::EPSILON);
        assert!((config.confidence.high_threshold - 0.8).abs() < f32::EPSILON);
        assert_eq!(config.enrichment.max_suggestions, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RagConfig::from_toml_str(
            r#"
            [confidence]
            high_threshold = 0.9

            [llm]
            model = "phi3"
            "#,
        )
        .unwrap();

        assert!((config.confidence.high_threshold - 0.9).abs() < f32::EPSILON);
        assert!((config.confidence.medium_threshold - 0.6).abs() < f32::EPSILON);
        assert_eq!(config.llm.model, "phi3");
        assert_eq!(config.llm.max_tokens, 2000);
        assert_eq!(config.enrichment.rules.len(), 4);
    }

    #[test]
    fn test_validate_rejects_bad_overlap() {
        let mut config = RagConfig::default();
        config.chunking.chunk_overlap = config.chunking.chunk_size;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bounds_suggestion_cap() {
        let config = RagConfig::from_toml_str("[enrichment]\nmax_suggestions = 9").unwrap();
        assert!(config.validate().is_err());

        let config = RagConfig::from_toml_str("[enrichment]\nmax_suggestions = 5").unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_openai_requires_key() {
        let mut config = RagConfig::default();
        config.llm.backend = LlmBackend::OpenAi;
        assert!(config.validate().is_err());
        config.llm.api_key = Some("sk-test".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_upload_extension_check() {
        let upload = UploadConfig::default();
        assert!(upload.is_allowed("report.PDF"));
        assert!(upload.is_allowed("notes.txt"));
        assert!(!upload.is_allowed("slides.pptx"));
        assert!(!upload.is_allowed("README"));
    }
}
