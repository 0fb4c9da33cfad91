//! Configuration for the medical-report RAG system

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main RAG system configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Embedding configuration
    #[serde(default)]
    pub embeddings: EmbeddingConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Ollama/LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Per-user vector index configuration
    #[serde(default)]
    pub index: IndexConfig,
    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// OCR text-extraction service configuration
    #[serde(default)]
    pub ocr: OcrConfig,
}

impl RagConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::configuration(format!("invalid config file {}: {}", path.display(), e)))
    }

    /// Load from the given path, falling back to defaults when no file exists
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    /// Validate the configuration eagerly, before any collaborator is called.
    ///
    /// Missing credentials and nonsensical tuning values surface here as
    /// [`Error::ConfigurationMissing`] instead of failing mid-request.
    pub fn validate(&self) -> Result<()> {
        if self.embeddings.model.is_empty() {
            return Err(Error::configuration("embeddings.model is empty"));
        }
        if self.embeddings.dimensions == 0 {
            return Err(Error::configuration("embeddings.dimensions must be > 0"));
        }
        if self.chunking.chunk_size == 0 {
            return Err(Error::configuration("chunking.chunk_size must be > 0"));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::configuration(
                "chunking.chunk_overlap must be smaller than chunking.chunk_size",
            ));
        }
        if self.llm.generate_model.is_empty() {
            return Err(Error::configuration("llm.generate_model is empty"));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::configuration("retrieval.top_k must be > 0"));
        }
        if self.index.max_open_collections == 0 {
            return Err(Error::configuration("index.max_open_collections must be > 0"));
        }
        if self.ocr.endpoint.is_empty() {
            return Err(Error::configuration("ocr.endpoint is empty"));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 25MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_upload_size: 25 * 1024 * 1024,
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Embedding model name
    pub model: String,
    /// Embedding dimensions (768 for nomic-embed-text)
    ///
    /// The model and dimensionality must stay fixed for the lifetime of a
    /// user's collection; mixing models corrupts similarity comparisons.
    pub dimensions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "nomic-embed-text".to_string(),
            dimensions: 768,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
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

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Generation model name
    pub generate_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            generate_model: "llama3.2:3b".to_string(),
            temperature: 0.2,
            timeout_secs: 120,
            max_retries: 2,
        }
    }
}

/// Per-user vector index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Root directory for per-user collections (one subdirectory per user)
    pub storage_dir: PathBuf,
    /// Maximum number of collections kept open in memory at once.
    /// Least-recently-used collections are evicted past this bound.
    pub max_open_collections: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        let storage_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("medreport-rag")
            .join("collections");

        Self {
            storage_dir,
            max_open_collections: 64,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks retrieved per question
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

/// OCR text-extraction service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// OCR service endpoint URL
    pub endpoint: String,
    /// API key for the OCR service (optional for self-hosted deployments)
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: None,
            timeout_secs: 120,
        }
    }
}
