//! Provider abstractions for embeddings and answer generation
//!
//! Trait-based seams so the pipeline can run against a local Ollama server
//! in production and deterministic stubs in tests.

pub mod embedding;
pub mod llm;
pub mod ollama;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use ollama::{OllamaClient, OllamaEmbedder, OllamaLlm};
