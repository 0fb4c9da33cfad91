//! Application state for the RAG server

use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::ingestion::{OcrServiceClient, TextExtractor};
use crate::providers::{OllamaClient, OllamaEmbedder, OllamaLlm};
use crate::service::RagService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RagConfig,
    service: RagService,
    extractor: Arc<dyn TextExtractor>,
}

impl AppState {
    /// Create new application state.
    ///
    /// Configuration is validated and every collaborator client is
    /// constructed here, so missing credentials fail startup instead of the
    /// first request.
    pub fn new(config: RagConfig) -> Result<Self> {
        config.validate()?;

        let ollama = Arc::new(OllamaClient::new(&config.llm)?);
        let embedder = Arc::new(OllamaEmbedder::new(Arc::clone(&ollama), &config.embeddings));
        let llm = Arc::new(OllamaLlm::new(ollama, &config.llm));
        tracing::info!(
            embed_model = %config.embeddings.model,
            generate_model = %config.llm.generate_model,
            "Ollama providers initialized"
        );

        let extractor: Arc<dyn TextExtractor> =
            Arc::new(OcrServiceClient::new(config.ocr.clone())?);
        tracing::info!(endpoint = %config.ocr.endpoint, "OCR client initialized");

        let service = RagService::new(&config, embedder, llm)?;
        tracing::info!(
            storage_dir = %config.index.storage_dir.display(),
            "RAG service initialized"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                service,
                extractor,
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the RAG service
    pub fn service(&self) -> &RagService {
        &self.inner.service
    }

    /// Get the OCR text extractor
    pub fn extractor(&self) -> &Arc<dyn TextExtractor> {
        &self.inner.extractor
    }
}
