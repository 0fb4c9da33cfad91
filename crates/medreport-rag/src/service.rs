//! Core service surface consumed by the routing layer:
//! upload / ask / delete_report / delete_user

use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::config::RagConfig;
use crate::error::Result;
use crate::generation::{resolve_citations, AnswerEngine};
use crate::index::UserIndexManager;
use crate::ingestion::TextChunker;
use crate::providers::{EmbeddingProvider, LlmProvider};
use crate::retrieval::Retriever;
use crate::types::{ChatResponse, ChunkMetadata, ReportChunk, UploadStatus};

/// What happened when a report was stored
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    /// Indexed, unchanged, or updated
    pub status: UploadStatus,
    /// Number of chunks written to the index (zero for unchanged uploads)
    pub chunk_count: usize,
}

/// The retrieval-augmented citation pipeline behind the HTTP surface.
///
/// Owns the chunker, the per-user index, and the answering engine; the
/// routing layer holds one `RagService` per process and calls it from
/// request handlers.
pub struct RagService {
    chunker: TextChunker,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<UserIndexManager>,
    engine: AnswerEngine,
}

impl RagService {
    /// Wire the pipeline from configuration and the two model providers
    pub fn new(
        config: &RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Result<Self> {
        let index = Arc::new(UserIndexManager::new(&config.index)?);
        let retriever = Retriever::new(
            Arc::clone(&index),
            Arc::clone(&embedder),
            config.retrieval.top_k,
        );
        let engine = AnswerEngine::new(Arc::clone(&index), retriever, llm);

        Ok(Self {
            chunker: TextChunker::from_config(&config.chunking),
            embedder,
            index,
            engine,
        })
    }

    /// Chunk, embed, and index extracted report text for one user.
    ///
    /// Re-uploading a report id with identical text is detected by content
    /// hash and skipped; the same id with different text replaces the old
    /// chunks.
    pub async fn upload(
        &self,
        user_id: &str,
        report_id: &str,
        filename: &str,
        text: &str,
        metadata: ChunkMetadata,
    ) -> Result<UploadOutcome> {
        let content_hash = hex::encode(Sha256::digest(text.as_bytes()));

        let status = match self.index.report_hash(user_id, report_id)? {
            Some(existing) if existing == content_hash => {
                tracing::info!(user_id, report_id, "identical report already indexed, skipping");
                return Ok(UploadOutcome {
                    status: UploadStatus::Unchanged,
                    chunk_count: 0,
                });
            }
            Some(_) => {
                let removed = self.index.delete_by_report(user_id, report_id)?;
                tracing::info!(user_id, report_id, removed, "report content changed, old chunks replaced");
                UploadStatus::Updated
            }
            None => UploadStatus::Indexed,
        };

        let pieces = self.chunker.split(text);
        if pieces.is_empty() {
            // Zero-chunk documents are valid; the collection still comes
            // into existence on first upload.
            self.index.ensure(user_id)?;
            tracing::warn!(user_id, report_id, "report produced no text chunks");
            return Ok(UploadOutcome {
                status,
                chunk_count: 0,
            });
        }

        let embeddings = self.embedder.embed_batch(&pieces).await?;

        let chunks: Vec<ReportChunk> = pieces
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(idx, (content, embedding))| ReportChunk {
                chunk_index: idx as u32,
                report_id: report_id.to_string(),
                user_id: user_id.to_string(),
                content,
                embedding,
                content_hash: content_hash.clone(),
                metadata: metadata.clone(),
            })
            .collect();

        let chunk_count = chunks.len();
        self.index.upsert(user_id, chunks)?;

        tracing::info!(user_id, report_id, filename, chunk_count, "report indexed");
        Ok(UploadOutcome {
            status,
            chunk_count,
        })
    }

    /// Answer a question grounded in the user's uploaded reports
    pub async fn ask(&self, user_id: &str, question: &str) -> Result<ChatResponse> {
        let outcome = self.engine.answer(user_id, question).await?;
        Ok(resolve_citations(&outcome.raw_answer, &outcome.retrieved))
    }

    /// Remove one report's chunks from the user's collection, returning how
    /// many chunks were removed
    pub async fn delete_report(&self, user_id: &str, report_id: &str) -> Result<usize> {
        self.index.delete_by_report(user_id, report_id)
    }

    /// Destroy the user's entire collection as part of account deletion.
    ///
    /// Failure here is logged and surfaced so the caller's remaining
    /// cleanup steps can proceed while the overall outcome still reflects
    /// the partial failure.
    pub async fn delete_user(&self, user_id: &str) -> Result<()> {
        self.index.delete_all(user_id).map_err(|e| {
            tracing::error!(user_id, error = %e, "account cleanup could not remove vector collection");
            e
        })
    }

    /// Access the underlying per-user index
    pub fn index(&self) -> &Arc<UserIndexManager> {
        &self.index
    }
}
