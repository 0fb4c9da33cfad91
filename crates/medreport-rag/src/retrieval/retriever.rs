//! Top-k retrieval over a user's vector collection

use std::sync::Arc;

use crate::error::Result;
use crate::index::{ScoredChunk, UserIndexManager};
use crate::providers::EmbeddingProvider;

/// Wraps the per-user index with a top-k similarity query contract.
///
/// Embeds the question and returns the `top_k` most similar chunks, best
/// first. A user with no collection gets an empty result.
pub struct Retriever {
    index: Arc<UserIndexManager>,
    embedder: Arc<dyn EmbeddingProvider>,
    top_k: usize,
}

impl Retriever {
    /// Create a new retriever
    pub fn new(
        index: Arc<UserIndexManager>,
        embedder: Arc<dyn EmbeddingProvider>,
        top_k: usize,
    ) -> Self {
        Self {
            index,
            embedder,
            top_k,
        }
    }

    /// Retrieve the chunks most similar to the question
    pub async fn retrieve(&self, user_id: &str, question: &str) -> Result<Vec<ScoredChunk>> {
        let query_embedding = self.embedder.embed(question).await?;
        self.index
            .similarity_search(user_id, &query_embedding, self.top_k)
    }

    /// Configured number of chunks per query
    pub fn top_k(&self) -> usize {
        self.top_k
    }
}
