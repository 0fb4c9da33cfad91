//! Grounded answering engine: retrieve, prompt, generate

use std::sync::Arc;

use crate::error::Result;
use crate::index::{ScoredChunk, UserIndexManager};
use crate::providers::LlmProvider;
use crate::retrieval::Retriever;

use super::prompt::PromptBuilder;

/// Fixed response for users who have not uploaded any documents yet.
/// A defined no-data outcome, not an error.
pub const NO_REPORTS_MESSAGE: &str = "I couldn't find any medical reports to reference. \
    Please upload your medical documents first so I can provide accurate information \
    about your health records.";

/// Raw answer plus the chunks it was generated from
#[derive(Debug)]
pub struct AnswerOutcome {
    /// Unmodified model output (or the fixed no-documents message)
    pub raw_answer: String,
    /// Retrieved chunks, best match first
    pub retrieved: Vec<ScoredChunk>,
}

/// Composes a constrained prompt over retrieved chunks and invokes the
/// generative model once per question.
pub struct AnswerEngine {
    index: Arc<UserIndexManager>,
    retriever: Retriever,
    llm: Arc<dyn LlmProvider>,
}

impl AnswerEngine {
    /// Create a new answering engine
    pub fn new(index: Arc<UserIndexManager>, retriever: Retriever, llm: Arc<dyn LlmProvider>) -> Self {
        Self {
            index,
            retriever,
            llm,
        }
    }

    /// Answer a question grounded in the user's own documents.
    ///
    /// Users without a collection get the fixed no-documents message with an
    /// empty retrieval set. Model failures surface as
    /// [`crate::error::Error::GenerationFailed`].
    pub async fn answer(&self, user_id: &str, question: &str) -> Result<AnswerOutcome> {
        if !self.index.exists(user_id) {
            tracing::info!(user_id, "no collection yet, returning no-documents message");
            return Ok(AnswerOutcome {
                raw_answer: NO_REPORTS_MESSAGE.to_string(),
                retrieved: Vec::new(),
            });
        }

        let retrieved = self.retriever.retrieve(user_id, question).await?;
        tracing::debug!(user_id, chunks = retrieved.len(), "chunks retrieved for question");

        let context = PromptBuilder::build_context(&retrieved);
        let prompt = PromptBuilder::build_grounded_prompt(question, &context);

        let raw_answer = self.llm.generate(&prompt).await?;

        Ok(AnswerOutcome {
            raw_answer,
            retrieved,
        })
    }
}
