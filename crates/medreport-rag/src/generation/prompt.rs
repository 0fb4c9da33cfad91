//! Prompt templates for grounded answer generation

use crate::index::ScoredChunk;

/// Prompt builder for grounded medical Q&A
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build context from retrieved chunks, best match first
    pub fn build_context(retrieved: &[ScoredChunk]) -> String {
        let mut context = String::new();

        for (i, scored) in retrieved.iter().enumerate() {
            let source = scored
                .chunk
                .metadata
                .document_name()
                .unwrap_or("uploaded report");

            context.push_str(&format!(
                "[{}] {}\n\n{}\n\n---\n\n",
                i + 1,
                source,
                scored.chunk.content
            ));
        }

        context
    }

    /// Build the full grounded prompt with strict rules.
    ///
    /// The model must not state facts absent from the context, must not
    /// suggest treatments or medications not already present in the user's
    /// documents, and must fall back to the fixed refusal template when the
    /// context holds nothing relevant.
    pub fn build_grounded_prompt(question: &str, context: &str) -> String {
        format!(
            r#"You are a medical assistant answering questions about a patient's own uploaded medical reports. The report text was OCR-extracted, so pay special attention to laboratory results, diagnoses, and any mentions of specific conditions, diseases, or viruses.

STRICT GROUNDING RULES - FOLLOW THESE EXACTLY:
1. Use ONLY information that appears in the CONTEXT below. Never state facts that are absent from it.
2. Never suggest treatments, medications, or dosages that are not already present in the patient's documents.
3. If the answer is clearly stated in the context, quote it directly.
4. If the context contains no information relevant to the question, respond exactly with:
   "I don't have any information about {{condition}} in your uploaded documents."
   replacing {{condition}} with the condition or topic the patient asked about.
5. Do not guess or speculate. When unsure whether something is in the context, it is not.

CONTEXT FROM UPLOADED REPORTS:
{context}

QUESTION: {question}

Provide a concise and accurate answer based only on the information above:"#,
            context = context,
            question = question
        )
    }
}
