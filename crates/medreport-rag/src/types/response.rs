//! Response types for chat, upload, and delete endpoints

use serde::{Deserialize, Serialize};

/// Citation pointing at a source document the answer actually drew from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Cleaned base filename of the cited document
    pub document_name: String,
}

impl Citation {
    /// Create a citation for a cleaned document name
    pub fn new(document_name: impl Into<String>) -> Self {
        Self {
            document_name: document_name.into(),
        }
    }
}

/// Response to a chat question: the answer plus the documents it is
/// grounded in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated answer (or refusal / no-documents message)
    pub message: String,
    /// Source documents the answer draws from, best-match first
    pub citations: Vec<Citation>,
}

impl ChatResponse {
    /// Answer without any citations
    pub fn uncited(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            citations: Vec::new(),
        }
    }
}

/// Outcome of storing a report in the vector index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    /// New report indexed
    Indexed,
    /// Same report id with identical content already indexed; skipped
    Unchanged,
    /// Report id existed with different content; old chunks replaced
    Updated,
}

/// Response to a report upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Whether the upload was processed
    pub success: bool,
    /// Human-readable status message
    pub message: String,
    /// Id assigned to the uploaded report
    pub report_id: String,
    /// Number of chunks stored in the index
    pub chunk_count: usize,
    /// What happened to the report
    pub status: UploadStatus,
}

/// Response to a report or account deletion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Whether the deletion completed
    pub success: bool,
    /// Human-readable status message
    pub message: String,
}
