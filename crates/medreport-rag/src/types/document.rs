//! Report chunk types with source metadata for citations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata attached to every chunk of an uploaded report.
///
/// `filename` carries the name the user uploaded; `source` is a fallback
/// identifier for chunks ingested through other paths. The Citation Resolver
/// derives the cited document name from these, preferring `filename`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Original filename as uploaded by the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Fallback source identifier when no filename is known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// User-supplied description of the report
    #[serde(default)]
    pub description: String,
    /// Upload timestamp
    pub upload_date: DateTime<Utc>,
    /// Report type (e.g. "pdf")
    #[serde(default)]
    pub report_type: String,
    /// URI of the stored original file, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_uri: Option<String>,
}

impl ChunkMetadata {
    /// Create metadata for an uploaded PDF report
    pub fn pdf(filename: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            filename: Some(filename.into()),
            source: None,
            description: description.into(),
            upload_date: Utc::now(),
            report_type: "pdf".to_string(),
            storage_uri: None,
        }
    }

    /// Raw document name for citations: the uploaded filename, falling back
    /// to the source identifier.
    pub fn document_name(&self) -> Option<&str> {
        self.filename.as_deref().or(self.source.as_deref())
    }
}

/// A chunk of text extracted from one user's report.
///
/// Immutable once created; deleting the owning report destroys all of its
/// chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportChunk {
    /// Chunk index within the owning report
    pub chunk_index: u32,
    /// Owning report id
    pub report_id: String,
    /// Owning user id
    pub user_id: String,
    /// Text content
    pub content: String,
    /// Embedding vector
    pub embedding: Vec<f32>,
    /// Hash of the full report text this chunk came from (upload dedup)
    pub content_hash: String,
    /// Source metadata for citations
    pub metadata: ChunkMetadata,
}

impl ReportChunk {
    /// Storage identifier: scopes deletion to one report's chunks.
    pub fn storage_id(&self) -> String {
        format!("{}:{}", self.report_id, self.chunk_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_id_is_report_scoped() {
        let chunk = ReportChunk {
            chunk_index: 3,
            report_id: "r42".to_string(),
            user_id: "u1".to_string(),
            content: String::new(),
            embedding: Vec::new(),
            content_hash: String::new(),
            metadata: ChunkMetadata::pdf("labs.pdf", ""),
        };
        assert_eq!(chunk.storage_id(), "r42:3");
    }

    #[test]
    fn document_name_prefers_filename_over_source() {
        let mut metadata = ChunkMetadata::pdf("labs.pdf", "");
        metadata.source = Some("imports/summary.txt".to_string());
        assert_eq!(metadata.document_name(), Some("labs.pdf"));

        metadata.filename = None;
        assert_eq!(metadata.document_name(), Some("imports/summary.txt"));

        metadata.source = None;
        assert_eq!(metadata.document_name(), None);
    }
}
