//! Core data types for reports, chunks, queries, and responses

pub mod document;
pub mod query;
pub mod response;

pub use document::{ChunkMetadata, ReportChunk};
pub use query::ChatRequest;
pub use response::{ChatResponse, Citation, DeleteResponse, UploadResponse, UploadStatus};
