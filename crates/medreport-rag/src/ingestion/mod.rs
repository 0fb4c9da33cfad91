//! Document ingestion: OCR text extraction and chunking

pub mod chunker;
pub mod extractor;

pub use chunker::TextChunker;
pub use extractor::{OcrServiceClient, TextExtractor};
