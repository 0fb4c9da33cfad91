//! Durable vector collection for a single user's report chunks

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::ReportChunk;

/// File holding one user's persisted chunks inside their collection directory
const COLLECTION_FILE: &str = "collection.json";

/// A retrieved chunk with its similarity to the query embedding
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// The matched chunk
    pub chunk: ReportChunk,
    /// Cosine similarity to the query (higher is more similar)
    pub similarity: f32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CollectionFile {
    records: Vec<ReportChunk>,
}

/// One user's vector collection, held in memory and persisted to a single
/// JSON file inside the user's collection directory.
///
/// Collections are small (one user's reports), so similarity search is a
/// brute-force cosine scan over all records.
#[derive(Debug)]
pub struct UserCollection {
    path: PathBuf,
    records: Vec<ReportChunk>,
}

impl UserCollection {
    /// Open the collection stored in `dir`, or start empty when no
    /// collection file exists yet.
    pub fn open(dir: &Path) -> Result<Self> {
        let path = dir.join(COLLECTION_FILE);

        let records = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| Error::index(format!("failed to read {}: {}", path.display(), e)))?;
            let file: CollectionFile = serde_json::from_str(&content)
                .map_err(|e| Error::index(format!("corrupt collection {}: {}", path.display(), e)))?;
            file.records
        } else {
            Vec::new()
        };

        Ok(Self { path, records })
    }

    /// Append chunks and persist the collection
    pub fn append(&mut self, chunks: Vec<ReportChunk>) -> Result<()> {
        self.records.extend(chunks);
        self.persist()
    }

    /// Remove every chunk owned by `report_id`, returning how many were
    /// removed. Persists only when something changed.
    pub fn remove_report(&mut self, report_id: &str) -> Result<usize> {
        let before = self.records.len();
        self.records.retain(|r| r.report_id != report_id);
        let removed = before - self.records.len();

        if removed > 0 {
            self.persist()?;
        }
        Ok(removed)
    }

    /// Content hash of an already-indexed report, if present
    pub fn report_hash(&self, report_id: &str) -> Option<&str> {
        self.records
            .iter()
            .find(|r| r.report_id == report_id)
            .map(|r| r.content_hash.as_str())
    }

    /// Brute-force cosine similarity search, best matches first, bounded
    /// by `top_k`.
    pub fn search(&self, query_embedding: &[f32], top_k: usize) -> Vec<ScoredChunk> {
        let mut scored: Vec<ScoredChunk> = self
            .records
            .iter()
            .map(|chunk| ScoredChunk {
                similarity: cosine_similarity(&chunk.embedding, query_embedding),
                chunk: chunk.clone(),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);
        scored
    }

    /// Number of stored chunks
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the collection holds no chunks
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn persist(&self) -> Result<()> {
        let file = CollectionFile {
            records: self.records.clone(),
        };
        let content = serde_json::to_string(&file)
            .map_err(|e| Error::index(format!("failed to serialize collection: {}", e)))?;
        std::fs::write(&self.path, content)
            .map_err(|e| Error::index(format!("failed to write {}: {}", self.path.display(), e)))
    }
}

/// Cosine similarity between two vectors.
///
/// Returns 0.0 when either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
