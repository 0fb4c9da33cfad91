//! Per-user vector index with a durable collection per user
//!
//! Each user owns one isolated collection in its own subdirectory under the
//! configured storage root. No user's collection is ever read or written by
//! another user's request.

pub mod collection;

pub use collection::{ScoredChunk, UserCollection};

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::config::IndexConfig;
use crate::error::{Error, Result};
use crate::types::ReportChunk;

struct CacheEntry {
    collection: Arc<RwLock<UserCollection>>,
    last_used: Instant,
}

/// Manages the lifecycle of every user's vector collection.
///
/// Open collection handles are cached in a bounded map; past
/// `max_open_collections` the least-recently-used handle is evicted and
/// transparently re-loaded from disk on next access. Every mutation persists
/// before returning, so eviction never loses data.
///
/// Per-user writes are serialized through each collection's `RwLock`; reads
/// proceed concurrently with each other. Operations on different users never
/// contend beyond the brief cache-map lock.
pub struct UserIndexManager {
    root: PathBuf,
    max_open: usize,
    open: Mutex<HashMap<String, CacheEntry>>,
}

impl UserIndexManager {
    /// Create a manager rooted at the configured storage directory
    pub fn new(config: &IndexConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.storage_dir).map_err(|e| {
            Error::index(format!(
                "failed to create index root {}: {}",
                config.storage_dir.display(),
                e
            ))
        })?;

        Ok(Self {
            root: config.storage_dir.clone(),
            max_open: config.max_open_collections,
            open: Mutex::new(HashMap::new()),
        })
    }

    /// Check whether a user has a collection on disk
    pub fn exists(&self, user_id: &str) -> bool {
        match self.user_dir(user_id) {
            Ok(dir) => dir.exists(),
            Err(_) => false,
        }
    }

    /// Lazily open or create the durable collection for a user. Idempotent.
    pub fn ensure(&self, user_id: &str) -> Result<()> {
        self.open_collection(user_id, true)?;
        Ok(())
    }

    /// Append embedded chunks to the user's collection, creating it on
    /// first upload. Durable on return.
    pub fn upsert(&self, user_id: &str, chunks: Vec<ReportChunk>) -> Result<()> {
        let handle = self
            .open_collection(user_id, true)?
            .expect("collection was just created");

        let count = chunks.len();
        handle.write().append(chunks)?;

        tracing::debug!(user_id, count, "chunks appended to collection");
        Ok(())
    }

    /// Top-k similarity search over the user's collection.
    ///
    /// A user with no collection yet gets an empty result, not an error:
    /// "no documents uploaded" is a defined outcome.
    pub fn similarity_search(
        &self,
        user_id: &str,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredChunk>> {
        match self.open_collection(user_id, false)? {
            Some(handle) => Ok(handle.read().search(query_embedding, top_k)),
            None => Ok(Vec::new()),
        }
    }

    /// Remove every chunk belonging to `report_id` from the user's
    /// collection. Fails with [`Error::NotFound`] when the user has no
    /// collection at all.
    pub fn delete_by_report(&self, user_id: &str, report_id: &str) -> Result<usize> {
        let handle = self.open_collection(user_id, false)?.ok_or_else(|| {
            Error::not_found(format!("no vector collection for user {}", user_id))
        })?;

        let removed = handle.write().remove_report(report_id)?;
        tracing::info!(user_id, report_id, removed, "report chunks deleted");
        Ok(removed)
    }

    /// Destroy the user's entire collection and its backing storage.
    ///
    /// Idempotent: an already-absent collection is logged as a warning and
    /// treated as success so account deletion is never blocked by a
    /// previously-completed cleanup.
    pub fn delete_all(&self, user_id: &str) -> Result<()> {
        self.open.lock().remove(user_id);

        let dir = self.user_dir(user_id)?;
        if !dir.exists() {
            tracing::warn!(user_id, "collection directory already absent, nothing to delete");
            return Ok(());
        }

        std::fs::remove_dir_all(&dir).map_err(|e| {
            tracing::error!(user_id, error = %e, "failed to remove collection directory");
            Error::index(format!("failed to remove collection for {}: {}", user_id, e))
        })?;

        tracing::info!(user_id, "collection destroyed");
        Ok(())
    }

    /// Content hash of an already-indexed report, used for duplicate-upload
    /// detection. `None` when the user or report has nothing indexed.
    pub fn report_hash(&self, user_id: &str, report_id: &str) -> Result<Option<String>> {
        match self.open_collection(user_id, false)? {
            Some(handle) => Ok(handle.read().report_hash(report_id).map(str::to_string)),
            None => Ok(None),
        }
    }

    fn user_dir(&self, user_id: &str) -> Result<PathBuf> {
        // The user id becomes a directory name; anything that could escape
        // the storage root is rejected outright.
        let valid = !user_id.is_empty()
            && user_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(Error::index(format!("invalid user id: {:?}", user_id)));
        }

        Ok(self.root.join(user_id))
    }

    fn open_collection(
        &self,
        user_id: &str,
        create: bool,
    ) -> Result<Option<Arc<RwLock<UserCollection>>>> {
        let mut open = self.open.lock();

        if let Some(entry) = open.get_mut(user_id) {
            entry.last_used = Instant::now();
            return Ok(Some(Arc::clone(&entry.collection)));
        }

        let dir = self.user_dir(user_id)?;
        if !dir.exists() {
            if !create {
                return Ok(None);
            }
            std::fs::create_dir_all(&dir).map_err(|e| {
                Error::index(format!("failed to create collection for {}: {}", user_id, e))
            })?;
            tracing::info!(user_id, "collection created");
        }

        let collection = Arc::new(RwLock::new(UserCollection::open(&dir)?));
        open.insert(
            user_id.to_string(),
            CacheEntry {
                collection: Arc::clone(&collection),
                last_used: Instant::now(),
            },
        );
        self.evict_locked(&mut open, user_id);

        Ok(Some(collection))
    }

    /// Drop least-recently-used handles past the cache bound. In-flight
    /// operations keep their own `Arc`, and every mutation persists before
    /// returning, so evicted handles lose nothing.
    fn evict_locked(&self, open: &mut HashMap<String, CacheEntry>, keep: &str) {
        while open.len() > self.max_open {
            let oldest = open
                .iter()
                .filter(|(id, _)| id.as_str() != keep)
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(id, _)| id.clone());

            match oldest {
                Some(id) => {
                    open.remove(&id);
                    tracing::debug!(user_id = %id, "collection handle evicted");
                }
                None => break,
            }
        }
    }
}
