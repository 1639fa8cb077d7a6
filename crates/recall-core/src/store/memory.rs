//! In-memory store implementations for tests and offline use.
//!
//! Uses `HashMap` and `Vec` behind `std::sync::RwLock`. Keyword search
//! ranks items by how many distinct query terms appear in their title,
//! content or tags.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;

use crate::embedding::tokenize;
use crate::models::{AuditEntry, Feedback, Item, ScoredResult, SearchFilter};

use super::{KeywordSearch, MetadataStore, VectorStore};

fn poisoned<T>(_: T) -> anyhow::Error {
    anyhow!("in-memory store lock poisoned")
}

/// In-memory [`MetadataStore`] and [`KeywordSearch`].
#[derive(Default)]
pub struct InMemoryMetadataStore {
    items: RwLock<BTreeMap<String, Item>>,
    feedback: RwLock<Vec<Feedback>>,
    flight_recorder: RwLock<Vec<AuditEntry>>,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of flight-recorder entries across all sessions.
    pub fn flight_recorder_len(&self) -> usize {
        self.flight_recorder.read().map(|e| e.len()).unwrap_or(0)
    }
}

#[async_trait]
impl MetadataStore for InMemoryMetadataStore {
    async fn save_item(&self, item: &Item) -> Result<()> {
        let mut items = self.items.write().map_err(poisoned)?;
        let mut stored = item.clone();
        if let Some(existing) = items.get(&item.id) {
            stored.created_at = existing.created_at;
        }
        items.insert(item.id.clone(), stored);
        Ok(())
    }

    async fn get_item(&self, id: &str) -> Result<Option<Item>> {
        let items = self.items.read().map_err(poisoned)?;
        Ok(items.get(id).cloned())
    }

    async fn get_items(&self, ids: &[String]) -> Result<Vec<Item>> {
        let items = self.items.read().map_err(poisoned)?;
        Ok(ids.iter().filter_map(|id| items.get(id).cloned()).collect())
    }

    async fn list_item_ids(&self) -> Result<Vec<String>> {
        let items = self.items.read().map_err(poisoned)?;
        Ok(items.keys().cloned().collect())
    }

    async fn delete_item(&self, id: &str) -> Result<bool> {
        let mut items = self.items.write().map_err(poisoned)?;
        Ok(items.remove(id).is_some())
    }

    async fn record_feedback(&self, feedback: &Feedback) -> Result<()> {
        self.feedback
            .write()
            .map_err(poisoned)?
            .push(feedback.clone());
        Ok(())
    }

    async fn feedback_for_item(&self, item_id: &str) -> Result<Vec<Feedback>> {
        let feedback = self.feedback.read().map_err(poisoned)?;
        Ok(feedback
            .iter()
            .filter(|f| f.item_id == item_id)
            .cloned()
            .collect())
    }

    async fn log_flight_recorder(&self, entry: &AuditEntry) -> Result<()> {
        self.flight_recorder
            .write()
            .map_err(poisoned)?
            .push(entry.clone());
        Ok(())
    }

    async fn get_flight_recorder_entries(&self, session_id: &str) -> Result<Vec<AuditEntry>> {
        let entries = self.flight_recorder.read().map_err(poisoned)?;
        Ok(entries
            .iter()
            .filter(|e| e.session_id == session_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl KeywordSearch for InMemoryMetadataStore {
    async fn keyword_search(
        &self,
        query: &str,
        limit: usize,
        filter: &SearchFilter,
    ) -> Result<Vec<ScoredResult>> {
        let terms: HashSet<String> = tokenize(query).collect();
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let items = self.items.read().map_err(poisoned)?;
        let mut candidates: Vec<ScoredResult> = items
            .values()
            .filter(|item| filter.matches(item))
            .filter_map(|item| {
                let mut words: HashSet<String> = tokenize(&item.title).collect();
                words.extend(tokenize(&item.content));
                for tag in &item.tags {
                    words.extend(tokenize(tag));
                }
                let matches = terms.iter().filter(|t| words.contains(*t)).count();
                (matches > 0).then(|| ScoredResult::new(item.id.clone(), matches as f64))
            })
            .collect();

        candidates.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        candidates.truncate(limit);
        Ok(candidates)
    }
}

/// In-memory [`VectorStore`].
///
/// [`set_fail_writes`](InMemoryVectorStore::set_fail_writes) makes every
/// `put`/`delete` fail, for exercising write-through error paths.
#[derive(Default)]
pub struct InMemoryVectorStore {
    vectors: RwLock<HashMap<String, Vec<f32>>>,
    fail_writes: AtomicBool,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// The raw stored vector for `id`, if any.
    pub fn get(&self, id: &str) -> Option<Vec<f32>> {
        self.vectors.read().ok()?.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.vectors.read().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn load_all(&self) -> Result<Vec<(String, Vec<f32>)>> {
        let vectors = self.vectors.read().map_err(poisoned)?;
        Ok(vectors
            .iter()
            .map(|(id, v)| (id.clone(), v.clone()))
            .collect())
    }

    async fn put(&self, id: &str, vector: &[f32]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("vector store write failed for {}", id);
        }
        self.vectors
            .write()
            .map_err(poisoned)?
            .insert(id.to_string(), vector.to_vec());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("vector store delete failed for {}", id);
        }
        self.vectors.write().map_err(poisoned)?.remove(id);
        Ok(())
    }
}
