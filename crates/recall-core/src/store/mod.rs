//! Storage abstractions for Recall.
//!
//! Three traits describe everything the retrieval core needs from durable
//! storage, so backends can be swapped freely (SQLite in the app crate,
//! in-memory fakes in [`memory`] for tests):
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`MetadataStore`] | Item records, feedback, and the flight recorder |
//! | [`VectorStore`] | Durable blob store behind the in-memory vector index |
//! | [`KeywordSearch`] | Lexical ranking fused with vector results |
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{AuditEntry, Feedback, Item, ScoredResult, SearchFilter};

/// Owner of item records, usefulness feedback and flight-recorder entries.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`save_item`](MetadataStore::save_item) | Insert or replace an item by id |
/// | [`get_item`](MetadataStore::get_item) | Fetch one item |
/// | [`get_items`](MetadataStore::get_items) | Batch fetch for result hydration |
/// | [`record_feedback`](MetadataStore::record_feedback) | Store a usefulness signal |
/// | [`log_flight_recorder`](MetadataStore::log_flight_recorder) | Append an audit entry |
/// | [`get_flight_recorder_entries`](MetadataStore::get_flight_recorder_entries) | Session entries, oldest first |
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Insert or replace an item. `created_at` of an existing record is kept.
    async fn save_item(&self, item: &Item) -> Result<()>;

    async fn get_item(&self, id: &str) -> Result<Option<Item>>;

    /// Fetch several items at once. Missing ids are skipped; order is unspecified.
    async fn get_items(&self, ids: &[String]) -> Result<Vec<Item>>;

    /// All item ids, sorted ascending.
    async fn list_item_ids(&self) -> Result<Vec<String>>;

    /// Delete an item. Returns `true` if it existed.
    async fn delete_item(&self, id: &str) -> Result<bool>;

    async fn record_feedback(&self, feedback: &Feedback) -> Result<()>;

    /// Feedback recorded for an item, oldest first.
    async fn feedback_for_item(&self, item_id: &str) -> Result<Vec<Feedback>>;

    /// Append an entry. Entries are never updated or deleted.
    async fn log_flight_recorder(&self, entry: &AuditEntry) -> Result<()>;

    /// Entries for a session in insertion order.
    async fn get_flight_recorder_entries(&self, session_id: &str) -> Result<Vec<AuditEntry>>;
}

/// Durable storage of normalized embeddings keyed by item id.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Every stored `(item_id, vector)` pair.
    async fn load_all(&self) -> Result<Vec<(String, Vec<f32>)>>;

    /// Insert or overwrite the vector for `id`.
    async fn put(&self, id: &str, vector: &[f32]) -> Result<()>;

    /// Remove the vector for `id`. Missing ids are not an error.
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Lexical ranking over items.
#[async_trait]
pub trait KeywordSearch: Send + Sync {
    /// Ranked matches for `query`, best first, at most `limit`.
    async fn keyword_search(
        &self,
        query: &str,
        limit: usize,
        filter: &SearchFilter,
    ) -> Result<Vec<ScoredResult>>;
}
