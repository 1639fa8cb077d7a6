//! Core data models shared by every layer of Recall.
//!
//! These types describe knowledge items, the scored results that flow
//! between the vector index, rank fusion and the search orchestrator, and
//! the flight-recorder entries written for every retrieval.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of results returned by a search when no limit is given.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Largest number of results a single search may ask for.
pub const MAX_SEARCH_LIMIT: usize = 1000;

/// Kind of knowledge an [`Item`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Pattern,
    Failure,
    Decision,
    Context,
    Code,
    Doc,
    Runbook,
    Manual,
}

impl ItemType {
    pub const ALL: [ItemType; 8] = [
        ItemType::Pattern,
        ItemType::Failure,
        ItemType::Decision,
        ItemType::Context,
        ItemType::Code,
        ItemType::Doc,
        ItemType::Runbook,
        ItemType::Manual,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Pattern => "pattern",
            ItemType::Failure => "failure",
            ItemType::Decision => "decision",
            ItemType::Context => "context",
            ItemType::Code => "code",
            ItemType::Doc => "doc",
            ItemType::Runbook => "runbook",
            ItemType::Manual => "manual",
        }
    }

    /// Single-letter prefix used when generating item ids (`P-1a2b3c4d`).
    pub fn id_prefix(&self) -> char {
        match self {
            ItemType::Pattern => 'P',
            ItemType::Failure => 'F',
            ItemType::Decision => 'D',
            ItemType::Context => 'C',
            ItemType::Code => 'X',
            ItemType::Doc => 'O',
            ItemType::Runbook => 'R',
            _ => 'I',
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        match ItemType::ALL.iter().find(|t| t.as_str() == lower) {
            Some(t) => Ok(*t),
            None => bail!(
                "unknown item type: '{}'. Must be one of: pattern, failure, decision, context, code, doc, runbook, manual",
                s
            ),
        }
    }
}

/// Visibility of an item: shared across projects or tied to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Global,
    Project,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Global => "global",
            Scope::Project => "project",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "global" => Ok(Scope::Global),
            "project" => Ok(Scope::Project),
            _ => bail!("unknown scope: '{}'. Must be global or project", s),
        }
    }
}

/// A unit of knowledge owned by the metadata store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub scope: Scope,
    #[serde(default)]
    pub source: String,
    #[serde(default = "empty_object")]
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn empty_object() -> serde_json::Value {
    serde_json::json!({})
}

impl Item {
    /// Build a new item stamped with the current time.
    pub fn new(id: impl Into<String>, item_type: ItemType, title: &str, content: &str) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            item_type,
            title: title.to_string(),
            content: content.to_string(),
            tags: BTreeSet::new(),
            scope: Scope::Global,
            source: String::new(),
            metadata: empty_object(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Text handed to the embedder for this item.
    pub fn embedding_text(&self) -> String {
        if self.title.is_empty() {
            self.content.clone()
        } else {
            format!("{}\n\n{}", self.title, self.content)
        }
    }
}

/// Generate a fresh, type-prefixed item id such as `D-9f86d081`.
pub fn generate_item_id(item_type: ItemType) -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", item_type.id_prefix(), &hex[..8])
}

/// An `(id, score)` pair. Score meaning depends on the stage that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredResult {
    pub id: String,
    pub score: f64,
}

impl ScoredResult {
    pub fn new(id: impl Into<String>, score: f64) -> Self {
        Self {
            id: id.into(),
            score,
        }
    }
}

/// Type and scope restrictions applied to a search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilter {
    pub types: Vec<ItemType>,
    pub scope: Option<Scope>,
}

impl SearchFilter {
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.scope.is_none()
    }

    pub fn matches(&self, item: &Item) -> bool {
        if !self.types.is_empty() && !self.types.contains(&item.item_type) {
            return false;
        }
        match self.scope {
            Some(scope) => item.scope == scope,
            None => true,
        }
    }
}

/// A query against the knowledge base.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub filter: SearchFilter,
    /// Values `<= 0` mean [`DEFAULT_SEARCH_LIMIT`]; larger values are
    /// clamped to [`MAX_SEARCH_LIMIT`].
    pub limit: i64,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn effective_limit(&self) -> usize {
        if self.limit <= 0 {
            DEFAULT_SEARCH_LIMIT
        } else {
            usize::try_from(self.limit).map_or(MAX_SEARCH_LIMIT, |l| l.min(MAX_SEARCH_LIMIT))
        }
    }
}

/// Byte range in an item's content that matched a query term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub start: usize,
    pub end: usize,
}

/// A hydrated search hit.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub item: Item,
    pub score: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<Highlight>,
}

/// Kind of flight-recorder entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEntryType {
    RetrievalQuery,
    RetrievalJudgment,
    Decision,
    Error,
    Milestone,
    Observation,
}

impl AuditEntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEntryType::RetrievalQuery => "retrieval_query",
            AuditEntryType::RetrievalJudgment => "retrieval_judgment",
            AuditEntryType::Decision => "decision",
            AuditEntryType::Error => "error",
            AuditEntryType::Milestone => "milestone",
            AuditEntryType::Observation => "observation",
        }
    }
}

impl fmt::Display for AuditEntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditEntryType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "retrieval_query" => Ok(AuditEntryType::RetrievalQuery),
            "retrieval_judgment" => Ok(AuditEntryType::RetrievalJudgment),
            "decision" => Ok(AuditEntryType::Decision),
            "error" => Ok(AuditEntryType::Error),
            "milestone" => Ok(AuditEntryType::Milestone),
            "observation" => Ok(AuditEntryType::Observation),
            other => bail!(
                "unknown flight recorder entry type: '{}'. Must be one of: retrieval_query, retrieval_judgment, decision, error, milestone, observation",
                other
            ),
        }
    }
}

/// One immutable flight-recorder record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: String,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub entry_type: AuditEntryType,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    pub metadata: serde_json::Value,
}

/// A usefulness signal for an item, tied to the session that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feedback {
    pub item_id: String,
    pub session_id: String,
    pub useful: bool,
    pub context: Option<String>,
    pub created_at: DateTime<Utc>,
}
