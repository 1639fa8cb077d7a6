//! Reranker trait and the identity fallback.
//!
//! A reranker re-scores a small candidate set against the query with a
//! more expensive model. It is optional: the search pipeline keeps its
//! fused ordering whenever no reranker is configured or a rerank fails.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::ScoredResult;

/// A candidate handed to a reranker.
#[derive(Debug, Clone, PartialEq)]
pub struct RerankDocument {
    pub id: String,
    pub text: String,
}

#[async_trait]
pub trait Reranker: Send + Sync {
    /// Short identifier for logs (e.g. `"identity"`, a model name).
    fn name(&self) -> &str;

    /// Score `docs` against `query`, returning at most `limit` results
    /// sorted by descending score. Returned ids must come from `docs`.
    async fn rerank(
        &self,
        query: &str,
        docs: &[RerankDocument],
        limit: usize,
    ) -> Result<Vec<ScoredResult>>;
}

/// Keeps the incoming order; scores are `1 / (1 + position)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityReranker;

#[async_trait]
impl Reranker for IdentityReranker {
    fn name(&self) -> &str {
        "identity"
    }

    async fn rerank(
        &self,
        _query: &str,
        docs: &[RerankDocument],
        limit: usize,
    ) -> Result<Vec<ScoredResult>> {
        Ok(docs
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, d)| ScoredResult::new(d.id.clone(), 1.0 / (1.0 + i as f64)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str) -> RerankDocument {
        RerankDocument {
            id: id.to_string(),
            text: format!("text for {}", id),
        }
    }

    #[tokio::test]
    async fn test_identity_preserves_order() {
        let docs = vec![doc("c"), doc("a"), doc("b")];
        let out = IdentityReranker.rerank("q", &docs, 10).await.unwrap();
        let ids: Vec<&str> = out.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert!(out[0].score > out[1].score && out[1].score > out[2].score);
    }

    #[tokio::test]
    async fn test_identity_respects_limit() {
        let docs = vec![doc("a"), doc("b"), doc("c")];
        let out = IdentityReranker.rerank("q", &docs, 2).await.unwrap();
        assert_eq!(out.len(), 2);
    }
}
