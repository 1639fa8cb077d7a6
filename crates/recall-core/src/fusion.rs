//! Reciprocal Rank Fusion (RRF).
//!
//! Merges any number of ranked lists into a single ranking:
//!
//! ```text
//! rrf(d) = Σ_lists 1 / (k + rank_list(d))      rank is 1-indexed
//! ```
//!
//! RRF only looks at positions, never at raw scores, so a cosine-similarity
//! list and a BM25 list can be merged without normalizing either.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::models::ItemType;

/// Standard RRF `k` from Cormack, Clarke and Buettcher (SIGIR 2009).
pub const RRF_K: usize = 60;

/// Display fields a ranker may already know about a candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateMetadata {
    pub title: String,
    pub content: String,
    pub item_type: ItemType,
}

/// One entry of a ranked input list. Its rank is its position in the list.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    pub id: String,
    pub metadata: Option<CandidateMetadata>,
}

impl RankedCandidate {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(id: impl Into<String>, metadata: CandidateMetadata) -> Self {
        Self {
            id: id.into(),
            metadata: Some(metadata),
        }
    }
}

/// A fused ranking entry.
///
/// `metadata` is `None` when no input list carried it; callers hydrate
/// those ids themselves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FusedResult {
    pub id: String,
    pub score: f64,
    pub metadata: Option<CandidateMetadata>,
}

/// Fuse ranked lists with RRF.
///
/// Every id present in any list appears exactly once in the output, sorted
/// by descending fused score. Equal scores are ordered by ascending id. An
/// id repeated inside one list only counts at its first position.
pub fn reciprocal_rank_fusion(lists: &[Vec<RankedCandidate>], k: usize) -> Vec<FusedResult> {
    let k_param = k as f64;
    let mut fused: HashMap<&str, FusedResult> = HashMap::new();

    for list in lists {
        let mut seen: HashSet<&str> = HashSet::new();
        for (position, candidate) in list.iter().enumerate() {
            if !seen.insert(candidate.id.as_str()) {
                continue;
            }
            let rank = (position + 1) as f64;
            let contribution = 1.0 / (k_param + rank);

            let entry = fused
                .entry(candidate.id.as_str())
                .or_insert_with(|| FusedResult {
                    id: candidate.id.clone(),
                    score: 0.0,
                    metadata: None,
                });
            entry.score += contribution;
            if entry.metadata.is_none() {
                entry.metadata = candidate.metadata.clone();
            }
        }
    }

    let mut combined: Vec<FusedResult> = fused.into_values().collect();
    combined.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(ids: &[&str]) -> Vec<RankedCandidate> {
        ids.iter().map(|id| RankedCandidate::new(*id)).collect()
    }

    fn score_of(fused: &[FusedResult], id: &str) -> f64 {
        fused.iter().find(|r| r.id == id).unwrap().score
    }

    #[test]
    fn test_single_list_rank_one() {
        let fused = reciprocal_rank_fusion(&[list(&["a"])], RRF_K);
        assert_eq!(fused.len(), 1);
        assert!((fused[0].score - 1.0 / 61.0).abs() < 1e-12);
    }

    #[test]
    fn test_rank_one_in_two_and_three_lists() {
        let two = reciprocal_rank_fusion(&[list(&["a"]), list(&["a"])], RRF_K);
        assert!((two[0].score - 2.0 / 61.0).abs() < 1e-12);

        let three = reciprocal_rank_fusion(&[list(&["a"]), list(&["a"]), list(&["a"])], RRF_K);
        assert!((three[0].score - 3.0 / 61.0).abs() < 1e-12);
    }

    #[test]
    fn test_items_in_both_lists_rank_first() {
        let vector = list(&["a", "b", "c"]);
        let keyword = list(&["b", "d", "a"]);
        let fused = reciprocal_rank_fusion(&[vector, keyword], RRF_K);

        assert_eq!(fused.len(), 4);
        let top: Vec<&str> = fused.iter().take(2).map(|r| r.id.as_str()).collect();
        assert!(top.contains(&"a"));
        assert!(top.contains(&"b"));
        assert!((score_of(&fused, "b") - (1.0 / 62.0 + 1.0 / 61.0)).abs() < 1e-12);
        assert!((score_of(&fused, "a") - (1.0 / 61.0 + 1.0 / 63.0)).abs() < 1e-12);
    }

    #[test]
    fn test_uses_rank_not_score_magnitude() {
        // Same ids, reversed order: symmetric positions give equal scores.
        let fused = reciprocal_rank_fusion(&[list(&["x", "y"]), list(&["y", "x"])], RRF_K);
        assert!((fused[0].score - fused[1].score).abs() < 1e-12);
    }

    #[test]
    fn test_ties_broken_by_id() {
        let fused = reciprocal_rank_fusion(&[list(&["b"]), list(&["a"])], RRF_K);
        let ids: Vec<&str> = fused.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(reciprocal_rank_fusion(&[], RRF_K).is_empty());
        assert!(reciprocal_rank_fusion(&[vec![], vec![]], RRF_K).is_empty());
    }

    #[test]
    fn test_metadata_attached_from_carrying_list() {
        let meta = CandidateMetadata {
            title: "Retry policy".to_string(),
            content: "Use backoff".to_string(),
            item_type: ItemType::Pattern,
        };
        let vector = list(&["a", "b"]);
        let keyword = vec![RankedCandidate::with_metadata("a", meta.clone())];
        let fused = reciprocal_rank_fusion(&[vector, keyword], RRF_K);

        let a = fused.iter().find(|r| r.id == "a").unwrap();
        assert_eq!(a.metadata.as_ref(), Some(&meta));
        let b = fused.iter().find(|r| r.id == "b").unwrap();
        assert!(b.metadata.is_none());
    }

    #[test]
    fn test_duplicate_within_list_counts_once() {
        let fused = reciprocal_rank_fusion(&[list(&["a", "a"])], RRF_K);
        assert_eq!(fused.len(), 1);
        assert!((fused[0].score - 1.0 / 61.0).abs() < 1e-12);
    }
}
