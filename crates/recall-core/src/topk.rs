//! Bounded top-K selection over scored candidates.
//!
//! A min-heap of capacity `k` keeps the best `k` candidates seen so far;
//! each new candidate is compared against the current minimum only. Cost
//! is `O(N log k)` instead of sorting all `N` candidates.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::models::ScoredResult;

/// Heap entry ordered by score, then by *descending* id so that among equal
/// scores the lexicographically smallest id ranks highest.
struct Entry(ScoredResult);

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .score
            .total_cmp(&other.0.score)
            .then_with(|| other.0.id.cmp(&self.0.id))
    }
}

/// Select the `k` highest-scoring candidates, sorted by descending score.
///
/// NaN scores are dropped. Equal scores are ordered by ascending id so the
/// output is reproducible. `k` may exceed the candidate count; the heap is
/// sized from the iterator, not from `k`.
pub fn top_k<I>(candidates: I, k: usize) -> Vec<ScoredResult>
where
    I: IntoIterator<Item = ScoredResult>,
{
    if k == 0 {
        return Vec::new();
    }

    let candidates = candidates.into_iter();
    let (lower, upper) = candidates.size_hint();
    let capacity = k.min(upper.unwrap_or(lower)).saturating_add(1);
    let mut heap: BinaryHeap<Reverse<Entry>> = BinaryHeap::with_capacity(capacity);
    for candidate in candidates {
        if candidate.score.is_nan() {
            continue;
        }
        let entry = Entry(candidate);
        if heap.len() < k {
            heap.push(Reverse(entry));
        } else if let Some(Reverse(min)) = heap.peek() {
            if entry > *min {
                heap.pop();
                heap.push(Reverse(entry));
            }
        }
    }

    // Ascending `Reverse<Entry>` order is descending `Entry` order.
    heap.into_sorted_vec()
        .into_iter()
        .map(|Reverse(Entry(r))| r)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(id: &str, score: f64) -> ScoredResult {
        ScoredResult::new(id, score)
    }

    #[test]
    fn test_top_k_keeps_best_sorted() {
        let input = vec![
            scored("a", 0.1),
            scored("b", 0.9),
            scored("c", 0.5),
            scored("d", 0.7),
        ];
        let out = top_k(input, 2);
        let ids: Vec<&str> = out.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d"]);
    }

    #[test]
    fn test_top_k_fewer_than_k() {
        let out = top_k(vec![scored("a", 0.2), scored("b", 0.4)], 10);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, "b");
    }

    #[test]
    fn test_top_k_zero() {
        assert!(top_k(vec![scored("a", 1.0)], 0).is_empty());
    }

    #[test]
    fn test_top_k_unbounded_k() {
        let out = top_k(vec![scored("a", 0.2), scored("b", 0.4)], usize::MAX);
        let ids: Vec<&str> = out.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);

        let filtered = (0..3)
            .map(|i| scored(&format!("x{}", i), i as f64))
            .filter(|r| r.score > 0.0);
        assert_eq!(top_k(filtered, usize::MAX).len(), 2);
    }

    #[test]
    fn test_top_k_ties_by_id() {
        let out = top_k(
            vec![scored("z", 0.5), scored("m", 0.5), scored("a", 0.5)],
            2,
        );
        let ids: Vec<&str> = out.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "m"]);
    }

    #[test]
    fn test_top_k_drops_nan() {
        let out = top_k(vec![scored("a", f64::NAN), scored("b", -0.3)], 5);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "b");
    }

    #[test]
    fn test_top_k_matches_full_sort() {
        let input: Vec<ScoredResult> = (0..200)
            .map(|i| scored(&format!("id{:03}", i), ((i * 37) % 101) as f64 / 100.0))
            .collect();
        let mut sorted = input.clone();
        sorted.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.id.cmp(&b.id)));
        sorted.truncate(15);
        assert_eq!(top_k(input, 15), sorted);
    }
}
