use std::cmp::Ordering;

use crate::models::{Product, ScoredProduct};

/// Ratcliff/Obershelp sequence similarity in [0, 1]: twice the number of
/// matching characters (found by recursively matching longest common
/// substrings) divided by the total length of both strings. Two empty
/// strings are identical (1.0); one empty string scores 0.0 against any
/// non-empty one.
pub fn sequence_ratio(a: &str, b: &str) -> f32 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f32 / total as f32
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (i, j, len) = longest_common_substring(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_chars(&a[..i], &b[..j]) + matching_chars(&a[i + len..], &b[j + len..])
}

/// Earliest-starting longest common substring of `a` and `b`, as
/// (start in a, start in b, length). Rolling single-row DP.
fn longest_common_substring(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];

    for i in 0..a.len() {
        for j in 0..b.len() {
            cur[j + 1] = if a[i] == b[j] { prev[j] + 1 } else { 0 };
            if cur[j + 1] > best.2 {
                let len = cur[j + 1];
                best = (i + 1 - len, j + 1 - len, len);
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    best
}

/// Score every entry of the catalog snapshot against the recognized text.
///
/// The haystack per entry is the lowercased name, with the category appended
/// when present. Entries scoring below `min_score` are dropped; the rest are
/// sorted descending by score with ties keeping the snapshot's iteration
/// order (stable sort). Truncation to the result/preview caps is left to the
/// caller, which needs both views.
pub fn rank_catalog(full_text: &str, snapshot: &[Product], min_score: f32) -> Vec<ScoredProduct> {
    let needle = full_text.to_lowercase();
    let scored = snapshot
        .iter()
        .map(|product| {
            let haystack = match &product.category {
                Some(category) => format!("{} {}", product.name, category).to_lowercase(),
                None => product.name.to_lowercase(),
            };
            ScoredProduct {
                score: sequence_ratio(&needle, &haystack),
                product: product.clone(),
            }
        })
        .collect();
    rank_scored(scored, min_score)
}

fn rank_scored(scored: Vec<ScoredProduct>, min_score: f32) -> Vec<ScoredProduct> {
    let mut kept: Vec<ScoredProduct> = scored
        .into_iter()
        .filter(|s| s.score >= min_score)
        .collect();
    // Vec::sort_by is stable: equal scores retain snapshot order.
    kept.sort_by(|x, y| y.score.partial_cmp(&x.score).unwrap_or(Ordering::Equal));
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn product(id: i64, name: &str, category: Option<&str>) -> Product {
        Product {
            id,
            name: name.to_string(),
            price: 1.0,
            stock: 0,
            image_url: None,
            category: category.map(String::from),
            created_at: Utc::now(),
        }
    }

    fn scored(scores: &[f32]) -> Vec<ScoredProduct> {
        scores
            .iter()
            .enumerate()
            .map(|(i, &score)| ScoredProduct {
                score,
                product: product(i as i64 + 1, "p", None),
            })
            .collect()
    }

    #[test]
    fn test_ratio_identical_strings() {
        assert_eq!(sequence_ratio("amul milk", "amul milk"), 1.0);
    }

    #[test]
    fn test_ratio_disjoint_strings() {
        assert_eq!(sequence_ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_ratio_both_empty() {
        assert_eq!(sequence_ratio("", ""), 1.0);
    }

    #[test]
    fn test_ratio_one_empty() {
        assert_eq!(sequence_ratio("", "bread"), 0.0);
        assert_eq!(sequence_ratio("bread", ""), 0.0);
    }

    #[test]
    fn test_ratio_known_value() {
        // Matching blocks of "abcd" vs "bcde": "bcd" (3 chars), 2*3/8 = 0.75.
        assert_eq!(sequence_ratio("abcd", "bcde"), 0.75);
    }

    #[test]
    fn test_ratio_recursive_matching() {
        // "abxcd" vs "abcd": "ab" + "cd" = 4 matching chars, 2*4/9.
        let ratio = sequence_ratio("abxcd", "abcd");
        assert!((ratio - 8.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_rank_filters_sorts_and_breaks_ties_stably() {
        let ranked = rank_scored(scored(&[0.05, 0.12, 0.5, 0.9, 0.11, 0.3]), 0.1);
        let scores: Vec<f32> = ranked.iter().map(|s| s.score).collect();
        assert_eq!(scores, vec![0.9, 0.5, 0.3, 0.12, 0.11]);
    }

    #[test]
    fn test_rank_tie_keeps_snapshot_order() {
        let ranked = rank_scored(scored(&[0.4, 0.9, 0.4]), 0.1);
        let ids: Vec<i64> = ranked.iter().map(|s| s.product.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_rank_catalog_prefers_closest_name() {
        let snapshot = vec![
            product(1, "Amul Milk 2L", Some("Dairy")),
            product(2, "Bread", Some("Bakery")),
        ];
        let ranked = rank_catalog("amul milk 2l", &snapshot, 0.1);
        assert_eq!(ranked[0].product.id, 1);
        assert!(ranked[0].score > 0.7);
    }

    #[test]
    fn test_rank_catalog_empty_text_matches_nothing() {
        let snapshot = vec![product(1, "Amul Milk 2L", Some("Dairy"))];
        assert!(rank_catalog("", &snapshot, 0.1).is_empty());
    }

    #[test]
    fn test_rank_catalog_without_category() {
        let snapshot = vec![product(1, "Bread", None)];
        let ranked = rank_catalog("bread", &snapshot, 0.1);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].score, 1.0);
    }
}
