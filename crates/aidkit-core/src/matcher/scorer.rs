//! Fuzzy string similarity on a 0-100 scale.
//!
//! `WeightedRatio` combines a plain indel ratio with partial (best-window)
//! and token-based (order-insensitive) variants, scaled by how different the
//! two strings are in length. The composition follows the widely used
//! "WRatio" heuristic, so scores line up with what catalog authors see in
//! other tooling.

use std::collections::BTreeSet;

const UNBASE_SCALE: f64 = 0.95;

/// Scores the similarity between a query and a candidate keyword.
pub trait SimilarityScorer: Send + Sync {
    /// Returns a score in `0.0..=100.0`; higher is more similar.
    fn score(&self, query: &str, candidate: &str) -> f64;
}

/// Weighted-ratio scorer, tolerant of word order and partial overlap.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedRatio;

impl SimilarityScorer for WeightedRatio {
    fn score(&self, query: &str, candidate: &str) -> f64 {
        weighted_ratio(query, candidate)
    }
}

/// Normalized indel similarity of two strings.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    indel_ratio(&a, &b)
}

/// Best `ratio` of the shorter string against any equally long window of the longer one.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    partial_ratio_chars(&a, &b)
}

/// `ratio` after sorting the whitespace-separated tokens of both strings.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Compares the shared token set against each side's remainder.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let sect = join(tokens_a.intersection(&tokens_b).copied());
    let diff_ab = join(tokens_a.difference(&tokens_b).copied());
    let diff_ba = join(tokens_b.difference(&tokens_a).copied());

    if !sect.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    let sect_ab = join([sect.as_str(), diff_ab.as_str()].into_iter());
    let sect_ba = join([sect.as_str(), diff_ba.as_str()].into_iter());

    let mut result = ratio(&sect_ab, &sect_ba);
    if !sect.is_empty() {
        result = result.max(ratio(&sect, &sect_ab)).max(ratio(&sect, &sect_ba));
    }
    result
}

/// Weighted combination of the ratios above.
pub fn weighted_ratio(a: &str, b: &str) -> f64 {
    let len_a = a.chars().count();
    let len_b = b.chars().count();
    if len_a == 0 || len_b == 0 {
        return 0.0;
    }

    let len_ratio = len_a.max(len_b) as f64 / len_a.min(len_b) as f64;
    let base = ratio(a, b);

    if len_ratio < 1.5 {
        return base.max(token_ratio(a, b) * UNBASE_SCALE);
    }

    let partial_scale = if len_ratio < 8.0 { 0.9 } else { 0.6 };
    let best = base.max(partial_ratio(a, b) * partial_scale);
    best.max(partial_token_ratio(a, b) * UNBASE_SCALE * partial_scale)
}

fn token_ratio(a: &str, b: &str) -> f64 {
    token_sort_ratio(a, b).max(token_set_ratio(a, b))
}

fn partial_token_ratio(a: &str, b: &str) -> f64 {
    let split_a: Vec<&str> = a.split_whitespace().collect();
    let split_b: Vec<&str> = b.split_whitespace().collect();
    let tokens_a: BTreeSet<&str> = split_a.iter().copied().collect();
    let tokens_b: BTreeSet<&str> = split_b.iter().copied().collect();

    if tokens_a.intersection(&tokens_b).next().is_some() {
        return 100.0;
    }

    let result = partial_ratio(&sorted_tokens(a), &sorted_tokens(b));

    // Disjoint token sets make the difference strings identical to the sorted ones.
    let diff_ab: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let diff_ba: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();
    if split_a.len() == diff_ab.len() && split_b.len() == diff_ba.len() {
        return result;
    }

    result.max(partial_ratio(
        &join(diff_ab.into_iter()),
        &join(diff_ba.into_iter()),
    ))
}

fn indel_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }

    200.0 * lcs_len(a, b) as f64 / total as f64
}

/// Longest common subsequence length in `O(len(a) * len(b))` time, keeping
/// one row sized to the shorter slice.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return 0;
    }

    let mut row = vec![0usize; short.len() + 1];
    for &c in long {
        let mut diagonal = 0;
        for (j, &s) in short.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if c == s {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }
    row[short.len()]
}

fn partial_ratio_chars(a: &[char], b: &[char]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    if a.len() == b.len() {
        return best_window(a, b).max(best_window(b, a));
    }

    if a.len() < b.len() {
        best_window(a, b)
    } else {
        best_window(b, a)
    }
}

/// Slides `short` across `long`, including the partially overlapping windows at both ends.
fn best_window(short: &[char], long: &[char]) -> f64 {
    let n = short.len();
    let m = long.len();
    let mut best: f64 = 0.0;

    for end in 1..n {
        best = best.max(indel_ratio(short, &long[..end]));
    }

    for start in 0..=(m - n) {
        best = best.max(indel_ratio(short, &long[start..start + n]));
        if best >= 100.0 {
            return 100.0;
        }
    }

    for start in (m - n + 1)..m {
        best = best.max(indel_ratio(short, &long[start..]));
    }

    best
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn join<'a>(tokens: impl Iterator<Item = &'a str>) -> String {
    tokens
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
