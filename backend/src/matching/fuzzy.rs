//! Fuzzy string similarity on a 0-100 scale.
//!
//! [`WeightedRatio`] blends a plain edit-distance ratio with token-sorted,
//! token-set and partial (substring) ratios so that header wording such as
//! `"Value Date"` still matches the alias `"date"`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Scores how close two strings are, 0 (unrelated) to 100 (identical).
pub trait Similarity {
    fn score(&self, a: &str, b: &str) -> u8;
}

impl<F> Similarity for F
where
    F: Fn(&str, &str) -> u8,
{
    fn score(&self, a: &str, b: &str) -> u8 {
        self(a, b)
    }
}

/// Default scorer used by the header locator and schema matcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedRatio;

impl Similarity for WeightedRatio {
    fn score(&self, a: &str, b: &str) -> u8 {
        weighted_ratio(a, b)
    }
}

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}]+").expect("static regex"));

/// Lower-case, collapse punctuation and whitespace runs to a single space.
pub fn normalize(s: &str) -> String {
    NON_ALPHANUMERIC
        .replace_all(&s.to_lowercase(), " ")
        .trim()
        .to_string()
}

const UNBASE_SCALE: f64 = 0.95;

pub fn weighted_ratio(a: &str, b: &str) -> u8 {
    let p1 = normalize(a);
    let p2 = normalize(b);
    if p1.is_empty() || p2.is_empty() {
        return 0;
    }

    let base = ratio(&p1, &p2) as f64;
    let (l1, l2) = (p1.chars().count() as f64, p2.chars().count() as f64);
    let len_ratio = l1.max(l2) / l1.min(l2);

    let best = if len_ratio < 1.5 {
        let tsor = token_sort_ratio(&p1, &p2, false) as f64 * UNBASE_SCALE;
        let tser = token_set_ratio(&p1, &p2, false) as f64 * UNBASE_SCALE;
        base.max(tsor).max(tser)
    } else {
        let partial_scale = if len_ratio > 8.0 { 0.6 } else { 0.9 };
        let partial = partial_ratio(&p1, &p2) as f64 * partial_scale;
        let ptsor = token_sort_ratio(&p1, &p2, true) as f64 * UNBASE_SCALE * partial_scale;
        let ptser = token_set_ratio(&p1, &p2, true) as f64 * UNBASE_SCALE * partial_scale;
        base.max(partial).max(ptsor).max(ptser)
    };

    best.round().clamp(0.0, 100.0) as u8
}

/// `2 * LCS / (len(a) + len(b))`, i.e. the indel-distance ratio.
pub fn ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    chars_ratio(&a, &b)
}

fn chars_ratio(a: &[char], b: &[char]) -> u8 {
    let total = a.len() + b.len();
    if total == 0 {
        return 0;
    }
    let common = lcs_len(a, b);
    ((200 * common) as f64 / total as f64).round() as u8
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Best ratio of the shorter string against every same-length window of the longer.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    if short.is_empty() {
        return 0;
    }
    if short.len() == long.len() {
        return chars_ratio(short, long);
    }

    let mut best = 0;
    for window in long.windows(short.len()) {
        best = best.max(chars_ratio(short, window));
        if best == 100 {
            break;
        }
    }
    best
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn token_sort_ratio(a: &str, b: &str, partial: bool) -> u8 {
    let (s1, s2) = (sorted_tokens(a), sorted_tokens(b));
    if partial {
        partial_ratio(&s1, &s2)
    } else {
        ratio(&s1, &s2)
    }
}

fn token_set_ratio(a: &str, b: &str, partial: bool) -> u8 {
    let t1: BTreeSet<&str> = a.split_whitespace().collect();
    let t2: BTreeSet<&str> = b.split_whitespace().collect();

    let intersection: Vec<&str> = t1.intersection(&t2).copied().collect();
    let diff1: Vec<&str> = t1.difference(&t2).copied().collect();
    let diff2: Vec<&str> = t2.difference(&t1).copied().collect();

    let sect = intersection.join(" ");
    let combined1 = format!("{} {}", sect, diff1.join(" ")).trim().to_string();
    let combined2 = format!("{} {}", sect, diff2.join(" ")).trim().to_string();

    let score = |x: &str, y: &str| {
        if partial {
            partial_ratio(x, y)
        } else {
            ratio(x, y)
        }
    };

    score(&sect, &combined1)
        .max(score(&sect, &combined2))
        .max(score(&combined1, &combined2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Txn. Date "), "txn date");
        assert_eq!(normalize("Amount (INR)"), "amount inr");
        assert_eq!(normalize("---"), "");
    }

    #[test]
    fn test_identical_after_normalizing() {
        assert_eq!(weighted_ratio("Narration", "narration"), 100);
        assert_eq!(weighted_ratio("DATE", "date"), 100);
    }

    #[test]
    fn test_alias_inside_longer_header() {
        assert_eq!(weighted_ratio("date", "Value Date"), 90);
        assert!(weighted_ratio("deposit", "Amount Deposited") > 80);
    }

    #[test]
    fn test_distinct_words_stay_below_threshold() {
        assert!(weighted_ratio("debit", "Credit") <= 80);
        assert!(weighted_ratio("description", "Narration") <= 80);
        assert!(weighted_ratio("date", "01-04-2024") <= 80);
        assert!(weighted_ratio("date", "Closing Balance") <= 80);
    }

    #[test]
    fn test_empty_scores_zero() {
        assert_eq!(weighted_ratio("", "date"), 0);
        assert_eq!(weighted_ratio("date", "  "), 0);
        assert_eq!(ratio("", ""), 0);
    }

    #[test]
    fn test_ratio_and_partial() {
        assert_eq!(ratio("abcd", "abcd"), 100);
        assert_eq!(ratio("ab", "cd"), 0);
        assert_eq!(partial_ratio("date", "value date"), 100);
    }

    #[test]
    fn test_token_order_ignored() {
        assert_eq!(token_sort_ratio("date value", "value date", false), 100);
        assert!(weighted_ratio("date transaction", "transaction date") >= 95);
    }

    #[test]
    fn test_closure_as_similarity() {
        let exact = |a: &str, b: &str| -> u8 { if a == b { 100 } else { 0 } };
        assert_eq!(exact.score("x", "x"), 100);
        assert_eq!(exact.score("x", "y"), 0);
    }
}
