//! Token-sort ratio: an order-insensitive name similarity on a 0-100 scale.
//!
//! Both strings are split on whitespace, their tokens sorted and re-joined with
//! single spaces, and the results compared with a normalized InDel similarity:
//! `100 * 2 * LCS / (len_a + len_b)`, counted in chars.

/// Sort whitespace tokens and re-join them as a char sequence.
pub fn sorted_tokens(text: &str) -> Vec<char> {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ").chars().collect()
}

/// Similarity of two strings after token sorting.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    indel_ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Normalized InDel similarity of two char sequences, 0-100.
///
/// Two empty sequences are identical (100); one empty sequence scores 0.
pub fn indel_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    let lcs = lcs_len(a, b);
    100.0 * (2 * lcs) as f64 / total as f64
}

/// Length of the longest common subsequence, two-row DP.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };

    let mut prev = vec![0usize; short.len() + 1];
    let mut curr = vec![0usize; short.len() + 1];

    for &lc in long {
        for (j, &sc) in short.iter().enumerate() {
            curr[j + 1] = if lc == sc {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}
