//! Fuzzy relevance scoring
//!
//! Scores fall into bands: exact match (1.0), prefix (0.8..1.0),
//! substring (0.6..0.8), then a per-token subsequence score averaged over
//! the tokens of the pattern.

/// Score `candidate` against `pattern` in `[0, 1]`
pub fn score(candidate: &str, pattern: &str) -> f64 {
    let candidate = normalize(candidate);
    let pattern = normalize(pattern);

    if candidate.is_empty() || pattern.is_empty() {
        return 0.0;
    }
    if candidate == pattern {
        return 1.0;
    }

    let proximity = pattern.chars().count() as f64 / candidate.chars().count() as f64;
    if candidate.starts_with(&pattern) {
        return (0.8 + 0.2 * proximity).clamp(0.0, 1.0);
    }
    if candidate.contains(&pattern) {
        return (0.6 + 0.2 * proximity).clamp(0.0, 1.0);
    }

    let candidate: Vec<char> = candidate.chars().collect();
    let tokens: Vec<Vec<char>> = pattern
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(|t| t.chars().collect())
        .collect();
    if tokens.is_empty() {
        return 0.0;
    }

    let total: f64 = tokens
        .iter()
        .map(|token| subsequence_score(&candidate, token))
        .sum();
    (total / tokens.len() as f64).clamp(0.0, 1.0)
}

/// Trim, collapse whitespace runs and case-fold
fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Greedy in-order match of every pattern character.
///
/// Zero if any character is missing; otherwise weighted by coverage,
/// longest consecutive block, density over the matched span, and a boost
/// when the match starts at the first character.
fn subsequence_score(text: &[char], pattern: &[char]) -> f64 {
    if text.is_empty() || pattern.is_empty() {
        return 0.0;
    }

    let mut first: Option<usize> = None;
    let mut last = 0;
    let mut next_start = 0;
    let mut best_block = 0;
    let mut current_block = 0;
    let mut matched = 0;

    for &c in pattern {
        let Some(offset) = text.get(next_start..).and_then(|rest| rest.iter().position(|&t| t == c)) else {
            return 0.0;
        };
        let found = next_start + offset;

        if first.is_none() {
            first = Some(found);
        }
        if found == next_start {
            current_block += 1;
        } else {
            current_block = 1;
        }
        best_block = best_block.max(current_block);
        last = found;
        next_start = found + 1;
        matched += 1;
    }

    let first = first.unwrap_or(0);
    let span = (last - first + 1).max(1);
    let len = pattern.len() as f64;

    let coverage = matched as f64 / len;
    let continuity = best_block as f64 / len;
    let density = matched as f64 / span as f64;
    let prefix_boost = if first == 0 { 0.15 } else { 0.0 };

    (0.45 * coverage + 0.35 * continuity + 0.20 * density + prefix_boost).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_exact_match() {
        assert_eq!(score("server", "server"), 1.0);
        assert_eq!(score("  My   Server ", "my server"), 1.0);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(score("", "x"), 0.0);
        assert_eq!(score("x", ""), 0.0);
        assert_eq!(score("x", "   "), 0.0);
    }

    #[test]
    fn test_prefix_band() {
        let s = score("server-prod", "server");
        assert!(close(s, 0.8 + 0.2 * 6.0 / 11.0));
        assert!(s >= 0.8 && s < 1.0);
    }

    #[test]
    fn test_substring_band() {
        let s = score("my-server", "server");
        assert!(close(s, 0.6 + 0.2 * 6.0 / 9.0));
        assert!(s >= 0.6 && s < 0.8);
    }

    #[test]
    fn test_prefix_beats_substring() {
        assert!(score("server-prod", "serv") > score("prod-server", "serv"));
    }

    #[test]
    fn test_subsequence() {
        // p0 d3 n9: one-char blocks, span 10, starts at 0
        let expected = 0.45 + 0.35 / 3.0 + 0.20 * 3.0 / 10.0 + 0.15;
        assert!(close(score("production", "pdn"), expected));
    }

    #[test]
    fn test_subsequence_requires_order() {
        assert_eq!(score("production", "ndp"), 0.0);
        assert_eq!(score("server", "xyz"), 0.0);
    }

    #[test]
    fn test_tokens_are_averaged() {
        let full = score("prod-web-01", "web zzz");
        assert!(close(full, 0.5));
    }

    #[test]
    fn test_range() {
        for (c, p) in [("a", "a"), ("abc", "ac"), ("alpha beta", "ab"), ("x", "yx")] {
            let s = score(c, p);
            assert!((0.0..=1.0).contains(&s), "{} vs {} = {}", c, p, s);
        }
    }
}
