//! String similarity scoring used by the fuzzy and distance tiers.
//!
//! Both measures work on Unicode scalar values and are symmetric. Callers are
//! expected to case-fold first (see [`super::normalize::fold_case`]).

/// Scoring backend for the matcher. The default is [`EditScorer`]; tests
/// swap in table-driven scorers to pin exact scores.
pub trait Scorer {
    /// Similarity on a 0–100 scale, 100 meaning identical.
    fn ratio(&self, a: &str, b: &str) -> u8;

    /// Edit distance, 0 meaning identical.
    fn distance(&self, a: &str, b: &str) -> usize;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EditScorer;

impl Scorer for EditScorer {
    fn ratio(&self, a: &str, b: &str) -> u8 {
        similarity_ratio(a, b)
    }

    fn distance(&self, a: &str, b: &str) -> usize {
        levenshtein_distance(a, b)
    }
}

/// Indel similarity ratio: `(len_a + len_b - indel_distance) / (len_a + len_b)`
/// scaled to 0–100 and rounded half-to-even. Two empty strings score 100.
pub fn similarity_ratio(a: &str, b: &str) -> u8 {
    let chars_a: Vec<char> = a.chars().collect();
    let chars_b: Vec<char> = b.chars().collect();
    let len_sum = chars_a.len() + chars_b.len();
    if len_sum == 0 {
        return 100;
    }

    // Indel distance counts a substitution as delete + insert.
    let lcs = longest_common_subsequence(&chars_a, &chars_b);
    let indel = len_sum - 2 * lcs;
    if indel == 0 {
        return 100;
    }

    let ratio = (len_sum - indel) as f64 / len_sum as f64;
    (ratio * 100.0).round_ties_even() as u8
}

/// Calculate Levenshtein distance between two strings.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let chars_a: Vec<char> = a.chars().collect();
    let chars_b: Vec<char> = b.chars().collect();

    if chars_a.is_empty() {
        return chars_b.len();
    }
    if chars_b.is_empty() {
        return chars_a.len();
    }

    let mut previous: Vec<usize> = (0..=chars_b.len()).collect();
    let mut current = vec![0; chars_b.len() + 1];

    for (i, ca) in chars_a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in chars_b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[chars_b.len()]
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];

    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            current[j + 1] = if ca == cb {
                previous[j] + 1
            } else {
                previous[j + 1].max(current[j])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", "abc"), 0);
        assert_eq!(levenshtein_distance("abc", ""), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("portal 2", "portal"), 2);
    }

    #[test]
    fn test_levenshtein_counts_chars_not_bytes() {
        assert_eq!(levenshtein_distance("ōkami", "okami"), 1);
    }

    #[test]
    fn test_ratio_identical_and_disjoint() {
        assert_eq!(similarity_ratio("", ""), 100);
        assert_eq!(similarity_ratio("celeste", "celeste"), 100);
        assert_eq!(similarity_ratio("abc", "xyz"), 0);
        assert_eq!(similarity_ratio("abc", ""), 0);
    }

    #[test]
    fn test_ratio_known_values() {
        assert_eq!(similarity_ratio("kitten", "sitting"), 62);
        // 2 * 6 / 14 = 85.71
        assert_eq!(similarity_ratio("portal", "portal 2"), 86);
    }

    #[test]
    fn test_ratio_rounds_half_to_even() {
        // 2 * 2 / 6 = 66.67 -> 67
        assert_eq!(similarity_ratio("ab", "abxy"), 67);
        // 2 * 1 / 8 = 25.0 exactly
        assert_eq!(similarity_ratio("a", "abcdefg"), 25);
        // 2 * 5 / 16 = 62.5 -> 62 (ties to even)
        assert_eq!(similarity_ratio("abcde", "abcdefghijk"), 62);
    }

    #[test]
    fn test_ratio_is_symmetric() {
        let pairs = [("hades", "hades ii"), ("dead cells", "dead space"), ("a", "ba")];
        for (a, b) in pairs {
            assert_eq!(similarity_ratio(a, b), similarity_ratio(b, a));
        }
    }
}
