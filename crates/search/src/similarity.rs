//! Edit distance and similarity ratio.

/// Calculate Levenshtein edit distance between two strings.
///
/// Insertions, deletions and substitutions each cost 1. The full
/// `(len(b) + 1) x (len(a) + 1)` matrix is kept; names are short, so the
/// quadratic space is not a concern.
///
/// # Arguments
/// * `a` - First string
/// * `b` - Second string
///
/// # Returns
/// Number of single-character edits needed to transform a into b
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let mut matrix = vec![vec![0usize; a_chars.len() + 1]; b_chars.len() + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in matrix[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=b_chars.len() {
        for j in 1..=a_chars.len() {
            matrix[i][j] = if b_chars[i - 1] == a_chars[j - 1] {
                matrix[i - 1][j - 1]
            } else {
                1 + matrix[i - 1][j - 1]
                    .min(matrix[i][j - 1])
                    .min(matrix[i - 1][j])
            };
        }
    }

    matrix[b_chars.len()][a_chars.len()]
}

/// Similarity in `[0, 1]` derived from the edit distance.
///
/// `1 - distance / max(len(a), len(b))`, measured in characters. Two empty
/// strings have similarity 0, not 1: there is nothing to match.
#[allow(clippy::cast_precision_loss)]
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 0.0;
    }

    1.0 - edit_distance(a, b) as f64 / longest as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_edit_distance_same() {
        assert_eq!(edit_distance("banana", "banana"), 0);
    }

    #[test]
    fn test_edit_distance_substitution() {
        assert_eq!(edit_distance("yogurt", "yoghurt"), 1);
        assert_eq!(edit_distance("flavor", "flavour"), 1);
    }

    #[test]
    fn test_edit_distance_classic() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn test_edit_distance_empty() {
        assert_eq!(edit_distance("", "rice"), 4);
        assert_eq!(edit_distance("rice", ""), 4);
        assert_eq!(edit_distance("", ""), 0);
    }

    #[test]
    fn test_edit_distance_counts_chars_not_bytes() {
        assert_eq!(edit_distance("café", "cafe"), 1);
        assert_eq!(edit_distance("crème", "creme"), 1);
    }

    #[test]
    fn test_similarity_ratio_bounds() {
        assert_eq!(similarity_ratio("oats", "oats"), 1.0);
        assert_eq!(similarity_ratio("", ""), 0.0);
        assert_eq!(similarity_ratio("abc", "xyz"), 0.0);
        assert!((similarity_ratio("kitten", "sitting") - (1.0 - 3.0 / 7.0)).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_distance_to_self_is_zero(s in "\\PC{0,24}") {
            prop_assert_eq!(edit_distance(&s, &s), 0);
        }

        #[test]
        fn prop_distance_is_symmetric(a in "\\PC{0,16}", b in "\\PC{0,16}") {
            prop_assert_eq!(edit_distance(&a, &b), edit_distance(&b, &a));
        }

        #[test]
        fn prop_distance_bounded_by_longer_len(a in "[a-z ]{0,16}", b in "[a-z ]{0,16}") {
            let longest = a.chars().count().max(b.chars().count());
            prop_assert!(edit_distance(&a, &b) <= longest);
        }

        #[test]
        fn prop_similarity_in_unit_interval(a in "\\PC{0,16}", b in "\\PC{0,16}") {
            let ratio = similarity_ratio(&a, &b);
            prop_assert!((0.0..=1.0).contains(&ratio));
        }

        #[test]
        fn prop_similarity_to_self_is_one(s in "\\PC{1,24}") {
            prop_assert_eq!(similarity_ratio(&s, &s), 1.0);
        }
    }
}
