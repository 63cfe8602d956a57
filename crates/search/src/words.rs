//! Word-level matching between a food name and a query.
//!
//! Both functions are case-sensitive; callers lowercase first.

use crate::similarity::similarity_ratio;
use crate::tables::word;

/// Sum of per-word-pair bonuses, plus an order-preservation bonus.
///
/// Every (query word, name word) pair is scored independently: equal,
/// prefix, substring, or a rounded fuzzy bonus when the words are similar
/// enough. Empty input scores 0.
#[allow(clippy::cast_possible_truncation)]
pub fn word_match_score(name: &str, query: &str) -> i32 {
    let name_words: Vec<&str> = name.split_whitespace().collect();
    let query_words: Vec<&str> = query.split_whitespace().collect();

    if name_words.is_empty() || query_words.is_empty() {
        return 0;
    }

    let mut total = 0;
    for query_word in &query_words {
        for name_word in &name_words {
            total += pair_score(name_word, query_word);
        }
    }

    if preserves_order(&name_words, &query_words) {
        total += word::ORDER_PRESERVED;
    }

    total
}

#[allow(clippy::cast_possible_truncation)]
fn pair_score(name_word: &str, query_word: &str) -> i32 {
    if name_word == query_word {
        word::EXACT
    } else if name_word.starts_with(query_word) {
        word::PREFIX
    } else if name_word.contains(query_word) {
        word::CONTAINS
    } else {
        let sim = similarity_ratio(name_word, query_word);
        if sim > word::FUZZY_THRESHOLD {
            (sim * word::FUZZY_SCALE).round() as i32
        } else {
            0
        }
    }
}

/// Walk the name, advancing through the query whenever the current name
/// word equals or starts with the pending query word.
fn preserves_order(name_words: &[&str], query_words: &[&str]) -> bool {
    let mut next = 0;
    for name_word in name_words {
        if next == query_words.len() {
            break;
        }
        if name_word.starts_with(query_words[next]) {
            next += 1;
        }
    }
    next == query_words.len()
}

/// Whether `name` is a plain rendering of `query` with few extra words.
///
/// False when the name carries more than two words beyond the query's;
/// otherwise true when at least as many name words as query words equal or
/// start with some query word.
pub fn is_simple_clean_name(name: &str, query: &str) -> bool {
    let name_words: Vec<&str> = name.split_whitespace().collect();
    let query_words: Vec<&str> = query.split_whitespace().collect();

    if query_words.is_empty() {
        return false;
    }
    if name_words.len() > query_words.len() + word::CLEAN_NAME_EXTRA_WORDS {
        return false;
    }

    let matching = name_words
        .iter()
        .filter(|name_word| query_words.iter().any(|q| name_word.starts_with(q)))
        .count();

    matching >= query_words.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_words_in_order() {
        // two exact pairs + order bonus
        assert_eq!(word_match_score("chicken breast", "chicken breast"), 15 + 15 + 5);
    }

    #[test]
    fn test_words_out_of_order() {
        assert_eq!(word_match_score("breast chicken", "chicken breast"), 15 + 15);
    }

    #[test]
    fn test_prefix_and_contains() {
        // "chickens" starts with "chicken"; "oatmeal" contains "meal"
        assert_eq!(word_match_score("chickens", "chicken"), 12 + 5);
        assert_eq!(word_match_score("oatmeal", "meal"), 8);
    }

    #[test]
    fn test_fuzzy_word_bonus() {
        // similarity("yoghurt", "yogurt") = 1 - 1/7
        let expected = ((1.0 - 1.0 / 7.0) * 6.0_f64).round() as i32;
        assert_eq!(word_match_score("yoghurt", "yogurt"), expected);
        assert_eq!(word_match_score("rice", "bread"), 0);
    }

    #[test]
    fn test_pairs_are_additive() {
        // "milk" matches both "milk" words
        assert_eq!(word_match_score("milk chocolate milk", "milk"), 15 + 15 + 5);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(word_match_score("", "apple"), 0);
        assert_eq!(word_match_score("apple", ""), 0);
        assert_eq!(word_match_score("   ", "  "), 0);
    }

    #[test]
    fn test_clean_name() {
        assert!(is_simple_clean_name("chicken breast", "chicken breast"));
        assert!(is_simple_clean_name("chicken breast fillets", "chicken breast"));
        assert!(is_simple_clean_name("bananas", "banana"));
    }

    #[test]
    fn test_clean_name_too_many_words() {
        assert!(!is_simple_clean_name(
            "chicken nuggets breaded with extra crunch",
            "chicken"
        ));
    }

    #[test]
    fn test_clean_name_not_enough_matches() {
        assert!(!is_simple_clean_name("chicken nuggets", "chicken breast"));
        assert!(!is_simple_clean_name("apple", ""));
    }
}
