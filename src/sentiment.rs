// src/sentiment.rs
//
// Keyword-counting sentiment classifier. Intentionally coarse: exact token
// matches against two fixed lists, majority wins, ties are neutral. Negation
// ("not good"), sarcasm and multi-word phrases are out of contract.

use crate::types::Sentiment;

const POSITIVE_WORDS: &[&str] = &[
    "good",
    "great",
    "excellent",
    "amazing",
    "love",
    "best",
    "perfect",
    "awesome",
    "fantastic",
    "wonderful",
    "happy",
    "satisfied",
    "impressed",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "terrible",
    "awful",
    "horrible",
    "worst",
    "hate",
    "disappointed",
    "poor",
    "useless",
    "waste",
    "problem",
    "issue",
    "complaint",
];

/// Classify a piece of text. Pure and deterministic.
pub fn classify(text: &str) -> Sentiment {
    let mut positive = 0usize;
    let mut negative = 0usize;

    for tok in tokenize(text) {
        if POSITIVE_WORDS.contains(&tok.as_str()) {
            positive += 1;
        }
        if NEGATIVE_WORDS.contains(&tok.as_str()) {
            negative += 1;
        }
    }

    if positive > negative {
        Sentiment::Positive
    } else if negative > positive {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Lower-cased alphanumeric tokens, split on non-word boundaries.
fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn majority_positive_wins() {
        assert_eq!(
            classify("Great product, amazing support, one minor issue"),
            Sentiment::Positive
        );
    }

    #[test]
    fn majority_negative_wins() {
        assert_eq!(
            classify("Terrible quality and awful support, love the box though"),
            Sentiment::Negative
        );
    }

    #[test]
    fn tie_is_neutral() {
        assert_eq!(classify("good but bad"), Sentiment::Neutral);
    }

    #[test]
    fn empty_and_keyword_free_text_is_neutral() {
        assert_eq!(classify(""), Sentiment::Neutral);
        assert_eq!(classify("the quick brown fox"), Sentiment::Neutral);
    }

    #[test]
    fn matching_is_exact_token_not_substring() {
        // "goods" must not count as "good".
        assert_eq!(classify("goods badly"), Sentiment::Neutral);
    }

    #[test]
    fn punctuation_and_case_are_ignored() {
        assert_eq!(classify("GREAT!!! Simply great."), Sentiment::Positive);
    }
}
