//! # Normalizer Patterns Module
//!
//! This module contains the word lists and regex patterns used to reduce a raw
//! ingredient phrase to its canonical key.

use lazy_static::lazy_static;
use regex::Regex;

/// Units of measure removed as whole words. Singular, plural and abbreviated
/// spellings are separate entries.
pub const MEASUREMENT_TERMS: &[&str] = &[
    "cup", "cups", "tablespoon", "tablespoons", "tbsp", "teaspoon", "teaspoons", "tsp",
    "pound", "pounds", "lb", "lbs", "ounce", "ounces", "oz", "gram", "grams", "g",
    "kilogram", "kilograms", "kg", "milliliter", "milliliters", "ml", "liter", "liters",
    "pinch", "dash", "clove", "cloves", "package", "packages", "can", "cans",
    "slice", "slices", "piece", "pieces", "bunch", "bunches",
];

/// Preparation and size descriptors removed as whole words, after the units
pub const PREPARATION_TERMS: &[&str] = &[
    "fresh", "dried", "frozen", "canned", "chopped", "diced", "minced", "sliced",
    "grated", "shredded", "melted", "softened", "beaten", "crushed", "ground",
    "peeled", "seeded", "trimmed", "optional", "to taste", "as needed",
    "large", "small", "medium", "whole", "half", "quarter",
];

/// Digit runs plus any spaces, slashes, hyphens or digits trailing them ("1-1/2 ", "2 1/2 ")
pub const QUANTITY_PATTERN: &str = r"\d+[\s/\-\d]*";

/// Anything that is not a word character, whitespace or hyphen
pub const PUNCTUATION_PATTERN: &str = r"[^\w\s\-]";

/// Build a case-insensitive alternation matching any of `terms` as a whole word
pub fn whole_word_pattern(terms: &[&str]) -> String {
    let alternatives = terms
        .iter()
        .map(|term| regex::escape(term))
        .collect::<Vec<_>>()
        .join("|");
    format!(r"(?i)\b(?:{alternatives})\b")
}

// Lazy static regexes so every call to `normalize` reuses the compiled automata
lazy_static! {
    pub static ref QUANTITY_REGEX: Regex =
        Regex::new(QUANTITY_PATTERN).expect("Quantity pattern should be valid");
    pub static ref MEASUREMENT_REGEX: Regex = Regex::new(&whole_word_pattern(MEASUREMENT_TERMS))
        .expect("Measurement pattern should be valid");
    pub static ref PREPARATION_REGEX: Regex = Regex::new(&whole_word_pattern(PREPARATION_TERMS))
        .expect("Preparation pattern should be valid");
    pub static ref PUNCTUATION_REGEX: Regex =
        Regex::new(PUNCTUATION_PATTERN).expect("Punctuation pattern should be valid");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_word_pattern_escapes_terms() {
        assert_eq!(whole_word_pattern(&["a.b", "to taste"]), r"(?i)\b(?:a\.b|to taste)\b");
    }

    #[test]
    fn test_measurement_regex_prefers_longer_term_when_needed() {
        // "can" fails the trailing boundary inside "cans", so the alternation moves on
        let m = MEASUREMENT_REGEX.find("cans").unwrap();
        assert_eq!(m.as_str(), "cans");
        assert!(MEASUREMENT_REGEX.find("canned").is_none());
    }

    #[test]
    fn test_quantity_regex_swallows_fractions() {
        let m = QUANTITY_REGEX.find("1-1/2 cups").unwrap();
        assert_eq!(m.as_str(), "1-1/2 ");
    }

    #[test]
    fn test_word_lists_have_no_duplicates() {
        for list in [MEASUREMENT_TERMS, PREPARATION_TERMS] {
            let mut seen = std::collections::HashSet::new();
            for term in list {
                assert!(seen.insert(term), "duplicate term {term}");
            }
        }
    }
}
