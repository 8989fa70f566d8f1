//! # Normalizer Module
//!
//! This module reduces a raw recipe-ingredient phrase to a canonical key by
//! stripping quantities, units of measure and preparation descriptors.
//!
//! ## Steps
//!
//! The transformations run in a fixed order, each on the output of the previous one:
//!
//! 1. Lowercase and trim
//! 2. Remove digit runs together with trailing spaces, slashes, hyphens and digits
//! 3. Remove whole-word units of measure ("cups", "tbsp", "cloves", ...)
//! 4. Remove whole-word preparation descriptors ("chopped", "to taste", "large", ...)
//! 5. Remove every character that is not a word character, whitespace or hyphen
//! 6. Collapse whitespace runs and trim
//!
//! Matching is whole-word, so "canned" survives the unit pass even though "can"
//! is a unit, and "freshly" survives the descriptor pass even though "fresh" is
//! a descriptor. Hyphenated names such as "stir-fry" keep their hyphen.

use log::trace;

use crate::normalizer_patterns::{
    MEASUREMENT_REGEX, PREPARATION_REGEX, PUNCTUATION_REGEX, QUANTITY_REGEX,
};

/// Keys shorter than this (in characters) are treated as noise and discarded
pub const MIN_KEY_LENGTH: usize = 3;

/// Normalize a raw ingredient phrase into its canonical key
///
/// Never fails. The worst case is an empty string, which callers treat as
/// "discard".
///
/// # Examples
///
/// ```rust
/// use ingredient_extractor::normalizer::normalize;
///
/// assert_eq!(normalize("2 cups sugar"), "sugar");
/// assert_eq!(normalize("1 1/2 pounds ground beef"), "beef");
/// assert_eq!(normalize("stir-fry vegetables"), "stir-fry vegetables");
/// assert_eq!(normalize("beaten"), "");
/// ```
pub fn normalize(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let text = lowered.trim();

    let text = QUANTITY_REGEX.replace_all(text, "");
    let text = MEASUREMENT_REGEX.replace_all(&text, "");
    let text = PREPARATION_REGEX.replace_all(&text, "");
    let text = PUNCTUATION_REGEX.replace_all(&text, "");

    let key = text.split_whitespace().collect::<Vec<&str>>().join(" ");

    trace!("Normalized ingredient phrase: '{}' -> '{}'", raw, key);
    key
}

/// Whether a canonical key is long enough to be counted
pub fn is_meaningful_key(key: &str) -> bool {
    key.chars().count() >= MIN_KEY_LENGTH
}

/// Normalize `raw` and keep the result only if it is a meaningful key
///
/// ```rust
/// use ingredient_extractor::normalizer::canonical_key;
///
/// assert_eq!(canonical_key("3 eggs"), Some("eggs".to_string()));
/// assert_eq!(canonical_key("2 oz"), None);
/// ```
pub fn canonical_key(raw: &str) -> Option<String> {
    let key = normalize(raw);
    is_meaningful_key(&key).then_some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_units() {
        assert_eq!(normalize("2 cups sugar"), "sugar");
        assert_eq!(normalize("1 tbsp olive oil"), "olive oil");
        assert_eq!(normalize("500 g butter"), "butter");
        assert_eq!(normalize("2 LBS Potatoes"), "potatoes");
    }

    #[test]
    fn test_strips_quantities_and_fractions() {
        assert_eq!(normalize("1 1/2 pounds ground beef"), "beef");
        assert_eq!(normalize("1-1/2 cups milk"), "milk");
        assert_eq!(normalize("3 eggs"), "eggs");
    }

    #[test]
    fn test_strips_preparation_words() {
        assert_eq!(normalize("1 large onion, diced"), "onion");
        assert_eq!(normalize("salt to taste"), "salt");
        assert_eq!(normalize("water as needed"), "water");
    }

    #[test]
    fn test_whole_word_matching() {
        // "can" is a unit but "canned" is a descriptor, each removed on its own pass
        assert_eq!(normalize("1 can canned tomatoes"), "tomatoes");
        assert_eq!(normalize("candied ginger"), "candied ginger");
        assert_eq!(
            normalize("freshly chopped fresh basil leaves"),
            "freshly basil leaves"
        );
    }

    #[test]
    fn test_keeps_hyphens_drops_punctuation() {
        assert_eq!(normalize("stir-fry vegetables"), "stir-fry vegetables");
        assert_eq!(normalize("flour (all-purpose)."), "flour all-purpose");
        assert_eq!(normalize("  Baker's   Chocolate "), "bakers chocolate");
    }

    #[test]
    fn test_empty_results() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("beaten"), "");
        assert_eq!(normalize("2 oz"), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_short_keys_are_not_meaningful() {
        assert!(!is_meaningful_key(""));
        assert!(!is_meaningful_key("ab"));
        assert!(is_meaningful_key("egg"));
        assert_eq!(canonical_key("1 oz ab"), None);
        assert_eq!(canonical_key("2 cups flour"), Some("flour".to_string()));
    }

    #[test]
    fn test_normalize_is_pure() {
        let phrase = "2 cloves garlic, minced";
        assert_eq!(normalize(phrase), normalize(phrase));
        assert_eq!(normalize(phrase), "garlic");
    }
}
