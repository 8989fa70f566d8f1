//! # Record Extractor Module
//!
//! Turns the ingredient field of one dataset row into raw ingredient phrases.
//!
//! A field arrives in one of three shapes, modelled by [`IngredientField`]:
//! missing, already a list of phrases, or a single string. A string is first
//! interpreted as a list encoding (a JSON array, or a bracketed list literal
//! with single- or double-quoted items such as `['salt', "baker's chocolate"]`)
//! and otherwise split on commas, semicolons and newlines.
//!
//! Malformed data never aborts a run: whatever cannot be interpreted yields
//! fewer phrases (possibly none) and extraction moves on.

use log::trace;
use serde_json::Value;

/// Cell contents that tabular exports use for a missing value
pub const NULL_MARKERS: &[&str] = &[
    "", "nan", "NaN", "-nan", "-NaN", "NA", "N/A", "n/a", "<NA>", "#N/A", "#NA", "null", "NULL",
    "None",
];

/// Ingredient field of one dataset row
#[derive(Debug, Clone, PartialEq)]
pub enum IngredientField {
    /// Missing or null value
    Absent,
    /// Already split into individual phrases
    Sequence(Vec<String>),
    /// A single string, possibly a list encoding
    Text(String),
}

impl IngredientField {
    /// Interpret a raw tabular cell
    ///
    /// ```rust
    /// use ingredient_extractor::record_extractor::IngredientField;
    ///
    /// assert_eq!(IngredientField::from_cell("NaN"), IngredientField::Absent);
    /// assert_eq!(
    ///     IngredientField::from_cell("['salt']"),
    ///     IngredientField::Text("['salt']".to_string())
    /// );
    /// ```
    pub fn from_cell(cell: &str) -> Self {
        if NULL_MARKERS.contains(&cell.trim()) {
            IngredientField::Absent
        } else {
            IngredientField::Text(cell.to_string())
        }
    }

    /// Interpret a JSON value. Non-string list entries are dropped; scalars
    /// other than strings carry no ingredients.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::String(text) => IngredientField::Text(text),
            Value::Array(items) => IngredientField::Sequence(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(text) => Some(text),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => IngredientField::Absent,
        }
    }
}

impl From<&str> for IngredientField {
    fn from(text: &str) -> Self {
        IngredientField::Text(text.to_string())
    }
}

impl From<String> for IngredientField {
    fn from(text: String) -> Self {
        IngredientField::Text(text)
    }
}

impl From<Vec<String>> for IngredientField {
    fn from(items: Vec<String>) -> Self {
        IngredientField::Sequence(items)
    }
}

impl From<Option<String>> for IngredientField {
    fn from(value: Option<String>) -> Self {
        value.map_or(IngredientField::Absent, IngredientField::Text)
    }
}

/// Single-pass sequence of trimmed, non-empty raw phrases from one row
#[derive(Debug)]
pub struct RawPhrases {
    entries: std::vec::IntoIter<String>,
}

impl RawPhrases {
    fn new(entries: Vec<String>) -> Self {
        Self {
            entries: entries.into_iter(),
        }
    }
}

impl Iterator for RawPhrases {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        for entry in self.entries.by_ref() {
            let trimmed = entry.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.entries.size_hint().1)
    }
}

/// Yield the raw ingredient phrases held by one row's ingredient field
///
/// ```rust
/// use ingredient_extractor::record_extractor::{extract, IngredientField};
///
/// let phrases: Vec<String> = extract(IngredientField::from("3 eggs, beaten")).collect();
/// assert_eq!(phrases, vec!["3 eggs", "beaten"]);
///
/// let phrases: Vec<String> = extract(IngredientField::from("['2 cups flour', 'salt']")).collect();
/// assert_eq!(phrases, vec!["2 cups flour", "salt"]);
///
/// assert_eq!(extract(IngredientField::Absent).count(), 0);
/// ```
pub fn extract(field: IngredientField) -> RawPhrases {
    match field {
        IngredientField::Absent => RawPhrases::new(Vec::new()),
        IngredientField::Sequence(items) => RawPhrases::new(items),
        IngredientField::Text(text) => RawPhrases::new(interpret_text(&text)),
    }
}

/// Split a textual ingredient field into entries, trying list encodings first
pub fn interpret_text(text: &str) -> Vec<String> {
    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(text) {
        trace!("Interpreted field as JSON array with {} entries", items.len());
        return items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text),
                _ => None,
            })
            .collect();
    }

    if let Some(items) = parse_list_literal(text) {
        trace!("Interpreted field as list literal with {} entries", items.len());
        return items;
    }

    trace!("Falling back to delimiter split for field: '{}'", text);
    text.split(&[',', ';', '\n'][..]).map(str::to_string).collect()
}

/// Parse a bracketed list of quoted strings, e.g. `['a', "b's"]`
///
/// Items may be quoted with `'` or `"`; backslash escapes the next character.
/// Returns None as soon as the text stops looking like such a list.
pub fn parse_list_literal(text: &str) -> Option<Vec<String>> {
    let inner = text.trim().strip_prefix('[')?.strip_suffix(']')?;
    let mut chars = inner.chars().peekable();
    let mut items = Vec::new();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let quote = match chars.next() {
            None => break,
            Some(q @ ('\'' | '"')) => q,
            Some(_) => return None,
        };

        let mut item = String::new();
        loop {
            match chars.next()? {
                '\\' => item.push(match chars.next()? {
                    'n' => '\n',
                    't' => '\t',
                    other => other,
                }),
                c if c == quote => break,
                c => item.push(c),
            }
        }
        items.push(item);

        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        match chars.next() {
            None => break,
            Some(',') => continue,
            Some(_) => return None,
        }
    }

    Some(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phrases(field: IngredientField) -> Vec<String> {
        extract(field).collect()
    }

    #[test]
    fn test_absent_yields_nothing() {
        assert!(phrases(IngredientField::Absent).is_empty());
        assert!(phrases(IngredientField::from_cell("")).is_empty());
        assert!(phrases(IngredientField::from_cell(" nan ")).is_empty());
        assert!(phrases(IngredientField::from(None::<String>)).is_empty());
    }

    #[test]
    fn test_sequence_entries_are_trimmed_and_filtered() {
        let field = IngredientField::Sequence(vec![
            "  salt ".to_string(),
            "".to_string(),
            "   ".to_string(),
            "pepper".to_string(),
        ]);
        assert_eq!(phrases(field), vec!["salt", "pepper"]);
    }

    #[test]
    fn test_python_style_list_literal() {
        let field = IngredientField::from(r#"['winter squash', "baker's chocolate", 'salt']"#);
        assert_eq!(
            phrases(field),
            vec!["winter squash", "baker's chocolate", "salt"]
        );
    }

    #[test]
    fn test_json_array_keeps_only_strings() {
        let field = IngredientField::from(r#"["flour", 3, null, "sugar"]"#);
        assert_eq!(phrases(field), vec!["flour", "sugar"]);
    }

    #[test]
    fn test_delimiter_fallback() {
        let field = IngredientField::from("2 cups flour; 1 egg\nmilk,,");
        assert_eq!(phrases(field), vec!["2 cups flour", "1 egg", "milk"]);
    }

    #[test]
    fn test_malformed_list_falls_back_to_split() {
        // Unterminated quote: not a list literal, so the comma split applies
        let field = IngredientField::from("['salt', 'pepp");
        assert_eq!(phrases(field), vec!["['salt'", "'pepp"]);
    }

    #[test]
    fn test_list_literal_parser() {
        assert_eq!(parse_list_literal("[]"), Some(vec![]));
        assert_eq!(
            parse_list_literal(r"['it\'s', 'a',]"),
            Some(vec!["it's".to_string(), "a".to_string()])
        );
        assert_eq!(parse_list_literal("['a' 'b']"), None);
        assert_eq!(parse_list_literal("[a, b]"), None);
        assert_eq!(parse_list_literal("'a', 'b'"), None);
        assert_eq!(parse_list_literal("[,]"), None);
    }

    #[test]
    fn test_from_conversions() {
        let items = vec!["2 cups flour".to_string(), " ".to_string()];
        assert_eq!(
            IngredientField::from(items.clone()),
            IngredientField::Sequence(items.clone())
        );
        let phrases: Vec<String> = extract(items.into()).collect();
        assert_eq!(phrases, vec!["2 cups flour"]);
        assert_eq!(IngredientField::from(None::<String>), IngredientField::Absent);
    }

    #[test]
    fn test_from_json() {
        assert_eq!(IngredientField::from_json(Value::Null), IngredientField::Absent);
        assert_eq!(
            IngredientField::from_json(serde_json::json!(42)),
            IngredientField::Absent
        );
        assert_eq!(
            IngredientField::from_json(serde_json::json!(["a", 1, "b"])),
            IngredientField::Sequence(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(
            IngredientField::from_json(serde_json::json!("a, b")),
            IngredientField::Text("a, b".to_string())
        );
    }
}
