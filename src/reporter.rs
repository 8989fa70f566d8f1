//! # Reporter Module
//!
//! Ranks the frequency table, applies the minimum-frequency filter and emits
//! the results: two CSV tables (`name`, `frequency`) and a console summary.
//!
//! CSV files are written atomically. Rows go to a temporary file next to the
//! destination, which is renamed over the destination only once everything
//! has been flushed, so a failed run never leaves a half-written table.

use std::io::{self, Write};
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::aggregator::FrequencyTable;
use crate::errors::ExtractionError;

/// One output row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientFrequency {
    /// Canonical ingredient key
    pub name: String,
    /// Number of occurrences across the dataset
    pub frequency: u64,
}

/// Ranked rows that passed the minimum-frequency filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredTable {
    rows: Vec<IngredientFrequency>,
}

impl FilteredTable {
    pub fn new(rows: Vec<IngredientFrequency>) -> Self {
        Self { rows }
    }

    /// The first `n` rows, in the same order
    pub fn head(&self, n: usize) -> FilteredTable {
        FilteredTable {
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IngredientFrequency> {
        self.rows.iter()
    }

    pub fn as_slice(&self) -> &[IngredientFrequency] {
        &self.rows
    }

    /// Write the table as CSV with a `name,frequency` header
    ///
    /// The destination is replaced atomically. An empty table is refused with
    /// [`ExtractionError::EmptyResult`] rather than producing an empty file.
    pub fn write_csv(&self, path: &Path) -> Result<(), ExtractionError> {
        if self.is_empty() {
            return Err(ExtractionError::EmptyResult(format!(
                "refusing to write an empty table to {}",
                path.display()
            )));
        }

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = NamedTempFile::new_in(dir).map_err(|e| ExtractionError::output(path, e))?;
        debug!("Writing {} rows to temporary file {}", self.len(), temp.path().display());

        let mut writer = csv::Writer::from_writer(temp);
        for row in &self.rows {
            writer
                .serialize(row)
                .map_err(|e| ExtractionError::output(path, e))?;
        }
        let temp = writer
            .into_inner()
            .map_err(|e| ExtractionError::output(path, e.error()))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| ExtractionError::output(path, e))?;
        temp.persist(path)
            .map_err(|e| ExtractionError::output(path, e.error))?;

        info!("Saved {} ingredients to: {}", self.len(), path.display());
        Ok(())
    }
}

impl<'a> IntoIterator for &'a FilteredTable {
    type Item = &'a IngredientFrequency;
    type IntoIter = std::slice::Iter<'a, IngredientFrequency>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Rank `table`, keep keys seen at least `min_frequency` times, and return the
/// full filtered table together with its first `top_n` rows
///
/// Ranking is by descending count; equal counts keep the order in which the
/// keys were first seen.
///
/// ```rust
/// use ingredient_extractor::aggregator::aggregate;
/// use ingredient_extractor::reporter::report;
///
/// let table = aggregate(["2 cups flour", "1 cup flour", "3 eggs, beaten"]);
/// let (filtered, top) = report(&table, 2, 1000);
/// assert_eq!(filtered.len(), 1);
/// assert_eq!(filtered.as_slice()[0].name, "flour");
/// assert_eq!(top, filtered);
/// ```
pub fn report(
    table: &FrequencyTable,
    min_frequency: u64,
    top_n: usize,
) -> (FilteredTable, FilteredTable) {
    let rows: Vec<IngredientFrequency> = table
        .ranked()
        .into_iter()
        .filter(|(_, count)| *count >= min_frequency)
        .map(|(name, frequency)| IngredientFrequency {
            name: name.to_string(),
            frequency,
        })
        .collect();

    info!(
        "Ingredients after filtering (frequency >= {}): {} of {}",
        min_frequency,
        rows.len(),
        table.len()
    );

    let filtered = FilteredTable::new(rows);
    let top = filtered.head(top_n);
    (filtered, top)
}

/// Totals shown at the top of the console summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryCounts {
    pub total_mentions: u64,
    pub unique_keys: usize,
    pub filtered_keys: usize,
    pub min_frequency: u64,
}

/// Format a count with thousands separators (`85746` -> `85,746`)
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

const RULE: &str = "============================================================";

/// Write the human-readable summary: totals, then the first `limit` ranked entries
pub fn write_summary<W: Write>(
    out: &mut W,
    counts: &SummaryCounts,
    filtered: &FilteredTable,
    limit: usize,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Total ingredient mentions: {}", format_count(counts.total_mentions))?;
    writeln!(out, "Unique ingredients: {}", format_count(counts.unique_keys as u64))?;
    writeln!(
        out,
        "Ingredients after filtering (frequency >= {}): {}",
        counts.min_frequency,
        format_count(counts.filtered_keys as u64)
    )?;

    if filtered.is_empty() || limit == 0 {
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Top {} Most Common Ingredients:", limit)?;
    writeln!(out, "{}", RULE)?;
    for (rank, entry) in filtered.iter().take(limit).enumerate() {
        writeln!(
            out,
            "{:2}. {:<30} (appears {} times)",
            rank + 1,
            entry.name,
            format_count(entry.frequency)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, u64)]) -> FrequencyTable {
        let mut table = FrequencyTable::new();
        for (key, n) in entries {
            table.record_n(*key, *n);
        }
        table
    }

    fn names(table: &FilteredTable) -> Vec<&str> {
        table.iter().map(|row| row.name.as_str()).collect()
    }

    #[test]
    fn test_report_sorts_and_filters() {
        let t = table(&[("milk", 1), ("salt", 5), ("flour", 3), ("eggs", 3)]);
        let (filtered, top) = report(&t, 2, 2);

        assert_eq!(names(&filtered), vec!["salt", "flour", "eggs"]);
        assert_eq!(names(&top), vec!["salt", "flour"]);
        assert_eq!(filtered.as_slice()[1].frequency, 3);
    }

    #[test]
    fn test_min_frequency_one_keeps_everything() {
        let t = table(&[("milk", 1), ("salt", 5)]);
        let (filtered, _) = report(&t, 1, 1000);
        assert_eq!(filtered.len(), 2);

        let (filtered, _) = report(&t, 2, 1000);
        assert_eq!(names(&filtered), vec!["salt"]);
    }

    #[test]
    fn test_head_larger_than_table() {
        let t = table(&[("salt", 5)]);
        let (filtered, top) = report(&t, 1, 1000);
        assert_eq!(top, filtered);
        assert!(filtered.head(0).is_empty());
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(85746), "85,746");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_summary_layout() {
        let t = table(&[("salt", 1500), ("olive oil", 20), ("milk", 1)]);
        let (filtered, _) = report(&t, 2, 1000);
        let counts = SummaryCounts {
            total_mentions: t.total_mentions(),
            unique_keys: t.len(),
            filtered_keys: filtered.len(),
            min_frequency: 2,
        };

        let mut out = Vec::new();
        write_summary(&mut out, &counts, &filtered, 20).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Total ingredient mentions: 1,521"));
        assert!(text.contains("Unique ingredients: 3"));
        assert!(text.contains("Ingredients after filtering (frequency >= 2): 2"));
        assert!(text.contains(&format!(" 1. {:<30} (appears 1,500 times)", "salt")));
        assert!(text.contains(" 2. olive oil"));
        assert!(!text.contains("milk"));
    }

    #[test]
    fn test_write_csv_roundtrip_and_refuses_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ingredients.csv");

        let t = table(&[("salt", 5), ("stir-fry vegetables", 2)]);
        let (filtered, _) = report(&t, 2, 1000);
        filtered.write_csv(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "name,frequency\nsalt,5\nstir-fry vegetables,2\n");

        let empty = FilteredTable::default();
        let other = dir.path().join("empty.csv");
        assert!(matches!(
            empty.write_csv(&other),
            Err(ExtractionError::EmptyResult(_))
        ));
        assert!(!other.exists());
    }

    #[test]
    fn test_write_csv_to_missing_directory_fails() {
        let t = table(&[("salt", 5)]);
        let (filtered, _) = report(&t, 1, 10);
        let result = filtered.write_csv(Path::new("/definitely/not/here/out.csv"));
        assert!(matches!(result, Err(ExtractionError::OutputWrite { .. })));
    }
}
