//! # Aggregator Module
//!
//! Streams dataset rows through the record extractor and the normalizer and
//! counts how often each canonical key occurs. Only the running table is kept;
//! raw phrases are dropped as soon as they are counted.

use std::collections::HashMap;
use std::convert::Infallible;

use log::{debug, info};

use crate::config::DEFAULT_PROGRESS_INTERVAL;
use crate::normalizer::canonical_key;
use crate::record_extractor::{extract, IngredientField};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct KeyCount {
    count: u64,
    /// Insertion ordinal, used to break ties between equal counts
    first_seen: usize,
}

/// Mapping from canonical key to the number of times it was seen
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    counts: HashMap<String, KeyCount>,
    total_mentions: u64,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `key`
    pub fn record(&mut self, key: impl Into<String>) {
        self.record_n(key, 1);
    }

    /// Count `n` occurrences of `key`. A zero count is ignored.
    pub fn record_n(&mut self, key: impl Into<String>, n: u64) {
        if n == 0 {
            return;
        }
        let next_ordinal = self.counts.len();
        let entry = self.counts.entry(key.into()).or_insert(KeyCount {
            count: 0,
            first_seen: next_ordinal,
        });
        entry.count += n;
        self.total_mentions += n;
    }

    /// Occurrences of `key`, zero if never seen
    pub fn count(&self, key: &str) -> u64 {
        self.counts.get(key).map_or(0, |c| c.count)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts
    pub fn total_mentions(&self) -> u64 {
        self.total_mentions
    }

    /// Entries in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(key, c)| (key.as_str(), c.count))
    }

    /// Add every count from `other` into this table
    ///
    /// Counts are summed, so merging per-worker tables gives the same totals
    /// whatever the split. Keys new to this table are ordered after the existing
    /// ones, in the order `other` first saw them.
    pub fn merge(&mut self, other: FrequencyTable) {
        let mut incoming: Vec<(String, KeyCount)> = other.counts.into_iter().collect();
        incoming.sort_unstable_by_key(|(_, c)| c.first_seen);
        for (key, c) in incoming {
            self.record_n(key, c.count);
        }
    }

    /// Entries by descending count; equal counts keep first-seen order
    pub fn ranked(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, KeyCount)> = self
            .counts
            .iter()
            .map(|(key, c)| (key.as_str(), *c))
            .collect();
        entries.sort_unstable_by(|(_, a), (_, b)| {
            b.count.cmp(&a.count).then(a.first_seen.cmp(&b.first_seen))
        });
        entries.into_iter().map(|(key, c)| (key, c.count)).collect()
    }
}

/// Counters describing one aggregation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationStats {
    /// Rows consumed
    pub rows_processed: u64,
    /// Rows that produced no raw phrase at all
    pub rows_without_phrases: u64,
    /// Raw phrases produced by the record extractor
    pub phrases_extracted: u64,
    /// Phrases whose canonical key was too short to keep
    pub keys_discarded: u64,
    /// Phrases counted in the table
    pub mentions_counted: u64,
}

impl AggregationStats {
    pub fn merge(&mut self, other: &AggregationStats) {
        self.rows_processed += other.rows_processed;
        self.rows_without_phrases += other.rows_without_phrases;
        self.phrases_extracted += other.phrases_extracted;
        self.keys_discarded += other.keys_discarded;
        self.mentions_counted += other.mentions_counted;
    }
}

/// Result of an aggregation pass
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub table: FrequencyTable,
    pub stats: AggregationStats,
}

/// Builds a [`FrequencyTable`] from a stream of rows
#[derive(Debug, Clone)]
pub struct Aggregator {
    /// Log progress every this many rows; 0 disables progress logging
    progress_interval: u64,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRESS_INTERVAL)
    }
}

impl Aggregator {
    pub fn new(progress_interval: u64) -> Self {
        Self { progress_interval }
    }

    /// Aggregate rows that cannot fail
    pub fn aggregate<I>(&self, rows: I) -> Aggregation
    where
        I: IntoIterator,
        I::Item: Into<IngredientField>,
    {
        let rows = rows.into_iter().map(|row| Ok::<_, Infallible>(row.into()));
        match self.try_aggregate(rows) {
            Ok(aggregation) => aggregation,
            Err(never) => match never {},
        }
    }

    /// Aggregate rows from a source that may hit a fatal error
    ///
    /// The first `Err` stops the pass and is returned as-is.
    pub fn try_aggregate<I, E>(&self, rows: I) -> Result<Aggregation, E>
    where
        I: IntoIterator<Item = Result<IngredientField, E>>,
    {
        let mut aggregation = Aggregation::default();

        for row in rows {
            self.absorb_row(row?, &mut aggregation);

            let stats = &aggregation.stats;
            if self.progress_interval > 0 && stats.rows_processed % self.progress_interval == 0 {
                info!(
                    "Processed {} recipes ({} ingredient mentions, {} unique so far)",
                    stats.rows_processed,
                    stats.mentions_counted,
                    aggregation.table.len()
                );
            }
        }

        info!(
            "Aggregation complete: {} rows, {} phrases, {} counted, {} discarded, {} unique ingredients",
            aggregation.stats.rows_processed,
            aggregation.stats.phrases_extracted,
            aggregation.stats.mentions_counted,
            aggregation.stats.keys_discarded,
            aggregation.table.len()
        );
        Ok(aggregation)
    }

    fn absorb_row(&self, field: IngredientField, aggregation: &mut Aggregation) {
        let stats = &mut aggregation.stats;
        stats.rows_processed += 1;

        let mut phrases = 0u64;
        for phrase in extract(field) {
            phrases += 1;
            match canonical_key(&phrase) {
                Some(key) => {
                    aggregation.table.record(key);
                    stats.mentions_counted += 1;
                }
                None => stats.keys_discarded += 1,
            }
        }

        stats.phrases_extracted += phrases;
        if phrases == 0 {
            debug!("Row {} produced no ingredient phrases", stats.rows_processed);
            stats.rows_without_phrases += 1;
        }
    }
}

/// Count canonical keys across `rows` with the default aggregator
///
/// ```rust
/// use ingredient_extractor::aggregator::aggregate;
///
/// let table = aggregate(["2 cups flour", "1 cup flour", "3 eggs, beaten"]);
/// assert_eq!(table.count("flour"), 2);
/// assert_eq!(table.count("eggs"), 1);
/// assert_eq!(table.len(), 2);
/// ```
pub fn aggregate<I>(rows: I) -> FrequencyTable
where
    I: IntoIterator,
    I::Item: Into<IngredientField>,
{
    Aggregator::default().aggregate(rows).table
}
