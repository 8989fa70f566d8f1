//! # Pipeline Module
//!
//! Runs one extraction end to end: read the dataset, aggregate canonical keys,
//! rank and filter them, write the two output tables and print the summary.

use std::io::Write;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::aggregator::{AggregationStats, Aggregator};
use crate::config::ExtractorConfig;
use crate::dataset::open_dataset;
use crate::reporter::{report, write_summary, SummaryCounts};

/// What one run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Whether the ingredient column was present in the input
    pub column_found: bool,
    /// Rows whose ingredient field could not be located or decoded
    pub malformed_rows: u64,
    /// Aggregation counters
    pub stats: AggregationStats,
    /// Distinct canonical keys before filtering
    pub unique_keys: usize,
    /// Distinct canonical keys that passed the frequency filter
    pub filtered_keys: usize,
    /// Rows written to the head-truncated table
    pub top_keys: usize,
    /// Whether the output tables were written
    pub outputs_written: bool,
}

/// Run the extraction described by `config`, writing the console summary to `out`
///
/// Invalid settings are rejected before any file is touched. Fatal errors
/// (unreadable input, unwritable output) are returned. An empty
/// result is not fatal: it is reported on `out` and in the log, and no output
/// file is written.
pub fn run<W: Write>(config: &ExtractorConfig, out: &mut W) -> Result<RunSummary> {
    config.validate()?;
    let format = config.resolved_format();
    info!("Reading {}...", config.input_path.display());

    let mut rows = open_dataset(&config.input_path, format, &config.ingredient_column)?;
    let aggregation = Aggregator::new(config.progress_interval)
        .try_aggregate(rows.by_ref())
        .with_context(|| format!("Failed while reading {}", config.input_path.display()))?;

    let dataset_stats = rows.stats();
    info!(
        "Loaded {} recipes ({} malformed)",
        dataset_stats.rows_read, dataset_stats.malformed_rows
    );

    let table = aggregation.table;
    let (filtered, top) = report(&table, config.min_frequency, config.top_n);

    let mut summary = RunSummary {
        column_found: rows.column_found(),
        malformed_rows: dataset_stats.malformed_rows,
        stats: aggregation.stats,
        unique_keys: table.len(),
        filtered_keys: filtered.len(),
        top_keys: top.len(),
        outputs_written: false,
    };

    let counts = SummaryCounts {
        total_mentions: table.total_mentions(),
        unique_keys: table.len(),
        filtered_keys: filtered.len(),
        min_frequency: config.min_frequency,
    };

    if filtered.is_empty() {
        let reason = if !summary.column_found {
            format!(
                "column '{}' was not found in {}",
                config.ingredient_column,
                config.input_path.display()
            )
        } else if table.is_empty() {
            "no ingredient names were extracted".to_string()
        } else {
            format!(
                "no ingredient appears at least {} times",
                config.min_frequency
            )
        };
        warn!("Empty result, no output files written: {}", reason);

        write_summary(out, &counts, &filtered, config.summary_limit)?;
        writeln!(out)?;
        writeln!(out, "WARNING: empty result ({reason}); no output files were written.")?;
        return Ok(summary);
    }

    filtered
        .write_csv(&config.output_path)
        .context("Failed to save filtered ingredient table")?;
    top.write_csv(&config.top_output_path)
        .context("Failed to save top ingredient table")?;
    summary.outputs_written = true;

    write_summary(out, &counts, &filtered, config.summary_limit)?;
    writeln!(out)?;
    writeln!(out, "Saved to: {}", config.output_path.display())?;
    writeln!(
        out,
        "Saved top {} to: {}",
        config.top_n,
        config.top_output_path.display()
    )?;

    Ok(summary)
}
