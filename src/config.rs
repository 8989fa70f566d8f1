//! # Extractor Configuration Module
//!
//! This module defines the configuration for one extraction run: where the
//! dataset lives, which column holds the ingredients, the frequency filter
//! and the output destinations.

use std::path::{Path, PathBuf};

use crate::dataset::InputFormat;
use crate::errors::ExtractionError;

// Constants for extractor configuration
pub const DEFAULT_INPUT_PATH: &str = "RAW_recipes.csv";
pub const DEFAULT_INGREDIENT_COLUMN: &str = "ingredients";
pub const DEFAULT_MIN_FREQUENCY: u64 = 2;
pub const DEFAULT_TOP_N: usize = 1000;
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 10_000;
pub const DEFAULT_SUMMARY_LIMIT: usize = 20;
pub const DEFAULT_OUTPUT_PATH: &str = "ingredients_extracted.csv";
pub const DEFAULT_TOP_OUTPUT_PATH: &str = "ingredients_top1000.csv";

/// Configuration structure for an extraction run
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Recipe dataset to read
    pub input_path: PathBuf,
    /// Input encoding. If None, inferred from the input file extension
    pub input_format: Option<InputFormat>,
    /// Name of the column holding the ingredient list
    pub ingredient_column: String,
    /// Keys seen fewer times than this are dropped from the output tables
    pub min_frequency: u64,
    /// Number of rows kept in the head-truncated table
    pub top_n: usize,
    /// Log a progress line every this many rows (0 disables progress logging)
    pub progress_interval: u64,
    /// Number of entries listed in the console summary
    pub summary_limit: usize,
    /// Destination of the full filtered table
    pub output_path: PathBuf,
    /// Destination of the head-truncated table
    pub top_output_path: PathBuf,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            input_format: None,
            ingredient_column: DEFAULT_INGREDIENT_COLUMN.to_string(),
            min_frequency: DEFAULT_MIN_FREQUENCY,
            top_n: DEFAULT_TOP_N,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            summary_limit: DEFAULT_SUMMARY_LIMIT,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            top_output_path: PathBuf::from(DEFAULT_TOP_OUTPUT_PATH),
        }
    }
}

impl ExtractorConfig {
    /// Create a configuration reading from `input_path` with every other setting at its default
    pub fn for_input(input_path: impl AsRef<Path>) -> Self {
        Self {
            input_path: input_path.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// The input format to use, falling back to the one implied by the file extension
    pub fn resolved_format(&self) -> InputFormat {
        self.input_format
            .unwrap_or_else(|| InputFormat::from_path(&self.input_path))
    }

    /// Reject settings that would fail or clobber output midway through a run
    pub fn validate(&self) -> Result<(), ExtractionError> {
        if self.top_n == 0 {
            return Err(ExtractionError::InvalidConfig(
                "top_n must be at least 1".to_string(),
            ));
        }
        if self.output_path == self.top_output_path {
            return Err(ExtractionError::InvalidConfig(format!(
                "output and top output both point to {}",
                self.output_path.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExtractorConfig::default();
        assert_eq!(config.min_frequency, 2);
        assert_eq!(config.top_n, 1000);
        assert_eq!(config.progress_interval, 10_000);
        assert_eq!(config.summary_limit, 20);
        assert_eq!(config.ingredient_column, "ingredients");
        assert_eq!(config.input_path, PathBuf::from("RAW_recipes.csv"));
    }

    #[test]
    fn test_format_resolution() {
        let config = ExtractorConfig::for_input("recipes.jsonl");
        assert_eq!(config.resolved_format(), InputFormat::JsonLines);

        let config = ExtractorConfig {
            input_format: Some(InputFormat::Csv),
            ..ExtractorConfig::for_input("recipes.jsonl")
        };
        assert_eq!(config.resolved_format(), InputFormat::Csv);
    }

    #[test]
    fn test_validate() {
        assert!(ExtractorConfig::default().validate().is_ok());

        let config = ExtractorConfig {
            top_n: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ExtractionError::InvalidConfig(_))
        ));

        let config = ExtractorConfig {
            top_output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ExtractionError::InvalidConfig(_))
        ));
    }
}
