use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

use ingredient_extractor::config::{
    ExtractorConfig, DEFAULT_INGREDIENT_COLUMN, DEFAULT_INPUT_PATH, DEFAULT_MIN_FREQUENCY,
    DEFAULT_OUTPUT_PATH, DEFAULT_PROGRESS_INTERVAL, DEFAULT_SUMMARY_LIMIT, DEFAULT_TOP_N,
    DEFAULT_TOP_OUTPUT_PATH,
};
use ingredient_extractor::dataset::InputFormat;
use ingredient_extractor::pipeline;

/// Command-line arguments for ingredient-extractor
#[derive(Parser, Debug)]
#[command(name = "ingredient-extractor")]
#[command(about = "Extract, normalize and frequency-rank ingredient names from a recipe dataset")]
#[command(version)]
struct Args {
    /// Recipe dataset (CSV with a header row, or JSON Lines)
    #[arg(short, long, default_value = DEFAULT_INPUT_PATH, env = "INGREDIENTS_INPUT")]
    input: PathBuf,

    /// Input format: csv or jsonl. Inferred from the file extension when omitted
    #[arg(short, long, env = "INGREDIENTS_FORMAT")]
    format: Option<InputFormat>,

    /// Column holding the ingredient list
    #[arg(short, long, default_value = DEFAULT_INGREDIENT_COLUMN, env = "INGREDIENTS_COLUMN")]
    column: String,

    /// Drop ingredients seen fewer times than this
    #[arg(long, default_value_t = DEFAULT_MIN_FREQUENCY, env = "INGREDIENTS_MIN_FREQUENCY")]
    min_frequency: u64,

    /// Rows kept in the top table
    #[arg(long, default_value_t = DEFAULT_TOP_N, env = "INGREDIENTS_TOP_N")]
    top_n: usize,

    /// Log progress every N recipes (0 disables)
    #[arg(long, default_value_t = DEFAULT_PROGRESS_INTERVAL, env = "INGREDIENTS_PROGRESS_INTERVAL")]
    progress_interval: u64,

    /// Entries listed in the console summary
    #[arg(long, default_value_t = DEFAULT_SUMMARY_LIMIT, env = "INGREDIENTS_SUMMARY_LIMIT")]
    summary_limit: usize,

    /// Destination of the full filtered table
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH, env = "INGREDIENTS_OUTPUT")]
    output: PathBuf,

    /// Destination of the top table
    #[arg(long, default_value = DEFAULT_TOP_OUTPUT_PATH, env = "INGREDIENTS_TOP_OUTPUT")]
    top_output: PathBuf,
}

impl From<Args> for ExtractorConfig {
    fn from(args: Args) -> Self {
        Self {
            input_path: args.input,
            input_format: args.format,
            ingredient_column: args.column,
            min_frequency: args.min_frequency,
            top_n: args.top_n,
            progress_interval: args.progress_interval,
            summary_limit: args.summary_limit,
            output_path: args.output,
            top_output_path: args.top_output,
        }
    }
}

fn main() -> Result<()> {
    // Load environment variables from .env file before reading options
    dotenv::dotenv().ok();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ExtractorConfig::from(Args::parse());

    info!("Extracting ingredients from: {}", config.input_path.display());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = pipeline::run(&config, &mut out)?;

    info!(
        "Done: {} recipes, {} ingredients kept",
        summary.stats.rows_processed, summary.filtered_keys
    );
    Ok(())
}
