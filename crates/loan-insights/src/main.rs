//! CLI entry point for the loan-application insights tool.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use loan_insights::{
    AnalyzerConfig, CleanOptions, DEFAULT_SEED, DataLoader, LoadOptions, LoanAnalyzer,
    LoaderConfig, MissingPolicy, SampleOptions, SaveOptions, SyntheticOptions, Table,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// CLI-compatible missing value policy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliMissingPolicy {
    /// Remove rows containing any missing value
    Drop,
    /// Fill numeric gaps with the mean, text with a placeholder
    Fill,
    /// Linearly interpolate numeric gaps
    Interpolate,
}

impl From<CliMissingPolicy> for MissingPolicy {
    fn from(cli: CliMissingPolicy) -> Self {
        match cli {
            CliMissingPolicy::Drop => MissingPolicy::Drop,
            CliMissingPolicy::Fill => MissingPolicy::Fill,
            CliMissingPolicy::Interpolate => MissingPolicy::Interpolate,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Load, clean and summarize loan-application tables",
    long_about = "Loads CSV, Excel, JSON, JSON Lines and Parquet tables and prints \
                  summaries as JSON on stdout. Logs go to stderr.\n\n\
                  EXAMPLES:\n  \
                  # Column types, missing data and duplicates\n  \
                  loan-insights describe data/test.csv\n\n  \
                  # Dashboard metrics with custom default columns\n  \
                  loan-insights --config analyzer.json metrics data/test.csv\n\n  \
                  # Fill gaps and save as Parquet\n  \
                  loan-insights clean data/test.csv -o data/clean.parquet --policy fill"
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// JSON file with "loader" and "analyzer" settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory that relative input and output paths are resolved against
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Describe shape, column types and missing data
    Describe {
        input: PathBuf,
        /// Worksheet name or 0-based index (Excel only)
        #[arg(long)]
        sheet: Option<String>,
    },

    /// Handle missing values and duplicates, then save the result
    Clean {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, value_enum, default_value = "drop")]
        policy: CliMissingPolicy,
        /// Keep duplicate rows
        #[arg(long)]
        keep_duplicates: bool,
    },

    /// Draw a seeded random sample of rows and save it
    Sample {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Number of rows to draw
        #[arg(long)]
        size: Option<usize>,
        /// Fraction of rows to draw, in (0, 1]
        #[arg(long)]
        fraction: Option<f64>,
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },

    /// Run every named analysis view
    Analyze {
        input: PathBuf,
        /// Also include per-column summaries and chart series
        #[arg(long)]
        full: bool,
    },

    /// Print the flat dashboard metrics
    Metrics { input: PathBuf },

    /// Distribution of one column, optionally split by a second column
    Distribution {
        input: PathBuf,
        #[arg(short, long)]
        column: String,
        /// Cross-tabulate against this column
        #[arg(long)]
        by: Option<String>,
        /// Summarize as a numeric column instead of counting labels
        #[arg(long, conflicts_with = "by")]
        numeric: bool,
    },

    /// Generate a synthetic table
    Generate {
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, default_value_t = 1000)]
        rows: usize,
        #[arg(long, default_value_t = 5)]
        columns: usize,
        /// Leave out the date column
        #[arg(long)]
        no_dates: bool,
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
}

/// Settings file layout. Both sections are optional.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct CliConfig {
    loader: LoaderConfig,
    analyzer: AnalyzerConfig,
}

impl CliConfig {
    fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.loader.validate()?;
        config.analyzer.validate()?;
        debug!("Loaded settings from {}", path.display());
        Ok(config)
    }
}

/// Initialize logging on stderr so stdout only carries JSON.
fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load(loader: &DataLoader, input: &Path) -> Result<Table> {
    loader
        .load(input, &LoadOptions::default())
        .with_context(|| format!("Failed to load {}", input.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet);

    let mut config = CliConfig::load(args.config.as_deref())?;
    if let Some(dir) = args.data_dir {
        config.loader.data_dir = Some(dir);
    }
    let loader = DataLoader::new(config.loader);
    let analyzer = LoanAnalyzer::new(config.analyzer);

    match args.command {
        Command::Describe { input, sheet } => {
            let options = LoadOptions {
                sheet,
                ..LoadOptions::default()
            };
            let table = loader
                .load(&input, &options)
                .with_context(|| format!("Failed to load {}", input.display()))?;
            print_json(&loader.describe(&table)?)?;
        }

        Command::Clean {
            input,
            output,
            policy,
            keep_duplicates,
        } => {
            let table = load(&loader, &input)?;
            let options = CleanOptions::new(!keep_duplicates, policy.into());
            let cleaned = loader.clean(&table, &options)?;
            loader.save(&cleaned, &output, &SaveOptions::default())?;
            print_json(&loader.describe(&cleaned)?)?;
        }

        Command::Sample {
            input,
            output,
            size,
            fraction,
            seed,
        } => {
            let table = load(&loader, &input)?;
            let options = SampleOptions {
                size,
                fraction,
                seed,
            };
            let sampled = loader.sample(&table, &options)?;
            loader.save(&sampled, &output, &SaveOptions::default())?;
            info!("Wrote {} sampled rows", sampled.height());
        }

        Command::Analyze { input, full } => {
            let table = load(&loader, &input)?;
            let report = analyzer.analyze(&table)?;
            if full {
                print_json(&serde_json::json!({
                    "report": report,
                    "column_summary": analyzer.column_summary(&table)?,
                    "charts": analyzer.chart_data(&table)?,
                }))?;
            } else {
                print_json(&report)?;
            }
        }

        Command::Metrics { input } => {
            let table = load(&loader, &input)?;
            print_json(&analyzer.summary_metrics(&table)?)?;
        }

        Command::Distribution {
            input,
            column,
            by,
            numeric,
        } => {
            let table = load(&loader, &input)?;
            match (by, numeric) {
                (Some(secondary), _) => {
                    print_json(&analyzer.cross_distribution(&table, &column, &secondary)?)?
                }
                (None, true) => print_json(&analyzer.numeric_distribution(&table, &column)?)?,
                (None, false) => {
                    print_json(&analyzer.categorical_distribution(&table, &column)?)?
                }
            }
        }

        Command::Generate {
            output,
            rows,
            columns,
            no_dates,
            seed,
        } => {
            let options = SyntheticOptions {
                rows,
                columns,
                include_dates: !no_dates,
                seed,
            };
            let table = loader.generate_synthetic(&options)?;
            loader.save(&table, &output, &SaveOptions::default())?;
            print_json(&loader.describe(&table)?)?;
        }
    }

    Ok(())
}
