//! CLI argument definitions for folio.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `rank` | Fetch, rank and size a portfolio for one strategy |
//! | `strategies` | List the built-in strategies |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json, csv) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings as errors |
//! | `--source` | `iex` | Quote source (iex, mock) |
//! | `--timeout-ms` | `5000` | Per-request timeout in ms |
//! | `--output` | stdout | Write the rendered output to a file |
//!
//! # Examples
//!
//! ```bash
//! folio rank hqm --constituents sp_500_stocks.csv --portfolio-value 1000000
//! folio rank value --symbols AAPL,MSFT,GOOG --source mock --format json --pretty
//! folio rank equal-weight --constituents sp_500_stocks.csv --format csv --output trades.csv
//! ```

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use folio_core::StrategyKind;

/// Percentile-ranked portfolio construction.
#[derive(Debug, Parser)]
#[command(
    name = "folio",
    author,
    version,
    about = "Rank stocks by percentile scores and size an equal-weight portfolio",
    long_about = "folio fetches quotes and fundamentals for a list of tickers, ranks them \
with one of five strategies (equal-weight, momentum, high-quality momentum, value, robust value) \
and reports how many shares of each pick to buy for a given portfolio value.\n\
\n\
The IEX Cloud token is read from FOLIO_IEX_TOKEN (a .env file in the working directory is \
loaded first). Use '--source mock' to run offline."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Quote source.
    #[arg(long, global = true, value_enum, default_value_t = SourceSelector::Iex)]
    pub source: SourceSelector,

    /// Per-request timeout budget in milliseconds.
    #[arg(long, global = true, default_value_t = 5_000)]
    pub timeout_ms: u64,

    /// Write the rendered output to this file instead of stdout.
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table.
    Table,
    /// Single JSON envelope.
    Json,
    /// Report rows as CSV.
    Csv,
}

/// Quote source selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceSelector {
    /// IEX Cloud (needs FOLIO_IEX_TOKEN).
    Iex,
    /// Deterministic offline data.
    Mock,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch, rank and size a portfolio.
    ///
    /// # Examples
    ///
    ///   folio rank momentum --constituents sp_500_stocks.csv
    ///   folio rank rv --symbols AAPL,MSFT --portfolio-value 50000
    Rank(RankArgs),

    /// List the built-in strategies.
    Strategies,
}

/// Arguments for the `rank` command.
#[derive(Debug, Args)]
#[command(group(
    ArgGroup::new("universe")
        .required(true)
        .args(["constituents", "symbols"])
))]
pub struct RankArgs {
    /// Strategy: equal-weight, momentum, hqm, value or rv.
    #[arg(value_parser = parse_strategy)]
    pub strategy: StrategyKind,

    /// CSV file with a `Ticker` column.
    #[arg(long)]
    pub constituents: Option<PathBuf>,

    /// Comma-separated tickers.
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub symbols: Vec<String>,

    /// Portfolio value in dollars. Prompted for on stdin when absent.
    #[arg(long)]
    pub portfolio_value: Option<String>,

    /// Override the strategy's selection size.
    #[arg(long)]
    pub top_n: Option<usize>,

    /// Symbols per upstream call, capped at the source limit.
    #[arg(long)]
    pub batch_size: Option<usize>,
}

fn parse_strategy(value: &str) -> Result<StrategyKind, String> {
    value.parse::<StrategyKind>().map_err(|error| error.to_string())
}
