//! CLI argument definitions for voltick.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `analyze` | Analyze an option contract against its stock and the VIX |
//!
//! # Examples
//!
//! ```bash
//! # Analyze a call, 30 days of history
//! voltick analyze --ticker AAPL --expiry 2025-04-25 --strike 200 --kind call
//!
//! # JSON output for scripting
//! voltick analyze --ticker SPY --expiry 2025-12-19 --strike 650 --kind put --format json --pretty
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use voltick_core::metrics::DEFAULT_RISK_FREE_RATE;
use voltick_core::OptionKind;

/// Option divergence and volatility analysis from the command line.
#[derive(Debug, Parser)]
#[command(
    name = "voltick",
    author,
    version,
    about = "Option RSI divergence, volatility skew, and VIX regime analysis"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch history for an option, its stock, and the VIX, then report
    /// RSI divergence, volatility skew, and the VIX regime.
    Analyze(AnalyzeArgs),
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Underlying ticker symbol, e.g. AAPL.
    #[arg(long)]
    pub ticker: String,

    /// Option expiration date, YYYY-MM-DD.
    #[arg(long)]
    pub expiry: String,

    /// Strike price.
    #[arg(long)]
    pub strike: f64,

    /// Option right.
    #[arg(long, value_enum)]
    pub kind: OptionKindArg,

    /// Days of history to analyze.
    #[arg(long, default_value_t = 30)]
    pub days_back: u32,

    /// Cache expiry in hours; 0 disables the response cache.
    #[arg(long, default_value_t = 24)]
    pub cache_hours: u64,

    /// Annual risk-free rate for Sharpe ratios.
    #[arg(long, default_value_t = DEFAULT_RISK_FREE_RATE)]
    pub risk_free_rate: f64,

    /// Polygon API key. Falls back to VOLTICK_POLYGON_API_KEY, then the
    /// saved credential file. A key passed here is saved for later runs.
    #[arg(long)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OptionKindArg {
    Call,
    Put,
}

impl From<OptionKindArg> for OptionKind {
    fn from(value: OptionKindArg) -> Self {
        match value {
            OptionKindArg::Call => Self::Call,
            OptionKindArg::Put => Self::Put,
        }
    }
}
