//! CLI error taxonomy and process exit codes (§6, §7).
//!
//! The CLI boundary is where every error taxonomy in the system ends up:
//! configuration, aggregation, and script errors all funnel through
//! [`CliError`] so `main` has exactly one place to decide the exit code and
//! print `Error: <what>` to stderr.

use thiserror::Error;

use adapter_config::ConfigError;
use pricer_xva::error::AggregationError;
use pricer_xva::portfolio::PortfolioError;

/// Top-level CLI error.
#[derive(Debug, Error)]
pub enum CliError {
    /// No configuration path (or an unrecognised flag) was supplied.
    #[error("usage: ore <path/to/config.xml>")]
    Usage,

    /// Reading or parsing the run-configuration XML, market data, fixings,
    /// portfolio, or writing a report failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The valuation/aggregation pipeline failed.
    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    /// Building the portfolio (netting sets, counterparties, trades) failed.
    #[error(transparent)]
    Portfolio(#[from] PortfolioError),

    /// A required setup key held a value that could not be interpreted
    /// (e.g. an unparsable currency code or date).
    #[error("invalid setup value: {0}")]
    InvalidSetup(String),
}

impl CliError {
    /// Process exit code for this error, per §6: -1 for usage errors,
    /// nonzero (1) for any other unrecoverable failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage => -1,
            _ => 1,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CliError>;
