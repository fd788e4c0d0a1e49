//! Error types for configuration, market-data and report I/O.

use thiserror::Error;

/// Errors raised while reading run configuration, market data, fixings, or
/// while writing reports.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required key was missing from a configuration group.
    #[error("missing required key '{key}' in group '{group}'")]
    MissingKey {
        /// Group the key was expected in (e.g. "setup").
        group: String,
        /// The missing key name.
        key: String,
    },

    /// The configuration XML could not be parsed.
    #[error("malformed configuration XML: {0}")]
    MalformedXml(String),

    /// A key held a value that is not a recognised enum member.
    #[error("invalid value '{value}' for key '{key}'")]
    InvalidEnumValue {
        /// The offending key.
        key: String,
        /// The value that failed to parse.
        value: String,
    },

    /// A market-data or fixing CSV row could not be parsed.
    #[error("malformed market data row {row}: {source}")]
    MalformedRow {
        /// 1-based row number within the file.
        row: usize,
        /// Underlying CSV parse error.
        #[source]
        source: csv::Error,
    },

    /// A date string failed to parse.
    #[error("invalid date '{0}'")]
    InvalidDate(String),

    /// Underlying I/O failure reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
