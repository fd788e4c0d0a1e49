//! CSV market-data and historical-fixing loaders.
//!
//! Both files share the same `date,key,value` structure (see external
//! interfaces): market data keys follow the convention
//! `CATEGORY/SUBCATEGORY/CURVE/CCY/...`; the fixing file has identical shape
//! but is interpreted as historical index fixings.

use std::path::Path;

use pricer_core::types::time::Date;
use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Deserialize)]
struct RawQuoteRow {
    date: String,
    key: String,
    value: f64,
}

/// A single market-data or fixing quote.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    /// Observation date.
    pub date: Date,
    /// Quote key, e.g. `EQUITY_OPTION/RATE_LNVOL/SP5/USD/1Y/ATMF`.
    pub key: String,
    /// Quote value.
    pub value: f64,
}

fn load_rows(path: impl AsRef<Path>) -> Result<Vec<Quote>, ConfigError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    let mut quotes = Vec::new();
    for (idx, result) in reader.deserialize::<RawQuoteRow>().enumerate() {
        let row = result.map_err(|source| ConfigError::MalformedRow {
            row: idx + 1,
            source,
        })?;
        let date = Date::parse(&row.date).map_err(|_| ConfigError::InvalidDate(row.date))?;
        quotes.push(Quote {
            date,
            key: row.key,
            value: row.value,
        });
    }
    Ok(quotes)
}

/// Load a market-data CSV file into a flat list of quotes.
///
/// Quotes are returned in file order; callers index them by `(date, key)` as
/// needed (the category/subcategory/curve/ccy/tenor segments of `key` are
/// left to curve/surface construction downstream — that lives in
/// `pricer_models`/`pricer_optimiser`, out of scope here).
pub fn load_market_data(path: impl AsRef<Path>) -> Result<Vec<Quote>, ConfigError> {
    load_rows(path)
}

/// Load a historical-fixing CSV file into a flat list of quotes.
pub fn load_fixings(path: impl AsRef<Path>) -> Result<Vec<Quote>, ConfigError> {
    load_rows(path)
}
