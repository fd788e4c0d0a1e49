//! `AggregationScenarioData`: a dense store of simulated market observables
//! (FX spot, numeraire, index fixings) keyed by date/sample/key, dimensioned
//! to match an [`crate::cube::NpvCube`] (§3).
//!
//! The cube alone is not enough to run collateralisation or allocation: the
//! post-processor's collateral step converts an uncollateralised exposure
//! into the netting set's settlement currency, and the KVA/FVA steps need
//! the path-wise numeraire. Those series live here rather than in the cube
//! because they are keyed by (date, sample) only — not by trade — so
//! storing them per-trade in the cube would multiply their size by
//! `n_trades` for no benefit.

use std::collections::HashMap;

use crate::error::AggregationError;

/// Dense (date × sample) store of named scenario series.
#[derive(Clone, Debug, Default)]
pub struct AggregationScenarioData {
    n_dates: usize,
    n_samples: usize,
    series: HashMap<String, Vec<f64>>,
}

impl AggregationScenarioData {
    /// Allocates an empty store dimensioned for `n_dates` valuation dates
    /// and `n_samples` Monte Carlo paths. Series are added with [`Self::set_series`].
    pub fn new(n_dates: usize, n_samples: usize) -> Self {
        Self {
            n_dates,
            n_samples,
            series: HashMap::new(),
        }
    }

    /// Number of valuation dates this store is dimensioned for.
    #[inline]
    pub fn n_dates(&self) -> usize {
        self.n_dates
    }

    /// Number of Monte Carlo samples this store is dimensioned for.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Names of all stored series.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    /// Registers a full (date × sample) series under `key`. The flat vector
    /// must be `n_dates * n_samples` long, row-major with sample the
    /// fastest-varying index (matching [`crate::cube::NpvCube`]'s layout).
    pub fn set_series(&mut self, key: impl Into<String>, values: Vec<f64>) -> Result<(), AggregationError> {
        let expected = self.n_dates * self.n_samples;
        if values.len() != expected {
            return Err(AggregationError::DimensionMismatch {
                dates: values.len() / self.n_samples.max(1),
                samples: self.n_samples,
                cube_dates: self.n_dates,
                cube_samples: self.n_samples,
            });
        }
        self.series.insert(key.into(), values);
        Ok(())
    }

    /// Value of `key` at `date`/`sample`.
    pub fn get(&self, key: &str, date: usize, sample: usize) -> Result<f64, AggregationError> {
        self.bounds_check(date, sample)?;
        let series = self
            .series
            .get(key)
            .ok_or_else(|| AggregationError::UnknownKey(key.to_string()))?;
        Ok(series[date * self.n_samples + sample])
    }

    /// The full cross-sample slice of `key` at `date`.
    pub fn slice(&self, key: &str, date: usize) -> Result<&[f64], AggregationError> {
        if date >= self.n_dates {
            return Err(AggregationError::IndexOutOfBounds {
                what: "date",
                index: date,
                bound: self.n_dates,
            });
        }
        let series = self
            .series
            .get(key)
            .ok_or_else(|| AggregationError::UnknownKey(key.to_string()))?;
        let start = date * self.n_samples;
        Ok(&series[start..start + self.n_samples])
    }

    /// Validates that this store's dimensions match an [`crate::cube::NpvCube`]'s.
    pub fn check_matches_cube(
        &self,
        cube_dates: usize,
        cube_samples: usize,
    ) -> Result<(), AggregationError> {
        if self.n_dates != cube_dates || self.n_samples != cube_samples {
            return Err(AggregationError::DimensionMismatch {
                dates: self.n_dates,
                samples: self.n_samples,
                cube_dates,
                cube_samples,
            });
        }
        Ok(())
    }

    fn bounds_check(&self, date: usize, sample: usize) -> Result<(), AggregationError> {
        if date >= self.n_dates {
            return Err(AggregationError::IndexOutOfBounds {
                what: "date",
                index: date,
                bound: self.n_dates,
            });
        }
        if sample >= self.n_samples {
            return Err(AggregationError::IndexOutOfBounds {
                what: "sample",
                index: sample,
                bound: self.n_samples,
            });
        }
        Ok(())
    }
}

/// Conventional series key for a numeraire under `currency`.
pub fn numeraire_key(currency: &str) -> String {
    format!("NUMERAIRE/{currency}")
}

/// Conventional series key for an FX spot rate, `foreign` per one `domestic`.
pub fn fx_spot_key(foreign: &str, domestic: &str) -> String {
    format!("FX/{foreign}{domestic}")
}

/// Conventional series key for an index fixing.
pub fn index_fixing_key(index: &str) -> String {
    format!("FIXING/{index}")
}
