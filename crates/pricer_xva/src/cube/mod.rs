//! The NPV Cube: a dense, trade × date × sample × depth store of simulated
//! present values written by the Valuation Driver and consumed by
//! [`crate::postprocess`] (§3, §4.5).
//!
//! Depth 0 holds the path-wise NPV at that date; depth 1 (when present)
//! holds the cashflow paid between the previous date and this one. Layout is
//! row-major with `sample` the fastest-varying index, matching the
//! Structure-of-Arrays discipline already used by [`crate::soa`] so that a
//! single date/trade slice is contiguous for the post-processor's exposure
//! aggregation.

mod io;

pub use io::{read_cube, write_cube};

use crate::error::AggregationError;

/// Number of stored depths per (trade, date, sample) cell.
///
/// Depth 0 is NPV, depth 1 is cashflow. A cube built without cashflow
/// tracking still allocates depth 1 and leaves it zeroed, keeping the index
/// arithmetic uniform regardless of whether cashflows were requested.
pub const DEFAULT_DEPTH: usize = 2;

/// NPV depth slot.
pub const DEPTH_NPV: usize = 0;
/// Cashflow depth slot.
pub const DEPTH_CASHFLOW: usize = 1;

/// Dense trade × date × sample × depth store of simulated present values.
///
/// Stored as a single flat `Vec<f32>` (the codec's on-disk precision,
/// matching §6's "NPV Cube file" binary format) indexed as
/// `((trade * n_dates + date) * n_samples + sample) * depth + d`.
#[derive(Clone, Debug)]
pub struct NpvCube {
    trade_ids: Vec<String>,
    dates: Vec<f64>,
    n_samples: usize,
    depth: usize,
    data: Vec<f32>,
    /// `trade_ids.len() * depth` t=0 values, populated by `calculateT0`
    /// (§4.5 step 3) rather than sampled from the date/sample grid — a
    /// scripted trade's t=0 NPV is a single deterministic number, not one
    /// value per Monte Carlo path.
    t0: Vec<f32>,
}

impl NpvCube {
    /// Allocates a zeroed cube for `trade_ids.len()` trades, `dates.len()`
    /// valuation dates (expressed as year fractions from the reference
    /// date, matching the engine's time convention), `n_samples` Monte Carlo
    /// paths, and `depth` stored values per cell.
    pub fn new(trade_ids: Vec<String>, dates: Vec<f64>, n_samples: usize, depth: usize) -> Self {
        let len = trade_ids.len() * dates.len() * n_samples * depth;
        let t0_len = trade_ids.len() * depth;
        Self {
            trade_ids,
            dates,
            n_samples,
            depth,
            data: vec![0.0; len],
            t0: vec![0.0; t0_len],
        }
    }

    /// Allocates a cube with the default two depths (NPV + cashflow).
    pub fn with_default_depth(trade_ids: Vec<String>, dates: Vec<f64>, n_samples: usize) -> Self {
        Self::new(trade_ids, dates, n_samples, DEFAULT_DEPTH)
    }

    /// Number of trades.
    #[inline]
    pub fn n_trades(&self) -> usize {
        self.trade_ids.len()
    }

    /// Number of valuation dates.
    #[inline]
    pub fn n_dates(&self) -> usize {
        self.dates.len()
    }

    /// Number of Monte Carlo samples.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Number of stored depths per cell.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The date grid, as year fractions from the reference date.
    #[inline]
    pub fn dates(&self) -> &[f64] {
        &self.dates
    }

    /// The trade identifiers, in cube-index order.
    #[inline]
    pub fn trade_ids(&self) -> &[String] {
        &self.trade_ids
    }

    /// Index of a trade id within the cube, if present.
    pub fn trade_index(&self, trade_id: &str) -> Option<usize> {
        self.trade_ids.iter().position(|t| t == trade_id)
    }

    #[inline]
    fn cell_index(&self, trade: usize, date: usize, sample: usize, depth: usize) -> usize {
        ((trade * self.dates.len() + date) * self.n_samples + sample) * self.depth + depth
    }

    fn check_bounds(
        &self,
        trade: usize,
        date: usize,
        sample: usize,
        depth: usize,
    ) -> Result<(), AggregationError> {
        if trade >= self.trade_ids.len() {
            return Err(AggregationError::IndexOutOfBounds {
                what: "trade",
                index: trade,
                bound: self.trade_ids.len(),
            });
        }
        if date >= self.dates.len() {
            return Err(AggregationError::IndexOutOfBounds {
                what: "date",
                index: date,
                bound: self.dates.len(),
            });
        }
        if sample >= self.n_samples {
            return Err(AggregationError::IndexOutOfBounds {
                what: "sample",
                index: sample,
                bound: self.n_samples,
            });
        }
        if depth >= self.depth {
            return Err(AggregationError::IndexOutOfBounds {
                what: "depth",
                index: depth,
                bound: self.depth,
            });
        }
        Ok(())
    }

    /// Reads a single cell. Bounds-checked.
    pub fn get(
        &self,
        trade: usize,
        date: usize,
        sample: usize,
        depth: usize,
    ) -> Result<f64, AggregationError> {
        self.check_bounds(trade, date, sample, depth)?;
        Ok(self.data[self.cell_index(trade, date, sample, depth)] as f64)
    }

    /// Writes a single cell. Bounds-checked.
    pub fn set(
        &mut self,
        trade: usize,
        date: usize,
        sample: usize,
        depth: usize,
        value: f64,
    ) -> Result<(), AggregationError> {
        self.check_bounds(trade, date, sample, depth)?;
        let idx = self.cell_index(trade, date, sample, depth);
        self.data[idx] = value as f32;
        Ok(())
    }

    /// Every sample's NPV for `trade` at `date`, as `f64`.
    pub fn npv_path(&self, trade: usize, date: usize) -> Result<Vec<f64>, AggregationError> {
        self.check_bounds(trade, date, 0, DEPTH_NPV)?;
        Ok((0..self.n_samples)
            .map(|s| self.data[self.cell_index(trade, date, s, DEPTH_NPV)] as f64)
            .collect())
    }

    /// Every sample's cashflow for `trade` at `date`, as `f64`. Returns all
    /// zeros if this cube was built without a cashflow depth.
    pub fn cashflow_path(&self, trade: usize, date: usize) -> Result<Vec<f64>, AggregationError> {
        if self.depth <= DEPTH_CASHFLOW {
            return Ok(vec![0.0; self.n_samples]);
        }
        self.check_bounds(trade, date, 0, DEPTH_CASHFLOW)?;
        Ok((0..self.n_samples)
            .map(|s| self.data[self.cell_index(trade, date, s, DEPTH_CASHFLOW)] as f64)
            .collect())
    }

    /// The mutable slice backing a single (trade, date) row across all
    /// samples for one depth — used by the Valuation Driver to write a
    /// whole date's worth of NPVs for a trade without per-sample bounds
    /// checks (the driver owns the index arithmetic once it has validated
    /// `trade`/`date` once per call).
    pub fn row_mut(&mut self, trade: usize, date: usize, depth: usize) -> &mut [f32] {
        let start = self.cell_index(trade, date, 0, depth);
        &mut self.data[start..start + self.n_samples]
    }

    /// Reads a t=0 cell, populated by `calculateT0` (§4.5 step 3). Bounds-checked.
    pub fn get_t0(&self, trade: usize, depth: usize) -> Result<f64, AggregationError> {
        self.check_t0_bounds(trade, depth)?;
        Ok(self.t0[trade * self.depth + depth] as f64)
    }

    /// Writes a t=0 cell. Bounds-checked.
    pub fn set_t0(&mut self, trade: usize, depth: usize, value: f64) -> Result<(), AggregationError> {
        self.check_t0_bounds(trade, depth)?;
        let idx = trade * self.depth + depth;
        self.t0[idx] = value as f32;
        Ok(())
    }

    fn check_t0_bounds(&self, trade: usize, depth: usize) -> Result<(), AggregationError> {
        if trade >= self.trade_ids.len() {
            return Err(AggregationError::IndexOutOfBounds {
                what: "trade",
                index: trade,
                bound: self.trade_ids.len(),
            });
        }
        if depth >= self.depth {
            return Err(AggregationError::IndexOutOfBounds {
                what: "depth",
                index: depth,
                bound: self.depth,
            });
        }
        Ok(())
    }

    /// Aggregate NPV across trades in `trade_indices`, for every sample, at
    /// `date` — the per-sample netting-set sum the post-processor's netting
    /// stage consumes.
    pub fn netted_npv(
        &self,
        trade_indices: &[usize],
        date: usize,
    ) -> Result<Vec<f64>, AggregationError> {
        let mut total = vec![0.0; self.n_samples];
        for &trade in trade_indices {
            let path = self.npv_path(trade, date)?;
            for (t, p) in total.iter_mut().zip(path.iter()) {
                *t += p;
            }
        }
        Ok(total)
    }
}
