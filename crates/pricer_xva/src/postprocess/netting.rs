//! Netting stage: assembles a netting set's path-wise exposure from the
//! cube's per-(trade, date) sample slices (§4.6 step 1).
//!
//! [`NpvCube::netted_npv`] is cheapest to call once per date (it sums all
//! trades' NPV for every sample at a fixed date), but [`ExposureCalculator`]
//! wants the opposite axis order: `values[sample][date]`. This module owns
//! that transpose so every other postprocess stage can just call
//! `ExposureCalculator` directly on the result.

use crate::cube::NpvCube;
use crate::error::AggregationError;
use crate::portfolio::TradeId;

/// Resolves `trade_ids` to their cube row indices.
///
/// Fails with [`AggregationError::UnknownTrade`] if a netting set references
/// a trade the cube was never built with — the valuation driver and the
/// post-processor must agree on which trades were priced.
pub fn trade_indices(cube: &NpvCube, trade_ids: &[TradeId]) -> Result<Vec<usize>, AggregationError> {
    trade_ids
        .iter()
        .map(|id| {
            cube.trade_index(id.as_str())
                .ok_or_else(|| AggregationError::UnknownTrade(id.as_str().to_string()))
        })
        .collect()
}

/// Assembles a netting set's path-wise exposure as `paths[sample][date]`,
/// netting across `trade_indices` at every date.
pub fn net_exposure_paths(
    cube: &NpvCube,
    trade_indices: &[usize],
) -> Result<Vec<Vec<f64>>, AggregationError> {
    let n_dates = cube.n_dates();
    let n_samples = cube.n_samples();
    let mut paths = vec![vec![0.0; n_dates]; n_samples];

    for date in 0..n_dates {
        let per_sample = cube.netted_npv(trade_indices, date)?;
        for (sample, value) in per_sample.into_iter().enumerate() {
            paths[sample][date] = value;
        }
    }

    Ok(paths)
}

/// A single trade's path-wise NPV as `paths[sample][date]`, for per-trade
/// allocation (§4.6 step 5) rather than netting-set aggregation.
pub fn trade_exposure_paths(
    cube: &NpvCube,
    trade_index: usize,
) -> Result<Vec<Vec<f64>>, AggregationError> {
    let n_dates = cube.n_dates();
    let n_samples = cube.n_samples();
    let mut paths = vec![vec![0.0; n_dates]; n_samples];

    for date in 0..n_dates {
        let per_sample = cube.npv_path(trade_index, date)?;
        for (sample, value) in per_sample.into_iter().enumerate() {
            paths[sample][date] = value;
        }
    }

    Ok(paths)
}
