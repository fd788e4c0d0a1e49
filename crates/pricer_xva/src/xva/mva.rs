//! Margin Valuation Adjustment (MVA) calculation.
//!
//! MVA represents the cost of funding initial margin posted to a CCP or
//! bilateral counterparty for the life of the netting set.
//!
//! # Formula
//!
//! MVA = ∫₀ᵀ IM(t) × s_im × df(t) dt
//!
//! Where:
//! - IM(t) = Expected initial margin requirement at time t
//! - s_im = Initial margin funding spread
//! - df(t) = Discount factor

/// Computes Margin Valuation Adjustment.
///
/// Uses trapezoidal integration over the time grid, mirroring
/// [`super::fva::compute_fca`]'s funding-cost integration shape.
///
/// # Arguments
///
/// * `im` - Expected initial margin profile at each time point (always
///   non-negative by construction of the IM model).
/// * `time_grid` - Time points in years.
/// * `im_funding_spread` - Annualised funding spread on posted initial margin.
/// * `discount_factors` - Risk-free discount factors at each time point.
///
/// # Returns
///
/// MVA value (always non-negative).
///
/// # Examples
///
/// ```
/// use pricer_xva::xva::compute_mva;
///
/// let im = vec![0.0, 40.0, 60.0, 50.0, 20.0];
/// let time_grid = vec![0.0, 0.25, 0.5, 0.75, 1.0];
/// let spread = 0.01;
/// let df = vec![1.0, 0.99, 0.98, 0.97, 0.96];
///
/// let mva = compute_mva(&im, &time_grid, spread, &df);
/// assert!(mva > 0.0);
/// ```
pub fn compute_mva(
    im: &[f64],
    time_grid: &[f64],
    im_funding_spread: f64,
    discount_factors: &[f64],
) -> f64 {
    if time_grid.len() < 2
        || im.len() != time_grid.len()
        || discount_factors.len() != time_grid.len()
    {
        return 0.0;
    }

    let mut mva = 0.0;
    for i in 0..time_grid.len() - 1 {
        let dt = time_grid[i + 1] - time_grid[i];
        let avg_im = 0.5 * (im[i] + im[i + 1]);
        let avg_df = 0.5 * (discount_factors[i] + discount_factors[i + 1]);
        mva += avg_im * im_funding_spread * avg_df * dt;
    }
    mva.max(0.0)
}
