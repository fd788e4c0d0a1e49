//! Collateral Valuation Adjustment (COLVA) and Collateral Floor value.
//!
//! COLVA captures the PV impact of a CSA remunerating posted collateral at
//! a rate that differs from the risk-free (OIS) rate actually used to
//! discount exposure. The Collateral Floor is the separate option value
//! that arises when the CSA's remuneration rate is contractually floored
//! (typically at zero), since a negative OIS rate would otherwise make
//! posting collateral a net cost to whichever side holds it.
//!
//! # Formulas
//!
//! COLVA = ∫₀ᵀ EC(t) × (r_collateral(t) - r_ois(t)) × df(t) dt
//!
//! Collateral Floor = ∫₀ᵀ EC(t) × max(floor_rate - r_ois(t), 0) × df(t) dt
//!
//! Where:
//! - EC(t) = Expected collateral balance at time t (signed: positive when
//!   we hold collateral, negative when we post it)
//! - r_collateral(t) = contractual remuneration rate
//! - r_ois(t) = risk-free overnight rate
//! - df(t) = discount factor

/// Computes COLVA from an expected collateral balance path and the spread
/// between the CSA's remuneration rate and OIS at each time point.
///
/// # Arguments
///
/// * `expected_collateral` - Expected collateral balance (signed) at each
///   time point.
/// * `time_grid` - Time points in years.
/// * `rate_spread` - `r_collateral(t) - r_ois(t)` at each time point.
/// * `discount_factors` - Risk-free discount factors at each time point.
///
/// # Returns
///
/// COLVA value; sign follows `rate_spread`'s sign (a positive spread is a
/// benefit to whoever holds the collateral).
///
/// # Examples
///
/// ```
/// use pricer_xva::xva::compute_colva;
///
/// let ec = vec![0.0, 100.0, 100.0, 100.0, 100.0];
/// let time_grid = vec![0.0, 0.25, 0.5, 0.75, 1.0];
/// let spread = vec![0.0, -0.001, -0.001, -0.001, -0.001];
/// let df = vec![1.0, 0.99, 0.98, 0.97, 0.96];
///
/// let colva = compute_colva(&ec, &time_grid, &spread, &df);
/// assert!(colva < 0.0);
/// ```
pub fn compute_colva(
    expected_collateral: &[f64],
    time_grid: &[f64],
    rate_spread: &[f64],
    discount_factors: &[f64],
) -> f64 {
    if time_grid.len() < 2
        || expected_collateral.len() != time_grid.len()
        || rate_spread.len() != time_grid.len()
        || discount_factors.len() != time_grid.len()
    {
        return 0.0;
    }

    let mut colva = 0.0;
    for i in 0..time_grid.len() - 1 {
        let dt = time_grid[i + 1] - time_grid[i];
        let avg_ec = 0.5 * (expected_collateral[i] + expected_collateral[i + 1]);
        let avg_spread = 0.5 * (rate_spread[i] + rate_spread[i + 1]);
        let avg_df = 0.5 * (discount_factors[i] + discount_factors[i + 1]);
        colva += avg_ec * avg_spread * avg_df * dt;
    }
    colva
}

/// Computes the Collateral Floor value: the option value of a contractual
/// floor (typically zero) on the CSA remuneration rate, versus the
/// unfloored OIS rate.
///
/// # Arguments
///
/// * `expected_collateral` - Expected collateral balance (signed, only the
///   magnitude held by the floor's beneficiary matters — callers pass the
///   absolute exposure to the floor on their own side).
/// * `time_grid` - Time points in years.
/// * `ois_rate` - Risk-free overnight rate at each time point.
/// * `floor_rate` - The CSA's contractual floor rate (often `0.0`).
/// * `discount_factors` - Risk-free discount factors at each time point.
///
/// # Returns
///
/// Collateral floor value (always non-negative).
pub fn compute_collateral_floor(
    expected_collateral: &[f64],
    time_grid: &[f64],
    ois_rate: &[f64],
    floor_rate: f64,
    discount_factors: &[f64],
) -> f64 {
    if time_grid.len() < 2
        || expected_collateral.len() != time_grid.len()
        || ois_rate.len() != time_grid.len()
        || discount_factors.len() != time_grid.len()
    {
        return 0.0;
    }

    let mut floor_value = 0.0;
    for i in 0..time_grid.len() - 1 {
        let dt = time_grid[i + 1] - time_grid[i];
        let avg_ec = 0.5 * (expected_collateral[i].abs() + expected_collateral[i + 1].abs());
        let floor_0 = (floor_rate - ois_rate[i]).max(0.0);
        let floor_1 = (floor_rate - ois_rate[i + 1]).max(0.0);
        let avg_floor = 0.5 * (floor_0 + floor_1);
        let avg_df = 0.5 * (discount_factors[i] + discount_factors[i + 1]);
        floor_value += avg_ec * avg_floor * avg_df * dt;
    }
    floor_value.max(0.0)
}
