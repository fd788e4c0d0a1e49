//! Debit Valuation Adjustment (DVA) calculation.
//!
//! DVA represents the benefit from own default risk.
//!
//! # Formula
//!
//! DVA = LGD_own × ∫₀ᵀ ENE(t) × dPD_own(t)
//!
//! Where:
//! - LGD_own = Own Loss Given Default
//! - ENE(t) = Expected Negative Exposure at time t
//! - dPD_own(t) = Own marginal default probability

use super::params::OwnCreditParams;

/// Computes DVA for a netting set.
///
/// Uses trapezoidal integration over the time grid.
///
/// # Arguments
///
/// * `ene` - Expected Negative Exposure profile at each time point
/// * `time_grid` - Time points in years
/// * `own_credit` - Own credit parameters (hazard rate, LGD)
///
/// # Returns
///
/// DVA value (always non-negative).
///
/// # Examples
///
/// ```
/// use pricer_xva::xva::{compute_dva, OwnCreditParams};
///
/// let ene = vec![0.0, 50.0, 80.0, 60.0, 30.0];
/// let time_grid = vec![0.0, 0.25, 0.5, 0.75, 1.0];
/// let own_credit = OwnCreditParams::new(0.03, 0.4).unwrap();
///
/// let dva = compute_dva(&ene, &time_grid, &own_credit);
/// assert!(dva > 0.0);
/// ```
pub fn compute_dva(ene: &[f64], time_grid: &[f64], own_credit: &OwnCreditParams) -> f64 {
    if time_grid.len() < 2 || ene.len() != time_grid.len() {
        return 0.0;
    }

    let lgd = own_credit.lgd();
    let mut dva = 0.0;

    // Numerical integration using trapezoidal rule
    for i in 0..time_grid.len() - 1 {
        let t1 = time_grid[i];
        let t2 = time_grid[i + 1];

        // Own marginal default probability
        let marginal_pd = own_credit.marginal_pd(t1, t2);

        // Average ENE over interval
        let avg_ene = 0.5 * (ene[i] + ene[i + 1]);

        dva += lgd * avg_ene * marginal_pd;
    }

    dva.max(0.0)
}

/// Computes DVA with counterparty survival weighting.
///
/// This version weights by counterparty survival probability,
/// accounting for the fact that DVA benefit requires the counterparty
/// to survive until our default.
///
/// # Arguments
///
/// * `ene` - Expected Negative Exposure profile
/// * `time_grid` - Time points
/// * `own_credit` - Own credit parameters
/// * `cp_survival` - Counterparty survival probabilities
pub fn compute_dva_with_survival(
    ene: &[f64],
    time_grid: &[f64],
    own_credit: &OwnCreditParams,
    cp_survival: &[f64],
) -> f64 {
    if time_grid.len() < 2 || ene.len() != time_grid.len() || cp_survival.len() != time_grid.len() {
        return 0.0;
    }

    let lgd = own_credit.lgd();
    let mut dva = 0.0;

    for i in 0..time_grid.len() - 1 {
        let t1 = time_grid[i];
        let t2 = time_grid[i + 1];

        let marginal_pd = own_credit.marginal_pd(t1, t2);
        let avg_ene = 0.5 * (ene[i] + ene[i + 1]);

        // Weight by counterparty survival
        let avg_cp_survival = 0.5 * (cp_survival[i] + cp_survival[i + 1]);

        dva += lgd * avg_ene * marginal_pd * avg_cp_survival;
    }

    dva.max(0.0)
}
