//! Capital Valuation Adjustment (KVA): the funding cost of the regulatory
//! capital a netting set consumes over its life (§4.6 step 4, Supplementary
//! Feature). Two regulatory capital charges are modelled, each integrated
//! the same trapezoidal way as [`crate::xva::compute_mva`]:
//!
//! - KVA-CCR: capital against counterparty credit risk, driven by EEPE.
//! - KVA-CVA: capital against CVA risk, driven by the standalone CVA's own
//!   exposure profile.
//!
//! # Formulas
//!
//! KVA-CCR = hurdle_rate × ∫₀ᵀ α × RW_ccr × EEPE(t) × df(t) dt
//!
//! KVA-CVA = hurdle_rate × ∫₀ᵀ RW_cva × EE(t) × df(t) dt
//!
//! Where `α` is the Basel EAD multiplier (1.4 under the standardised
//! approach unless a supervisor-approved internal model gives a different
//! value) and `RW_ccr`/`RW_cva` are counterparty/CVA risk weights.

/// Regulator-set parameters for the two KVA capital charges.
#[derive(Clone, Copy, Debug)]
pub struct KvaParams {
    /// Annualised hurdle rate (cost of capital) applied to both charges.
    pub capital_hurdle_rate: f64,
    /// Basel EAD multiplier (`alpha`), applied to EEPE for KVA-CCR.
    pub alpha: f64,
    /// Counterparty credit risk weight.
    pub ccr_risk_weight: f64,
    /// CVA risk weight.
    pub cva_risk_weight: f64,
}

impl KvaParams {
    /// Standard Basel III defaults: `alpha = 1.4`, an 10% hurdle rate, and
    /// unit risk weights (callers should override the risk weights with
    /// their own supervisor-set values; the defaults exist so a netting set
    /// without configured KVA parameters still produces a non-degenerate
    /// number rather than silently skipping the stage).
    pub fn standard_defaults() -> Self {
        Self {
            capital_hurdle_rate: 0.10,
            alpha: 1.4,
            ccr_risk_weight: 1.0,
            cva_risk_weight: 1.0,
        }
    }
}

fn trapezoidal_integral(profile: &[f64], time_grid: &[f64], discount_factors: &[f64]) -> f64 {
    if time_grid.len() < 2
        || profile.len() != time_grid.len()
        || discount_factors.len() != time_grid.len()
    {
        return 0.0;
    }

    let mut integral = 0.0;
    for i in 0..time_grid.len() - 1 {
        let dt = time_grid[i + 1] - time_grid[i];
        let avg_profile = 0.5 * (profile[i] + profile[i + 1]);
        let avg_df = 0.5 * (discount_factors[i] + discount_factors[i + 1]);
        integral += avg_profile * avg_df * dt;
    }
    integral
}

/// Computes KVA-CCR from an EEPE profile.
pub fn compute_kva_ccr(
    eepe_profile: &[f64],
    time_grid: &[f64],
    discount_factors: &[f64],
    params: &KvaParams,
) -> f64 {
    let capital_factor = params.alpha * params.ccr_risk_weight;
    let scaled: Vec<f64> = eepe_profile.iter().map(|&e| e * capital_factor).collect();
    (params.capital_hurdle_rate * trapezoidal_integral(&scaled, time_grid, discount_factors)).max(0.0)
}

/// Computes KVA-CVA from an expected exposure profile (the same EE driving
/// standalone CVA).
pub fn compute_kva_cva(
    ee_profile: &[f64],
    time_grid: &[f64],
    discount_factors: &[f64],
    params: &KvaParams,
) -> f64 {
    let scaled: Vec<f64> = ee_profile.iter().map(|&e| e * params.cva_risk_weight).collect();
    (params.capital_hurdle_rate * trapezoidal_integral(&scaled, time_grid, discount_factors)).max(0.0)
}
