//! Geometric Brownian motion path generation.

use super::workspace::PathWorkspace;

/// Parameters for a lognormal (Black-Scholes) underlying.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GbmParams {
    /// Spot price at time zero.
    pub spot: f64,
    /// Continuously compounded risk-free rate.
    pub rate: f64,
    /// Lognormal volatility.
    pub volatility: f64,
    /// Time to maturity in years.
    pub maturity: f64,
}

impl Default for GbmParams {
    fn default() -> Self {
        Self {
            spot: 100.0,
            rate: 0.05,
            volatility: 0.2,
            maturity: 1.0,
        }
    }
}

/// Generates GBM paths into `workspace.paths_mut()` using the normal draws
/// already present in `workspace.randoms()`.
///
/// Callers must fill `workspace.randoms_mut()` with `n_paths * n_steps`
/// standard-normal draws before calling this function (see
/// [`PricerRng::fill_normal`](crate::rng::PricerRng::fill_normal)).
///
/// Each path's step-0 value is seeded at `gbm.spot`; subsequent steps evolve
/// under the exact lognormal transition
/// `S_{t+dt} = S_t * exp((r - 0.5 sigma^2) dt + sigma sqrt(dt) Z)`.
pub fn generate_gbm_paths(
    workspace: &mut PathWorkspace,
    gbm: GbmParams,
    n_paths: usize,
    n_steps: usize,
) {
    let dt = gbm.maturity / n_steps as f64;
    let drift = (gbm.rate - 0.5 * gbm.volatility * gbm.volatility) * dt;
    let vol_sqrt_dt = gbm.volatility * dt.sqrt();
    let n_steps_plus_1 = n_steps + 1;

    let (paths, randoms) = workspace.paths_mut_and_randoms();

    for path_idx in 0..n_paths {
        let base = path_idx * n_steps_plus_1;
        paths[base] = gbm.spot;
        for step in 0..n_steps {
            let z = randoms[path_idx * n_steps + step];
            let prev = paths[base + step];
            paths[base + step + 1] = prev * (drift + vol_sqrt_dt * z).exp();
        }
    }
}

/// Generates GBM paths together with their forward tangent with respect to
/// spot, seeded by `d_spot` (the perturbation of `spot` to propagate).
///
/// Returns a flat buffer with the same `n_paths * (n_steps + 1)` layout as
/// `workspace.paths()`, holding `d(S_t)/d(S_0) * d_spot` at each point. Since
/// the GBM recursion is multiplicative, the tangent recursion is the same
/// transition applied to the tangent value:
/// `dS_{t+dt} = dS_t * exp((r - 0.5 sigma^2) dt + sigma sqrt(dt) Z)`.
///
/// Also writes the primal paths into `workspace.paths_mut()` as a side
/// effect, using the same draws.
pub fn generate_gbm_paths_tangent_spot(
    workspace: &mut PathWorkspace,
    gbm: GbmParams,
    d_spot: f64,
    n_paths: usize,
    n_steps: usize,
) -> Vec<f64> {
    let dt = gbm.maturity / n_steps as f64;
    let drift = (gbm.rate - 0.5 * gbm.volatility * gbm.volatility) * dt;
    let vol_sqrt_dt = gbm.volatility * dt.sqrt();
    let n_steps_plus_1 = n_steps + 1;

    let mut tangents = vec![0.0; n_paths * n_steps_plus_1];

    let (paths, randoms) = workspace.paths_mut_and_randoms();

    for path_idx in 0..n_paths {
        let base = path_idx * n_steps_plus_1;
        paths[base] = gbm.spot;
        tangents[base] = d_spot;
        for step in 0..n_steps {
            let z = randoms[path_idx * n_steps + step];
            let growth = (drift + vol_sqrt_dt * z).exp();
            let prev = paths[base + step];
            paths[base + step + 1] = prev * growth;
            tangents[base + step + 1] = tangents[base + step] * growth;
        }
    }

    tangents
}
