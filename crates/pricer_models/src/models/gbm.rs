//! Geometric Brownian Motion (GBM) model implementation.
//!
//! GBM is the fundamental model for asset price dynamics, described by:
//! ```text
//! dS = r * S * dt + sigma * S * dW
//! ```
//! where:
//! - S = asset price
//! - r = risk-free rate
//! - sigma = volatility
//! - dW = Wiener process increment
//!
//! ## Log-space formulation
//!
//! For numerical stability, we use the exact solution:
//! ```text
//! S(t+dt) = S(t) * exp((r - 0.5*sigma^2)*dt + sigma*sqrt(dt)*dW)
//! ```

use pricer_core::traits::priceable::Differentiable;
use pricer_core::traits::Float;

use super::stochastic::{SingleState, StochasticModel};

/// GBM model parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GBMParams<T: Float> {
    /// Initial spot price
    pub spot: T,
    /// Risk-free rate (annualized)
    pub rate: T,
    /// Volatility (annualized)
    pub volatility: T,
    /// Smooth approximation epsilon (for AD compatibility)
    pub smoothing_epsilon: T,
}

impl<T: Float> GBMParams<T> {
    /// Create new GBM parameters with validation.
    ///
    /// # Arguments
    /// * `spot` - Initial spot price (must be positive)
    /// * `rate` - Risk-free rate
    /// * `volatility` - Volatility (must be non-negative)
    ///
    /// # Returns
    /// `Some(GBMParams)` if valid, `None` otherwise
    pub fn new(spot: T, rate: T, volatility: T) -> Option<Self> {
        if spot <= T::zero() || volatility < T::zero() {
            return None;
        }
        Some(Self {
            spot,
            rate,
            volatility,
            smoothing_epsilon: T::from(1e-8).unwrap_or(T::zero()),
        })
    }

    /// Create parameters with custom smoothing epsilon.
    pub fn with_epsilon(mut self, epsilon: T) -> Self {
        self.smoothing_epsilon = epsilon;
        self
    }
}

impl<T: Float> Default for GBMParams<T> {
    fn default() -> Self {
        Self {
            spot: T::from(100.0).unwrap_or(T::one()),
            rate: T::from(0.05).unwrap_or(T::zero()),
            volatility: T::from(0.2).unwrap_or(T::zero()),
            smoothing_epsilon: T::from(1e-8).unwrap_or(T::zero()),
        }
    }
}

/// Geometric Brownian Motion model.
///
/// A single-factor model for asset price simulation using log-space formulation
/// for numerical stability.
#[derive(Clone, Debug, Default)]
pub struct GBMModel<T: Float> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T: Float> GBMModel<T> {
    /// Create a new GBM model instance.
    pub fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T: Float> Differentiable for GBMModel<T> {}

impl<T: Float + Default> StochasticModel<T> for GBMModel<T> {
    type State = SingleState<T>;
    type Params = GBMParams<T>;

    fn evolve_step(state: Self::State, dt: T, dw: &[T], params: &Self::Params) -> Self::State {
        // Log-space exact solution: S(t+dt) = S(t) * exp((r - 0.5*sigma^2)*dt + sigma*sqrt(dt)*dW)
        let s = state.0;
        let r = params.rate;
        let sigma = params.volatility;

        // Drift term: (r - 0.5 * sigma^2) * dt
        let half = T::from(0.5).unwrap_or(T::zero());
        let drift = (r - half * sigma * sigma) * dt;

        // Diffusion term: sigma * sqrt(dt) * dW
        let diffusion = sigma * dt.sqrt() * dw[0];

        // New price
        SingleState(s * (drift + diffusion).exp())
    }

    fn initial_state(params: &Self::Params) -> Self::State {
        SingleState(params.spot)
    }

    fn brownian_dim() -> usize {
        1
    }

    fn model_name() -> &'static str {
        "GBM"
    }

    fn num_factors() -> usize {
        1 // GBM is a single-factor model
    }
}
