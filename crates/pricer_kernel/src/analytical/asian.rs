//! Geometric average Asian option pricing (Kemna-Vorst, 1990).
//!
//! The geometric average of a lognormal process is itself lognormal, so a
//! geometric Asian option has a closed-form Black-Scholes-style price. This
//! serves as a cross-check for the Monte Carlo arithmetic-average Asian
//! payoff in [`crate::mc`]: the two track closely for low volatility and
//! diverge as volatility grows, since the arithmetic mean is always at
//! least as large as the geometric mean.

use super::barrier::norm_cdf;
use num_traits::Float;

/// Parameters for geometric Asian option pricing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometricAsianParams<T: Float> {
    /// Spot price.
    pub spot: T,
    /// Strike price.
    pub strike: T,
    /// Risk-free rate.
    pub rate: T,
    /// Dividend (or foreign/repo) yield.
    pub dividend: T,
    /// Volatility of the underlying.
    pub volatility: T,
    /// Time to maturity, in years.
    pub maturity: T,
}

impl<T: Float> GeometricAsianParams<T> {
    /// Creates new geometric Asian option parameters.
    pub fn new(spot: T, strike: T, rate: T, dividend: T, volatility: T, maturity: T) -> Self {
        Self {
            spot,
            strike,
            rate,
            dividend,
            volatility,
            maturity,
        }
    }

    fn adjusted_vol(&self) -> T {
        self.volatility / T::from(3.0).unwrap().sqrt()
    }

    fn adjusted_drift(&self) -> T {
        let half = T::from(0.5).unwrap();
        let six = T::from(6.0).unwrap();
        half * (self.rate - self.dividend - self.volatility * self.volatility / six)
    }

    fn d1_d2(&self) -> (T, T) {
        let sigma_a = self.adjusted_vol();
        let b_a = self.adjusted_drift();
        let sqrt_t = self.maturity.sqrt();
        let vol_sqrt_t = sigma_a * sqrt_t;
        let half = T::from(0.5).unwrap();

        let d1 = ((self.spot / self.strike).ln() + (b_a + half * sigma_a * sigma_a) * self.maturity)
            / vol_sqrt_t;
        let d2 = d1 - vol_sqrt_t;
        (d1, d2)
    }
}

/// Result of a geometric Asian option pricing call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometricAsianResult<T: Float> {
    /// Option price.
    pub price: T,
    /// d1 parameter, also useful as an approximate delta-adjacent quantity.
    pub d1: T,
    /// d2 parameter.
    pub d2: T,
}

/// Prices a geometric-average Asian call option.
///
/// # Examples
///
/// ```rust
/// use pricer_kernel::analytical::geometric_asian_call;
///
/// let price = geometric_asian_call(100.0, 100.0, 0.05, 0.0, 0.2, 1.0);
/// assert!(price > 0.0 && price < 100.0);
/// ```
pub fn geometric_asian_call<T: Float>(
    spot: T,
    strike: T,
    rate: T,
    dividend: T,
    volatility: T,
    maturity: T,
) -> T {
    geometric_asian_call_with_details(&GeometricAsianParams::new(
        spot, strike, rate, dividend, volatility, maturity,
    ))
    .price
}

/// Prices a geometric-average Asian put option.
pub fn geometric_asian_put<T: Float>(
    spot: T,
    strike: T,
    rate: T,
    dividend: T,
    volatility: T,
    maturity: T,
) -> T {
    geometric_asian_put_with_details(&GeometricAsianParams::new(
        spot, strike, rate, dividend, volatility, maturity,
    ))
    .price
}

/// Prices a geometric-average Asian call, returning the d1/d2 terms alongside
/// the price.
pub fn geometric_asian_call_with_details<T: Float>(
    params: &GeometricAsianParams<T>,
) -> GeometricAsianResult<T> {
    let zero = T::zero();
    if params.maturity <= zero || params.volatility <= zero {
        return GeometricAsianResult {
            price: (params.spot - params.strike).max(zero),
            d1: zero,
            d2: zero,
        };
    }

    let (d1, d2) = params.d1_d2();
    let b_a = params.adjusted_drift();
    let fwd_factor = ((b_a - params.rate) * params.maturity).exp();
    let discount = (-params.rate * params.maturity).exp();

    let price =
        params.spot * fwd_factor * norm_cdf(d1) - params.strike * discount * norm_cdf(d2);

    GeometricAsianResult {
        price: price.max(zero),
        d1,
        d2,
    }
}

/// Prices a geometric-average Asian put, returning the d1/d2 terms alongside
/// the price.
pub fn geometric_asian_put_with_details<T: Float>(
    params: &GeometricAsianParams<T>,
) -> GeometricAsianResult<T> {
    let zero = T::zero();
    if params.maturity <= zero || params.volatility <= zero {
        return GeometricAsianResult {
            price: (params.strike - params.spot).max(zero),
            d1: zero,
            d2: zero,
        };
    }

    let (d1, d2) = params.d1_d2();
    let b_a = params.adjusted_drift();
    let fwd_factor = ((b_a - params.rate) * params.maturity).exp();
    let discount = (-params.rate * params.maturity).exp();

    let price = params.strike * discount * norm_cdf(-d2)
        - params.spot * fwd_factor * norm_cdf(-d1);

    GeometricAsianResult {
        price: price.max(zero),
        d1,
        d2,
    }
}
