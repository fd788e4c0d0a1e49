//! Generic Greeks result type.

use crate::mc::Greek;
use num_traits::Float;

/// Generic result type for Greeks calculations.
///
/// Parameterized over the underlying numeric type `T` so the same field
/// layout serves both finite-difference runs (`T = f64`) and forward-mode AD
/// runs (`T` carrying dual-number derivatives), unlike
/// [`crate::mc::PricingResult`] which is hard-wired to `f64`.
///
/// # Examples
///
/// ```rust
/// use pricer_kernel::greeks::GreeksResult;
/// use pricer_kernel::mc::Greek;
///
/// let mut result = GreeksResult::price_only(10.45);
/// result.delta = Some(0.62);
///
/// assert_eq!(result.get(Greek::Delta), Some(0.62));
/// assert_eq!(result.get(Greek::Gamma), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GreeksResult<T: Float> {
    /// Present value of the instrument.
    pub price: T,
    /// Delta (dPrice/dSpot).
    pub delta: Option<T>,
    /// Gamma (d²Price/dSpot²).
    pub gamma: Option<T>,
    /// Vega (dPrice/dVolatility).
    pub vega: Option<T>,
    /// Theta (dPrice/dTime).
    pub theta: Option<T>,
    /// Rho (dPrice/dRate).
    pub rho: Option<T>,
}

impl<T: Float> GreeksResult<T> {
    /// Builds a result holding only the price, with every Greek unset.
    pub fn price_only(price: T) -> Self {
        Self {
            price,
            delta: None,
            gamma: None,
            vega: None,
            theta: None,
            rho: None,
        }
    }

    /// Looks up a single Greek by name, if it was computed.
    pub fn get(&self, greek: Greek) -> Option<T> {
        match greek {
            Greek::Delta => self.delta,
            Greek::Gamma => self.gamma,
            Greek::Vega => self.vega,
            Greek::Theta => self.theta,
            Greek::Rho => self.rho,
        }
    }

    /// Returns `true` if at least one Greek has been computed.
    pub fn has_any_greek(&self) -> bool {
        self.delta.is_some()
            || self.gamma.is_some()
            || self.vega.is_some()
            || self.theta.is_some()
            || self.rho.is_some()
    }
}
