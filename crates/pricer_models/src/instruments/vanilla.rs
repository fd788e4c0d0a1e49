//! Vanilla option definitions.
//!
//! This module provides vanilla option structures combining
//! common parameters, payoff types, and exercise styles.

use num_traits::Float;

use super::exercise::ExerciseStyle;
use super::params::InstrumentParams;
use super::payoff::PayoffType;

/// Vanilla option instrument.
///
/// Combines instrument parameters, payoff type, and exercise style
/// to represent a complete vanilla option contract.
///
/// # Type Parameters
/// * `T` - Floating-point type implementing `Float` (e.g., `f64`, `Dual64`)
///
/// # Examples
/// ```
/// use pricer_models::instruments::{
///     VanillaOption, InstrumentParams, PayoffType, ExerciseStyle,
/// };
///
/// let params = InstrumentParams::new(100.0_f64, 1.0, 1_000_000.0).unwrap();
/// let option = VanillaOption::new(
///     params,
///     PayoffType::Call,
///     ExerciseStyle::European,
///     1e-6,
/// );
///
/// // Calculate payoff at expiry
/// let payoff = option.payoff(110.0);
/// assert!((payoff - 10_000_000.0).abs() < 1000.0); // notional * (S - K)
/// ```
#[derive(Debug, Clone)]
pub struct VanillaOption<T: Float> {
    params: InstrumentParams<T>,
    payoff_type: PayoffType,
    exercise_style: ExerciseStyle<T>,
    epsilon: T,
}

impl<T: Float> VanillaOption<T> {
    /// Creates a new vanilla option.
    ///
    /// # Arguments
    /// * `params` - Instrument parameters (strike, expiry, notional)
    /// * `payoff_type` - Type of payoff (Call, Put, Digital)
    /// * `exercise_style` - Exercise style (European, American, etc.)
    /// * `epsilon` - Smoothing parameter for AD-compatible payoff
    ///
    /// # Examples
    /// ```
    /// use pricer_models::instruments::{
    ///     VanillaOption, InstrumentParams, PayoffType, ExerciseStyle,
    /// };
    ///
    /// let params = InstrumentParams::new(100.0_f64, 1.0, 1.0).unwrap();
    /// let option = VanillaOption::new(
    ///     params,
    ///     PayoffType::Call,
    ///     ExerciseStyle::European,
    ///     1e-6,
    /// );
    /// ```
    pub fn new(
        params: InstrumentParams<T>,
        payoff_type: PayoffType,
        exercise_style: ExerciseStyle<T>,
        epsilon: T,
    ) -> Self {
        Self {
            params,
            payoff_type,
            exercise_style,
            epsilon,
        }
    }

    /// Calculates the payoff at expiry for a given spot price.
    ///
    /// Returns `notional * payoff_per_unit` where payoff_per_unit
    /// is computed using smooth approximations for AD compatibility.
    ///
    /// # Arguments
    /// * `spot` - Current spot price
    ///
    /// # Returns
    /// Total payoff scaled by notional amount.
    ///
    /// # Examples
    /// ```
    /// use pricer_models::instruments::{
    ///     VanillaOption, InstrumentParams, PayoffType, ExerciseStyle,
    /// };
    ///
    /// let params = InstrumentParams::new(100.0_f64, 1.0, 1.0).unwrap();
    /// let call = VanillaOption::new(
    ///     params,
    ///     PayoffType::Call,
    ///     ExerciseStyle::European,
    ///     1e-6,
    /// );
    ///
    /// // ITM call: payoff ≈ 10
    /// let payoff = call.payoff(110.0);
    /// assert!((payoff - 10.0).abs() < 0.01);
    /// ```
    #[inline]
    pub fn payoff(&self, spot: T) -> T {
        let unit_payoff = self
            .payoff_type
            .evaluate(spot, self.params.strike(), self.epsilon);
        self.params.notional() * unit_payoff
    }

    /// Returns a reference to the instrument parameters.
    #[inline]
    pub fn params(&self) -> &InstrumentParams<T> {
        &self.params
    }

    /// Returns the payoff type.
    #[inline]
    pub fn payoff_type(&self) -> PayoffType {
        self.payoff_type
    }

    /// Returns a reference to the exercise style.
    #[inline]
    pub fn exercise_style(&self) -> &ExerciseStyle<T> {
        &self.exercise_style
    }

    /// Returns the smoothing epsilon.
    #[inline]
    pub fn epsilon(&self) -> T {
        self.epsilon
    }

    /// Returns the strike price.
    #[inline]
    pub fn strike(&self) -> T {
        self.params.strike()
    }

    /// Returns the time to expiry.
    #[inline]
    pub fn expiry(&self) -> T {
        self.params.expiry()
    }

    /// Returns the notional amount.
    #[inline]
    pub fn notional(&self) -> T {
        self.params.notional()
    }
}
