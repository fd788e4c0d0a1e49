//! Interest rate Cap and Floor implementation.
//!
//! This module provides:
//! - [`Cap`]: Series of caplets that pay when rates exceed a strike
//! - [`Floor`]: Series of floorlets that pay when rates fall below a strike
//! - [`Collar`]: Combination of a cap and floor
//!
//! # Structure
//!
//! A cap/floor consists of a series of options (caplets/floorlets) on
//! a floating rate index. Each caplet/floorlet is an option on a
//! single forward rate for one period.
//!
//! # Payoff
//!
//! For each period i:
//! - **Caplet**: max(ForwardRate_i - Strike, 0) × YearFraction × Notional
//! - **Floorlet**: max(Strike - ForwardRate_i, 0) × YearFraction × Notional
//!
//! # Example
//!
//! ```
//! use pricer_models::instruments::rates::{Cap, Floor, Collar, RateIndex};
//! use pricer_models::schedules::{ScheduleBuilder, Frequency};
//! use pricer_core::types::{Currency, time::{Date, DayCountConvention}};
//!
//! let start = Date::from_ymd(2024, 1, 15).unwrap();
//! let end = Date::from_ymd(2027, 1, 15).unwrap();
//!
//! let schedule = ScheduleBuilder::new()
//!     .start(start)
//!     .end(end)
//!     .frequency(Frequency::Quarterly)
//!     .day_count(DayCountConvention::ActualActual360)
//!     .build()
//!     .unwrap();
//!
//! let cap = Cap::new(
//!     1_000_000.0,
//!     schedule,
//!     0.04, // 4% strike
//!     RateIndex::Sofr,
//!     Currency::USD,
//! );
//!
//! assert_eq!(cap.strike(), 0.04);
//! ```

use num_traits::Float;
use pricer_core::types::time::DayCountConvention;
use pricer_core::types::Currency;

use super::RateIndex;
use crate::schedules::Schedule;

/// Interest rate cap.
///
/// A cap is a series of caplets, each of which pays
/// max(ForwardRate - Strike, 0) × YearFraction × Notional
/// for a given period.
///
/// Caps are used to hedge against rising interest rates.
#[derive(Debug, Clone)]
pub struct Cap<T: Float> {
    /// Notional principal amount.
    notional: T,
    /// Payment schedule (defines caplet periods).
    schedule: Schedule,
    /// Strike rate.
    strike: T,
    /// Reference rate index.
    index: RateIndex,
    /// Day count convention.
    day_count: DayCountConvention,
    /// Settlement currency.
    currency: Currency,
}

impl<T: Float> Cap<T> {
    /// Create a new interest rate cap.
    ///
    /// # Arguments
    ///
    /// * `notional` - Notional principal amount
    /// * `schedule` - Payment schedule (defines caplet periods)
    /// * `strike` - Cap strike rate
    /// * `index` - Reference rate index
    /// * `currency` - Settlement currency
    pub fn new(
        notional: T,
        schedule: Schedule,
        strike: T,
        index: RateIndex,
        currency: Currency,
    ) -> Self {
        let day_count = index.default_day_count();
        Self {
            notional,
            schedule,
            strike,
            index,
            day_count,
            currency,
        }
    }

    /// Create a new cap with custom day count convention.
    pub fn with_day_count(
        notional: T,
        schedule: Schedule,
        strike: T,
        index: RateIndex,
        day_count: DayCountConvention,
        currency: Currency,
    ) -> Self {
        Self {
            notional,
            schedule,
            strike,
            index,
            day_count,
            currency,
        }
    }

    /// Returns the notional amount.
    #[inline]
    pub fn notional(&self) -> T {
        self.notional
    }

    /// Returns the payment schedule.
    #[inline]
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Returns the strike rate.
    #[inline]
    pub fn strike(&self) -> T {
        self.strike
    }

    /// Returns the reference rate index.
    #[inline]
    pub fn index(&self) -> RateIndex {
        self.index
    }

    /// Returns the day count convention.
    #[inline]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Returns the settlement currency.
    #[inline]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the maturity time in years (from start to end of last period).
    pub fn maturity(&self) -> T {
        let periods = self.schedule.periods();
        match (periods.first(), periods.last()) {
            (Some(first), Some(last)) => {
                let year_frac = DayCountConvention::ActualActual365
                    .year_fraction_dates(first.start(), last.end());
                T::from(year_frac).unwrap_or_else(T::zero)
            }
            _ => T::zero(),
        }
    }

    /// Returns the number of caplets.
    #[inline]
    pub fn num_caplets(&self) -> usize {
        self.schedule.periods().len()
    }
}

/// Interest rate floor.
///
/// A floor is a series of floorlets, each of which pays
/// max(Strike - ForwardRate, 0) × YearFraction × Notional
/// for a given period.
///
/// Floors are used to hedge against falling interest rates.
#[derive(Debug, Clone)]
pub struct Floor<T: Float> {
    /// Notional principal amount.
    notional: T,
    /// Payment schedule (defines floorlet periods).
    schedule: Schedule,
    /// Strike rate.
    strike: T,
    /// Reference rate index.
    index: RateIndex,
    /// Day count convention.
    day_count: DayCountConvention,
    /// Settlement currency.
    currency: Currency,
}

impl<T: Float> Floor<T> {
    /// Create a new interest rate floor.
    ///
    /// # Arguments
    ///
    /// * `notional` - Notional principal amount
    /// * `schedule` - Payment schedule (defines floorlet periods)
    /// * `strike` - Floor strike rate
    /// * `index` - Reference rate index
    /// * `currency` - Settlement currency
    pub fn new(
        notional: T,
        schedule: Schedule,
        strike: T,
        index: RateIndex,
        currency: Currency,
    ) -> Self {
        let day_count = index.default_day_count();
        Self {
            notional,
            schedule,
            strike,
            index,
            day_count,
            currency,
        }
    }

    /// Create a new floor with custom day count convention.
    pub fn with_day_count(
        notional: T,
        schedule: Schedule,
        strike: T,
        index: RateIndex,
        day_count: DayCountConvention,
        currency: Currency,
    ) -> Self {
        Self {
            notional,
            schedule,
            strike,
            index,
            day_count,
            currency,
        }
    }

    /// Returns the notional amount.
    #[inline]
    pub fn notional(&self) -> T {
        self.notional
    }

    /// Returns the payment schedule.
    #[inline]
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Returns the strike rate.
    #[inline]
    pub fn strike(&self) -> T {
        self.strike
    }

    /// Returns the reference rate index.
    #[inline]
    pub fn index(&self) -> RateIndex {
        self.index
    }

    /// Returns the day count convention.
    #[inline]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Returns the settlement currency.
    #[inline]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the maturity time in years (from start to end of last period).
    pub fn maturity(&self) -> T {
        let periods = self.schedule.periods();
        match (periods.first(), periods.last()) {
            (Some(first), Some(last)) => {
                let year_frac = DayCountConvention::ActualActual365
                    .year_fraction_dates(first.start(), last.end());
                T::from(year_frac).unwrap_or_else(T::zero)
            }
            _ => T::zero(),
        }
    }

    /// Returns the number of floorlets.
    #[inline]
    pub fn num_floorlets(&self) -> usize {
        self.schedule.periods().len()
    }
}

/// Interest rate collar.
///
/// A collar is a combination of:
/// - Buying a cap at the cap strike
/// - Selling a floor at the floor strike
///
/// This limits both upside and downside interest rate exposure.
/// Often structured as a zero-cost collar where cap and floor
/// premiums offset each other.
#[derive(Debug, Clone)]
pub struct Collar<T: Float> {
    /// The cap component.
    cap: Cap<T>,
    /// The floor component.
    floor: Floor<T>,
}

impl<T: Float> Collar<T> {
    /// Create a new interest rate collar.
    ///
    /// # Arguments
    ///
    /// * `notional` - Notional principal amount
    /// * `schedule` - Payment schedule
    /// * `cap_strike` - Cap strike rate (upper bound)
    /// * `floor_strike` - Floor strike rate (lower bound)
    /// * `index` - Reference rate index
    /// * `currency` - Settlement currency
    ///
    /// # Panics
    ///
    /// Panics if floor_strike >= cap_strike.
    pub fn new(
        notional: T,
        schedule: Schedule,
        cap_strike: T,
        floor_strike: T,
        index: RateIndex,
        currency: Currency,
    ) -> Self {
        assert!(
            floor_strike < cap_strike,
            "Floor strike must be less than cap strike"
        );

        let cap = Cap::new(notional, schedule.clone(), cap_strike, index, currency);
        let floor = Floor::new(notional, schedule, floor_strike, index, currency);

        Self { cap, floor }
    }

    /// Returns the cap component.
    #[inline]
    pub fn cap(&self) -> &Cap<T> {
        &self.cap
    }

    /// Returns the floor component.
    #[inline]
    pub fn floor(&self) -> &Floor<T> {
        &self.floor
    }

    /// Returns the cap strike rate.
    #[inline]
    pub fn cap_strike(&self) -> T {
        self.cap.strike()
    }

    /// Returns the floor strike rate.
    #[inline]
    pub fn floor_strike(&self) -> T {
        self.floor.strike()
    }

    /// Returns the notional amount.
    #[inline]
    pub fn notional(&self) -> T {
        self.cap.notional()
    }

    /// Returns the reference rate index.
    #[inline]
    pub fn index(&self) -> RateIndex {
        self.cap.index()
    }

    /// Returns the settlement currency.
    #[inline]
    pub fn currency(&self) -> Currency {
        self.cap.currency()
    }

    /// Returns the maturity.
    #[inline]
    pub fn maturity(&self) -> T {
        self.cap.maturity()
    }
}
