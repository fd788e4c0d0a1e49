//! Pricing Model Interface — the capability set the script engine drives
//! while walking a payoff AST (§4.3).
//!
//! `pricer_script` is deliberately ignorant of curve bootstrapping, the
//! cross-asset short-rate model's calibration, and Monte-Carlo path
//! generation: those are external collaborators (`pricer_models`,
//! `pricer_optimiser`, `pricer_kernel`) that implement this trait. Dates
//! here are represented the same way the DSL's `obsDate`/`payDate`
//! expressions are: a deterministic `RandomVariable` holding a year
//! fraction measured from the model's reference (valuation) date — there
//! is no separate `Event` scalar type threaded through `Context`, since the
//! grammar (§4.2) never declares one.

use crate::error::ScriptError;
use crate::value::{Filter, RandomVariable};

/// Whether the backing model is path-wise Monte Carlo or a finite-difference
/// grid — `fwdCompAvg`/`npv`'s regression-based conditional expectation only
/// makes sense for the former.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelType {
    /// Path-wise Monte Carlo simulation.
    MonteCarlo,
    /// Finite-difference / PDE grid.
    FiniteDifference,
}

/// The optional spread/gearing block of `fwdComp`/`fwdAvg`.
#[derive(Debug, Clone)]
pub struct SpreadParams {
    /// Additive spread.
    pub spread: RandomVariable,
    /// Multiplicative gearing.
    pub gearing: RandomVariable,
}

/// The optional lookback/cutoff block of `fwdComp`/`fwdAvg`.
#[derive(Debug, Clone)]
pub struct LookbackParams {
    /// Lookback period (days), deterministic.
    pub lookback_days: i64,
    /// Rate cutoff (days), deterministic.
    pub rate_cutoff_days: i64,
    /// Fixing days, deterministic.
    pub fixing_days: i64,
    /// `true` if the spread is applied pre-compounding (encoded ±1 in the DSL).
    pub include_spread: bool,
}

/// The optional cap/floor block of `fwdComp`/`fwdAvg`.
#[derive(Debug, Clone)]
pub struct CapFloorParams {
    /// Cap level.
    pub cap: RandomVariable,
    /// Floor level.
    pub floor: RandomVariable,
    /// `true` if the option payout is naked (not bundled with the underlying coupon).
    pub naked_option: bool,
    /// `true` if cap/floor apply per accrual sub-period rather than on the total.
    pub local_cap_floor: bool,
}

/// Full argument set for `fwdComp`/`fwdAvg`, assembled by the engine from
/// the AST's optional blocks (§4.4).
pub struct FwdCompAvgArgs<'a> {
    /// `true` for `fwdAvg` (arithmetic average), `false` for `fwdComp` (compounded).
    pub is_average: bool,
    /// Index identifier (e.g. an overnight rate index name).
    pub index: &'a str,
    /// Observation date.
    pub obs: &'a RandomVariable,
    /// Accrual period start.
    pub start: &'a RandomVariable,
    /// Accrual period end.
    pub end: &'a RandomVariable,
    /// Optional spread/gearing block.
    pub spread: Option<SpreadParams>,
    /// Optional lookback/cutoff block.
    pub lookback: Option<LookbackParams>,
    /// Optional cap/floor block.
    pub cap_floor: Option<CapFloorParams>,
}

/// Arguments for a regression-based conditional expectation (`npv`/`npvmem`).
pub struct NpvArgs<'a> {
    /// Amount to condition-expect.
    pub amount: &'a RandomVariable,
    /// Observation date, clamped up to the reference date by the caller.
    pub obs: &'a RandomVariable,
    /// Optional filter restricting which paths participate in the regression.
    pub regression_filter: Option<&'a Filter>,
    /// Basis-reuse memory slot, when called via `npvmem`.
    pub memory_slot: Option<i64>,
    /// First optional extra regressor (beyond the model's default state).
    pub add_regressor_1: Option<&'a RandomVariable>,
    /// Second optional extra regressor.
    pub add_regressor_2: Option<&'a RandomVariable>,
}

/// The capability set a pricing model exposes to the script engine (§4.3).
///
/// All returned `RandomVariable`s must have length `size()`. Implementations
/// own their own stochastic calendar; `pricer_script` never inspects curve
/// or path internals directly.
pub trait Model {
    /// Number of Monte Carlo samples / lanes.
    fn size(&self) -> usize;

    /// The valuation (as-of) date, as a year fraction — always `0.0` under
    /// this engine's year-fraction-from-reference-date convention.
    fn reference_date(&self) -> f64;

    /// Year fraction used for volatility time between two dates.
    fn dt(&self, from: &RandomVariable, to: &RandomVariable) -> Result<RandomVariable, ScriptError>;

    /// Discounted payoff of `amount` observed at `obs`, paid at `pay`, in
    /// `ccy`, numeraire-normalized; zero if `pay` has already occurred.
    fn pay(
        &self,
        amount: &RandomVariable,
        obs: &RandomVariable,
        pay: &RandomVariable,
        ccy: &str,
    ) -> Result<RandomVariable, ScriptError>;

    /// Pathwise discount factor from `pay` back to `obs`, in `ccy`.
    fn discount(&self, obs: &RandomVariable, pay: &RandomVariable, ccy: &str) -> Result<RandomVariable, ScriptError>;

    /// Conditional expectation of `amount` at `obs`, by regression on path state.
    fn npv(&self, args: NpvArgs<'_>) -> Result<RandomVariable, ScriptError>;

    /// Realization of `index` at `obs`, or its forward value from `obs` to `fwd`.
    fn eval(&self, index: &str, obs: &RandomVariable, fwd: Option<&RandomVariable>) -> Result<RandomVariable, ScriptError>;

    /// Compounded/averaged overnight-rate coupon value.
    fn fwd_comp_avg(&self, args: FwdCompAvgArgs<'_>) -> Result<RandomVariable, ScriptError>;

    /// Path-by-path probability of `index` crossing `barrier` in `[obs1, obs2]`.
    fn barrier_probability(
        &self,
        index: &str,
        obs1: &RandomVariable,
        obs2: &RandomVariable,
        barrier: &RandomVariable,
        above: bool,
    ) -> Result<RandomVariable, ScriptError>;

    /// `true` iff a historical fixing is recorded for `index` at `obs`
    /// (threaded through the model's fixing-store handle per the §9 design
    /// note, rather than a process-wide singleton).
    fn has_historical_fixing(&self, index: &str, obs: f64) -> bool;

    /// The historical fixing value for `index` at `obs`, if recorded.
    fn historical_fixing(&self, index: &str, obs: f64) -> Option<f64>;

    /// Black-76 style option value: `black(cp, dt, strike, forward, vol)`.
    /// `cp` is +1 for a call, -1 for a put.
    fn black(&self, cp: f64, dt: &RandomVariable, strike: &RandomVariable, forward: &RandomVariable, vol: &RandomVariable) -> RandomVariable;

    /// Whether this model drives path-wise Monte Carlo or a FD grid.
    fn model_type(&self) -> ModelType;
}
