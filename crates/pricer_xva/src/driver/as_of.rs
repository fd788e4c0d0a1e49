//! Wraps a [`Model`] so its `reference_date()` reports a chosen grid date
//! while every other capability (path state, fixings, regression basis)
//! stays that of the inner model.

use pricer_script::error::ScriptError;
use pricer_script::model::{FwdCompAvgArgs, ModelType, NpvArgs};
use pricer_script::{Model, RandomVariable};

/// "Set evaluation date on SimMarket" (§4.5 step 2a), expressed as a thin
/// wrapper rather than mutation: the underlying model already carries the
/// full path history for every simulation date (it is addressed by
/// explicit `obs`/`pay` arguments throughout the `Model` trait), so
/// "advancing" to date `d` only needs to change what "today" means for the
/// `pay`/`npv` primitives' past-payment and clamping rules.
pub struct AsOfModel<'a, M: Model + ?Sized> {
    inner: &'a M,
    as_of: f64,
}

impl<'a, M: Model + ?Sized> AsOfModel<'a, M> {
    /// Wraps `inner`, overriding `reference_date()` to `as_of` (a year
    /// fraction from the inner model's own reference date).
    pub fn new(inner: &'a M, as_of: f64) -> Self {
        Self { inner, as_of }
    }
}

impl<'a, M: Model + ?Sized> Model for AsOfModel<'a, M> {
    fn size(&self) -> usize {
        self.inner.size()
    }

    fn reference_date(&self) -> f64 {
        self.as_of
    }

    fn dt(&self, from: &RandomVariable, to: &RandomVariable) -> Result<RandomVariable, ScriptError> {
        self.inner.dt(from, to)
    }

    fn pay(
        &self,
        amount: &RandomVariable,
        obs: &RandomVariable,
        pay: &RandomVariable,
        ccy: &str,
    ) -> Result<RandomVariable, ScriptError> {
        self.inner.pay(amount, obs, pay, ccy)
    }

    fn discount(&self, obs: &RandomVariable, pay: &RandomVariable, ccy: &str) -> Result<RandomVariable, ScriptError> {
        self.inner.discount(obs, pay, ccy)
    }

    fn npv(&self, args: NpvArgs<'_>) -> Result<RandomVariable, ScriptError> {
        self.inner.npv(args)
    }

    fn eval(&self, index: &str, obs: &RandomVariable, fwd: Option<&RandomVariable>) -> Result<RandomVariable, ScriptError> {
        self.inner.eval(index, obs, fwd)
    }

    fn fwd_comp_avg(&self, args: FwdCompAvgArgs<'_>) -> Result<RandomVariable, ScriptError> {
        self.inner.fwd_comp_avg(args)
    }

    fn barrier_probability(
        &self,
        index: &str,
        obs1: &RandomVariable,
        obs2: &RandomVariable,
        barrier: &RandomVariable,
        above: bool,
    ) -> Result<RandomVariable, ScriptError> {
        self.inner.barrier_probability(index, obs1, obs2, barrier, above)
    }

    fn has_historical_fixing(&self, index: &str, obs: f64) -> bool {
        self.inner.has_historical_fixing(index, obs)
    }

    fn historical_fixing(&self, index: &str, obs: f64) -> Option<f64> {
        self.inner.historical_fixing(index, obs)
    }

    fn black(&self, cp: f64, dt: &RandomVariable, strike: &RandomVariable, forward: &RandomVariable, vol: &RandomVariable) -> RandomVariable {
        self.inner.black(cp, dt, strike, forward, vol)
    }

    fn model_type(&self) -> ModelType {
        self.inner.model_type()
    }
}
