//! `CashflowCalculator` (§4.5): sums the trade's `logpay` entries whose
//! payment date falls in `(dates[date-1], dates[date]]` into the cube's
//! cashflow depth.

use pricer_script::Model;

use crate::cube::{NpvCube, DEPTH_CASHFLOW};
use crate::error::AggregationError;
use crate::scenario_data::AggregationScenarioData;

use super::as_of::AsOfModel;
use super::calculator::{to_base_ccy, Calculator};
use super::trade_script::TradeScript;

/// Writes the trade's path-wise cashflow sum, per valuation period, into the
/// cube's cashflow depth.
#[derive(Debug, Default, Clone, Copy)]
pub struct CashflowCalculator;

impl CashflowCalculator {
    /// Sums every `PayLog` entry whose payment date falls in the half-open
    /// window `(window_start, window_end]`, lane by lane, into a fresh
    /// `RandomVariable` of the context's size.
    fn window_sum(
        log: &pricer_script::PayLog,
        window_start: f64,
        window_end: f64,
        n_samples: usize,
    ) -> pricer_script::RandomVariable {
        let mut total = pricer_script::RandomVariable::deterministic(n_samples, 0.0);
        for entry in log.entries() {
            if entry.pay > window_start && entry.pay <= window_end {
                total = &total + &entry.amount;
            }
        }
        total
    }
}

impl Calculator for CashflowCalculator {
    fn depth(&self) -> usize {
        DEPTH_CASHFLOW
    }

    fn calculate(
        &self,
        trade: usize,
        trade_ccy: &str,
        base_ccy: &str,
        script: &TradeScript,
        date: usize,
        dates: &[f64],
        model: &dyn Model,
        scenario: &AggregationScenarioData,
        cube: &mut NpvCube,
    ) -> Result<(), AggregationError> {
        let mut ctx = script.fresh_context(model.size());
        let dated = AsOfModel::new(model, dates[date]);
        let log = pricer_script::Engine::run(script.root(), &mut ctx, &dated).map_err(|error| {
            AggregationError::ScriptFailure {
                trade: cube.trade_ids()[trade].clone(),
                error,
            }
        })?;

        let window_start = if date == 0 { f64::NEG_INFINITY } else { dates[date - 1] };
        let sum = Self::window_sum(&log, window_start, dates[date], model.size());

        let converted = to_base_ccy(&sum.to_vec(), date, trade_ccy, base_ccy, scenario)?;
        cube.row_mut(trade, date, DEPTH_CASHFLOW).copy_from_slice(
            &converted.iter().map(|&v| v as f32).collect::<Vec<f32>>(),
        );
        Ok(())
    }

    fn calculate_t0(
        &self,
        trade: usize,
        _trade_ccy: &str,
        _base_ccy: &str,
        _script: &TradeScript,
        _model: &dyn Model,
        _scenario: &AggregationScenarioData,
        cube: &mut NpvCube,
    ) -> Result<(), AggregationError> {
        // No cashflow can have settled before the valuation date; the t=0
        // cashflow row stays at its initialized zero.
        cube.set_t0(trade, DEPTH_CASHFLOW, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricer_script::error::ScriptError;
    use pricer_script::model::{FwdCompAvgArgs, ModelType, NpvArgs};
    use pricer_script::RandomVariable;

    struct NoDiscountModel {
        size: usize,
    }

    impl Model for NoDiscountModel {
        fn size(&self) -> usize {
            self.size
        }
        fn reference_date(&self) -> f64 {
            0.0
        }
        fn dt(&self, from: &RandomVariable, to: &RandomVariable) -> Result<RandomVariable, ScriptError> {
            Ok(to - from)
        }
        fn pay(&self, amount: &RandomVariable, _obs: &RandomVariable, _pay: &RandomVariable, _ccy: &str) -> Result<RandomVariable, ScriptError> {
            Ok(amount.clone())
        }
        fn discount(&self, _obs: &RandomVariable, _pay: &RandomVariable, _ccy: &str) -> Result<RandomVariable, ScriptError> {
            Ok(RandomVariable::deterministic(self.size, 1.0))
        }
        fn npv(&self, args: NpvArgs<'_>) -> Result<RandomVariable, ScriptError> {
            Ok(args.amount.clone())
        }
        fn eval(&self, _index: &str, _obs: &RandomVariable, _fwd: Option<&RandomVariable>) -> Result<RandomVariable, ScriptError> {
            Ok(RandomVariable::deterministic(self.size, 1.0))
        }
        fn fwd_comp_avg(&self, _args: FwdCompAvgArgs<'_>) -> Result<RandomVariable, ScriptError> {
            Ok(RandomVariable::deterministic(self.size, 0.0))
        }
        fn barrier_probability(&self, _index: &str, _obs1: &RandomVariable, _obs2: &RandomVariable, _barrier: &RandomVariable, _above: bool) -> Result<RandomVariable, ScriptError> {
            Ok(RandomVariable::deterministic(self.size, 0.0))
        }
        fn has_historical_fixing(&self, _index: &str, _obs: f64) -> bool {
            false
        }
        fn historical_fixing(&self, _index: &str, _obs: f64) -> Option<f64> {
            None
        }
        fn black(&self, _cp: f64, _dt: &RandomVariable, _strike: &RandomVariable, _forward: &RandomVariable, _vol: &RandomVariable) -> RandomVariable {
            RandomVariable::deterministic(self.size, 0.0)
        }
        fn model_type(&self) -> ModelType {
            ModelType::MonteCarlo
        }
    }

    fn flat_scenario(n_dates: usize, n_samples: usize) -> AggregationScenarioData {
        let mut scenario = AggregationScenarioData::new(n_dates, n_samples);
        scenario
            .set_series(
                crate::scenario_data::numeraire_key("USD"),
                vec![1.0; n_dates * n_samples],
            )
            .unwrap();
        scenario
    }

    #[test]
    fn sums_cashflows_within_the_period_window() {
        let model = NoDiscountModel { size: 1 };
        let script = TradeScript::parse(
            "NUMBER NPV; logpay(1.0, 0, 0.5, \"USD\"); logpay(1.0, 0, 1.0, \"USD\"); NPV = 0.0;",
        )
        .unwrap();
        let scenario = flat_scenario(3, 1);
        let mut cube =
            NpvCube::with_default_depth(vec!["T1".to_string()], vec![0.0, 0.5, 1.0], 1);

        let calc = CashflowCalculator;
        calc.calculate(0, "USD", "USD", &script, 1, &[0.0, 0.5, 1.0], &model, &scenario, &mut cube)
            .unwrap();
        assert_eq!(cube.get(0, 1, 0, DEPTH_CASHFLOW).unwrap(), 1.0);

        calc.calculate(0, "USD", "USD", &script, 2, &[0.0, 0.5, 1.0], &model, &scenario, &mut cube)
            .unwrap();
        assert_eq!(cube.get(0, 2, 0, DEPTH_CASHFLOW).unwrap(), 1.0);
    }

    #[test]
    fn calculate_t0_leaves_the_row_zeroed() {
        let model = NoDiscountModel { size: 1 };
        let script = TradeScript::parse("NUMBER NPV; NPV = 0.0;").unwrap();
        let scenario = flat_scenario(1, 1);
        let mut cube = NpvCube::with_default_depth(vec!["T1".to_string()], vec![0.0], 1);

        let calc = CashflowCalculator;
        calc.calculate_t0(0, "USD", "USD", &script, &model, &scenario, &mut cube)
            .unwrap();
        assert_eq!(cube.get_t0(0, DEPTH_CASHFLOW).unwrap(), 0.0);
    }
}
