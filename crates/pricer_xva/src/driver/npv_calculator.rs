//! `NPVCalculator` (§4.5): `trade.instrument.NPV * fxSpot(tradeCcy→baseCcy) / numeraire`.

use pricer_script::Model;

use crate::cube::{NpvCube, DEPTH_NPV};
use crate::error::AggregationError;
use crate::scenario_data::AggregationScenarioData;

use super::as_of::AsOfModel;
use super::calculator::{to_base_ccy, Calculator};
use super::trade_script::TradeScript;

/// Writes the trade's path-wise present value into the cube's NPV depth.
#[derive(Debug, Default, Clone, Copy)]
pub struct NpvCalculator;

impl Calculator for NpvCalculator {
    fn depth(&self) -> usize {
        DEPTH_NPV
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
        pricer_script::Engine::run(script.root(), &mut ctx, &dated).map_err(|error| {
            AggregationError::ScriptFailure {
                trade: cube.trade_ids()[trade].clone(),
                error,
            }
        })?;
        let npv = ctx
            .get_scalar(script.result_variable())
            .map_err(|_| AggregationError::MissingResultVariable {
                trade: cube.trade_ids()[trade].clone(),
                variable: script.result_variable().to_string(),
            })?
            .as_number()
            .map_err(|e| AggregationError::ScriptFailure {
                trade: cube.trade_ids()[trade].clone(),
                error: pricer_script::error::locate(e, None),
            })?
            .to_vec();

        let converted = to_base_ccy(&npv, date, trade_ccy, base_ccy, scenario)?;
        cube.row_mut(trade, date, DEPTH_NPV).copy_from_slice(
            &converted.iter().map(|&v| v as f32).collect::<Vec<f32>>(),
        );
        Ok(())
    }

    fn calculate_t0(
        &self,
        trade: usize,
        trade_ccy: &str,
        base_ccy: &str,
        script: &TradeScript,
        model: &dyn Model,
        scenario: &AggregationScenarioData,
        cube: &mut NpvCube,
    ) -> Result<(), AggregationError> {
        let mut ctx = script.fresh_context(model.size());
        let dated = AsOfModel::new(model, model.reference_date());
        pricer_script::Engine::run(script.root(), &mut ctx, &dated).map_err(|error| {
            AggregationError::ScriptFailure {
                trade: cube.trade_ids()[trade].clone(),
                error,
            }
        })?;
        let npv = ctx
            .get_scalar(script.result_variable())
            .map_err(|_| AggregationError::MissingResultVariable {
                trade: cube.trade_ids()[trade].clone(),
                variable: script.result_variable().to_string(),
            })?
            .as_number()
            .map_err(|e| AggregationError::ScriptFailure {
                trade: cube.trade_ids()[trade].clone(),
                error: pricer_script::error::locate(e, None),
            })?
            .to_vec();

        let converted = to_base_ccy(&npv, 0, trade_ccy, base_ccy, scenario)?;
        let mean = converted.iter().sum::<f64>() / converted.len().max(1) as f64;
        cube.set_t0(trade, DEPTH_NPV, mean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricer_script::error::ScriptError;
    use pricer_script::model::{FwdCompAvgArgs, ModelType, NpvArgs};
    use pricer_script::RandomVariable;

    struct FlatDiscountModel {
        size: usize,
        rate: f64,
    }

    impl Model for FlatDiscountModel {
        fn size(&self) -> usize {
            self.size
        }
        fn reference_date(&self) -> f64 {
            0.0
        }
        fn dt(&self, from: &RandomVariable, to: &RandomVariable) -> Result<RandomVariable, ScriptError> {
            Ok(to - from)
        }
        fn pay(&self, amount: &RandomVariable, _obs: &RandomVariable, pay: &RandomVariable, _ccy: &str) -> Result<RandomVariable, ScriptError> {
            let df = RandomVariable::deterministic(self.size, (-self.rate * pay.at(0)).exp());
            Ok(amount * &df)
        }
        fn discount(&self, _obs: &RandomVariable, pay: &RandomVariable, _ccy: &str) -> Result<RandomVariable, ScriptError> {
            Ok(RandomVariable::deterministic(self.size, (-self.rate * pay.at(0)).exp()))
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
    fn writes_deterministic_discount_bond_npv() {
        let model = FlatDiscountModel { size: 2, rate: 0.05 };
        let script = TradeScript::parse("NUMBER NPV; NPV = pay(1.0, 0, 1, \"USD\");").unwrap();
        let scenario = flat_scenario(2, 2);
        let mut cube = NpvCube::with_default_depth(vec!["T1".to_string()], vec![0.0, 1.0], 2);

        let calc = NpvCalculator;
        calc.calculate(0, "USD", "USD", &script, 1, &[0.0, 1.0], &model, &scenario, &mut cube)
            .unwrap();

        let expected = (-0.05f64).exp();
        assert!((cube.get(0, 1, 0, DEPTH_NPV).unwrap() - expected).abs() < 1e-6);
        assert!((cube.get(0, 1, 1, DEPTH_NPV).unwrap() - expected).abs() < 1e-6);
    }

    #[test]
    fn calculate_t0_populates_the_t0_row() {
        let model = FlatDiscountModel { size: 2, rate: 0.05 };
        let script = TradeScript::parse("NUMBER NPV; NPV = pay(1.0, 0, 1, \"USD\");").unwrap();
        let scenario = flat_scenario(1, 2);
        let mut cube = NpvCube::with_default_depth(vec!["T1".to_string()], vec![0.0], 2);

        let calc = NpvCalculator;
        calc.calculate_t0(0, "USD", "USD", &script, &model, &scenario, &mut cube)
            .unwrap();

        let expected = (-0.05f64).exp();
        assert!((cube.get_t0(0, DEPTH_NPV).unwrap() - expected).abs() < 1e-6);
    }

    #[test]
    fn missing_result_variable_is_reported() {
        let model = FlatDiscountModel { size: 1, rate: 0.0 };
        let script = TradeScript::parse("NUMBER x; x = 1.0;").unwrap();
        let scenario = flat_scenario(1, 1);
        let mut cube = NpvCube::with_default_depth(vec!["T1".to_string()], vec![0.0], 1);

        let calc = NpvCalculator;
        let err = calc
            .calculate(0, "USD", "USD", &script, 0, &[0.0], &model, &scenario, &mut cube)
            .unwrap_err();
        assert!(matches!(err, AggregationError::MissingResultVariable { .. }));
    }
}
