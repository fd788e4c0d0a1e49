//! Orchestrates the Valuation Driver's per-trade, per-date, per-calculator
//! loop and assembles the resulting [`NpvCube`] (§4.5).

use tracing::warn;

use pricer_script::Model;

use crate::cube::NpvCube;
use crate::error::AggregationError;
use crate::scenario_data::AggregationScenarioData;

use super::calculator::Calculator;
use super::trade_script::TradeScript;

/// One trade as the Valuation Driver sees it: an identifier, its settlement
/// currency, and the parsed payoff script the driver re-evaluates at every
/// grid date.
#[derive(Debug, Clone)]
pub struct DriverTrade {
    /// Trade identifier (matches the corresponding `NpvCube` row).
    pub id: String,
    /// Trade settlement currency.
    pub ccy: String,
    /// The trade's parsed payoff script.
    pub script: TradeScript,
}

impl DriverTrade {
    /// Builds a `DriverTrade`.
    pub fn new(id: impl Into<String>, ccy: impl Into<String>, script: TradeScript) -> Self {
        Self {
            id: id.into(),
            ccy: ccy.into(),
            script,
        }
    }
}

/// The result of a completed valuation run: the populated cube plus any
/// per-trade script failures encountered along the way.
///
/// A failing trade does not abort the run (§7's ALOG convention): its cube
/// rows are left at zero and the failure is recorded here instead.
#[derive(Debug)]
pub struct ValuationOutcome {
    /// The populated NPV cube.
    pub cube: NpvCube,
    /// `(trade_id, error)` pairs for trades whose script evaluation failed
    /// at some point during the run.
    pub failures: Vec<(String, AggregationError)>,
}

/// Drives a portfolio of scripted trades across a valuation date grid,
/// invoking each registered [`Calculator`] once per trade per date (plus
/// once per trade for the t=0 row) and writing the results into an
/// [`NpvCube`].
pub struct ValuationDriver {
    trades: Vec<DriverTrade>,
    dates: Vec<f64>,
    base_ccy: String,
    calculators: Vec<Box<dyn Calculator + Sync + Send>>,
}

impl ValuationDriver {
    /// Builds a driver for `trades` over `dates` (year fractions from the
    /// reference date), reporting cube values in `base_ccy`, writing one
    /// depth slot per entry in `calculators`.
    pub fn new(
        trades: Vec<DriverTrade>,
        dates: Vec<f64>,
        base_ccy: impl Into<String>,
        calculators: Vec<Box<dyn Calculator + Sync + Send>>,
    ) -> Self {
        Self {
            trades,
            dates,
            base_ccy: base_ccy.into(),
            calculators,
        }
    }

    /// Runs every trade against `model`/`scenario`, producing a populated
    /// cube. Trades whose script fails are skipped (their rows stay zero)
    /// and the failure is reported in [`ValuationOutcome::failures`] rather
    /// than aborting the remaining trades.
    pub fn run<M: Model + Sync>(
        &self,
        model: &M,
        scenario: &AggregationScenarioData,
    ) -> Result<ValuationOutcome, AggregationError> {
        let depth = self
            .calculators
            .iter()
            .map(|c| c.depth() + 1)
            .max()
            .unwrap_or(0);
        scenario.check_matches_cube(self.dates.len(), model.size())?;

        let trade_ids: Vec<String> = self.trades.iter().map(|t| t.id.clone()).collect();
        let mut cube = NpvCube::new(trade_ids, self.dates.clone(), model.size(), depth);
        let mut failures = Vec::new();

        for (trade_idx, trade) in self.trades.iter().enumerate() {
            if let Err(err) = self.run_trade(trade_idx, trade, model, scenario, &mut cube) {
                warn!(trade = %trade.id, error = %err, "trade valuation failed, leaving rows at zero");
                failures.push((trade.id.clone(), err));
            }
        }

        Ok(ValuationOutcome { cube, failures })
    }

    fn run_trade<M: Model + Sync>(
        &self,
        trade_idx: usize,
        trade: &DriverTrade,
        model: &M,
        scenario: &AggregationScenarioData,
        cube: &mut NpvCube,
    ) -> Result<(), AggregationError> {
        let model: &dyn Model = model;
        for calculator in &self.calculators {
            calculator.calculate_t0(trade_idx, &trade.ccy, &self.base_ccy, &trade.script, model, scenario, cube)?;
            for date in 0..self.dates.len() {
                calculator.calculate(
                    trade_idx,
                    &trade.ccy,
                    &self.base_ccy,
                    &trade.script,
                    date,
                    &self.dates,
                    model,
                    scenario,
                    cube,
                )?;
            }
        }
        Ok(())
    }
}
