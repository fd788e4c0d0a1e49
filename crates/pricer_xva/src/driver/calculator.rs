//! The `Calculator` capability (§4.5): one slot-writer invoked per trade,
//! per valuation date.

use pricer_script::Model;

use crate::cube::NpvCube;
use crate::error::AggregationError;
use crate::scenario_data::AggregationScenarioData;

use super::trade_script::TradeScript;

/// A single cube-depth writer. `NPVCalculator` and `CashflowCalculator`
/// (§4.5) are the two concrete implementations; additional calculators
/// (e.g. a Greeks slot) plug into the same driver loop by implementing
/// this trait against an unused depth index.
pub trait Calculator {
    /// The cube depth slot this calculator owns.
    fn depth(&self) -> usize;

    /// Evaluates `script` against `model` (already wrapped to report
    /// `as_of` as its reference date) and writes the result into
    /// `cube`'s `(trade, date, self.depth())` row.
    #[allow(clippy::too_many_arguments)]
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
    ) -> Result<(), AggregationError>;

    /// Populates the cube's t=0 row for this calculator's depth (§4.5 step 3).
    fn calculate_t0(
        &self,
        trade: usize,
        trade_ccy: &str,
        base_ccy: &str,
        script: &TradeScript,
        model: &dyn Model,
        scenario: &AggregationScenarioData,
        cube: &mut NpvCube,
    ) -> Result<(), AggregationError>;
}

/// Converts an in-currency, numeraire-normalized row into the cube's base
/// currency, dividing by the numeraire and multiplying by the FX spot —
/// the conversion every `Calculator` applies before writing (§4.5).
pub(super) fn to_base_ccy(
    raw: &[f64],
    date: usize,
    trade_ccy: &str,
    base_ccy: &str,
    scenario: &AggregationScenarioData,
) -> Result<Vec<f64>, AggregationError> {
    if trade_ccy.eq_ignore_ascii_case(base_ccy) {
        let numeraire = scenario.slice(&crate::scenario_data::numeraire_key(base_ccy), date)?;
        return Ok(raw
            .iter()
            .zip(numeraire)
            .map(|(v, n)| v / n)
            .collect());
    }
    let fx = scenario.slice(&crate::scenario_data::fx_spot_key(trade_ccy, base_ccy), date)?;
    let numeraire = scenario.slice(&crate::scenario_data::numeraire_key(base_ccy), date)?;
    Ok(raw
        .iter()
        .zip(fx)
        .zip(numeraire)
        .map(|((v, f), n)| v * f / n)
        .collect())
}
