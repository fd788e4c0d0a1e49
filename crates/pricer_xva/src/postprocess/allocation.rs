//! Allocates a netting set's standalone XVA down to its constituent trades
//! (§4.6 step 5).
//!
//! Netting benefits make a netting set's total XVA less than the sum of
//! what each trade would cost standalone, so there is no uniquely "correct"
//! way to split the total back out — each method below is a different
//! convention for doing so.

use std::collections::HashMap;

use crate::error::AggregationError;
use crate::portfolio::TradeId;

/// How a netting set's standalone XVA is allocated to its trades.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocationMethod {
    /// No allocation: only the netting-set-level XVA is reported.
    None,
    /// Weight by each trade's `|fair value|` (gross, ignores offsetting).
    RelativeFairValueGross,
    /// Weight by each trade's signed fair value (net; an offsetting trade
    /// can receive a negative share).
    RelativeFairValueNet,
    /// Weight by each trade's own standalone XVA, as if it were the only
    /// trade in the netting set.
    RelativeXVA,
    /// Euler (Pykhtin-Rosen) marginal allocation: each trade's share of the
    /// netting set's in-the-money exposure, weighted by its own
    /// contribution on exactly the samples/dates where the netting set
    /// itself is in the money.
    Marginal,
}

/// Per-trade inputs the allocation stage needs.
pub struct TradeAllocationInput {
    /// Trade identifier.
    pub trade_id: TradeId,
    /// Trade fair value (as-of valuation date NPV).
    pub fair_value: f64,
    /// The trade's own standalone XVA (computed as if it were the only
    /// trade in its netting set). Only read by [`AllocationMethod::RelativeXVA`].
    pub standalone_xva: f64,
    /// The trade's path-wise NPV, `paths[sample][date]`, same shape as the
    /// netting set's own path matrix. Only read by [`AllocationMethod::Marginal`].
    pub paths: Vec<Vec<f64>>,
}

fn equal_weights(inputs: &[TradeAllocationInput]) -> HashMap<TradeId, f64> {
    let n = inputs.len();
    if n == 0 {
        return HashMap::new();
    }
    let w = 1.0 / n as f64;
    inputs.iter().map(|t| (t.trade_id.clone(), w)).collect()
}

fn marginal_weights(
    inputs: &[TradeAllocationInput],
    netting_set_paths: &[Vec<f64>],
) -> HashMap<TradeId, f64> {
    let mut numerators = vec![0.0; inputs.len()];
    let mut denominator = 0.0;

    for (sample, total_path) in netting_set_paths.iter().enumerate() {
        for (date, &total_v) in total_path.iter().enumerate() {
            if total_v <= 0.0 {
                continue;
            }
            denominator += total_v;
            for (i, input) in inputs.iter().enumerate() {
                if let Some(sample_path) = input.paths.get(sample) {
                    if let Some(&v) = sample_path.get(date) {
                        numerators[i] += v;
                    }
                }
            }
        }
    }

    if denominator <= 0.0 {
        return equal_weights(inputs);
    }

    inputs
        .iter()
        .zip(numerators)
        .map(|(t, num)| (t.trade_id.clone(), num / denominator))
        .collect()
}

/// Computes each trade's allocation weight (summing to 1 across `inputs`,
/// unless `method` is [`AllocationMethod::None`] which returns an empty map).
///
/// [`AllocationMethod::RelativeFairValueGross`] and
/// [`AllocationMethod::RelativeFairValueNet`] require a non-zero denominator;
/// when the netting set's total fair value is exactly (or, for the gross
/// variant, non-positively) zero there is no ratio to allocate by, and this
/// returns [`AggregationError::ZeroDenominator`] rather than silently
/// falling back to an equal split.
pub fn allocation_weights(
    method: AllocationMethod,
    inputs: &[TradeAllocationInput],
    netting_set_paths: &[Vec<f64>],
) -> Result<HashMap<TradeId, f64>, AggregationError> {
    match method {
        AllocationMethod::None => Ok(HashMap::new()),
        AllocationMethod::RelativeFairValueGross => {
            let total: f64 = inputs.iter().map(|t| t.fair_value.abs()).sum();
            if total <= 0.0 {
                return Err(AggregationError::ZeroDenominator(
                    "RelativeFairValueGross: sum of |fair_value| is non-positive".to_string(),
                ));
            }
            Ok(inputs
                .iter()
                .map(|t| (t.trade_id.clone(), t.fair_value.abs() / total))
                .collect())
        }
        AllocationMethod::RelativeFairValueNet => {
            let total: f64 = inputs.iter().map(|t| t.fair_value).sum();
            if total == 0.0 {
                return Err(AggregationError::ZeroDenominator(
                    "RelativeFairValueNet: sum of fair_value is zero".to_string(),
                ));
            }
            Ok(inputs
                .iter()
                .map(|t| (t.trade_id.clone(), t.fair_value / total))
                .collect())
        }
        AllocationMethod::RelativeXVA => {
            let total: f64 = inputs.iter().map(|t| t.standalone_xva).sum();
            if total <= 0.0 {
                return Ok(equal_weights(inputs));
            }
            Ok(inputs
                .iter()
                .map(|t| (t.trade_id.clone(), t.standalone_xva / total))
                .collect())
        }
        AllocationMethod::Marginal => Ok(marginal_weights(inputs, netting_set_paths)),
    }
}

/// Splits `total_cva`/`total_dva` across trades according to `weights`.
pub fn allocate_xva(
    total_cva: f64,
    total_dva: f64,
    weights: &HashMap<TradeId, f64>,
) -> HashMap<TradeId, (f64, f64)> {
    weights
        .iter()
        .map(|(id, w)| (id.clone(), (total_cva * w, total_dva * w)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn input(id: &str, fair_value: f64, standalone_xva: f64, paths: Vec<Vec<f64>>) -> TradeAllocationInput {
        TradeAllocationInput {
            trade_id: TradeId::new(id),
            fair_value,
            standalone_xva,
            paths,
        }
    }

    #[test]
    fn none_returns_empty_weights() {
        let inputs = vec![input("T1", 10.0, 1.0, vec![])];
        let weights = allocation_weights(AllocationMethod::None, &inputs, &[]).unwrap();
        assert!(weights.is_empty());
    }

    #[test]
    fn relative_fair_value_gross_weights_sum_to_one() {
        let inputs = vec![
            input("T1", 10.0, 1.0, vec![]),
            input("T2", -30.0, 1.0, vec![]),
        ];
        let weights =
            allocation_weights(AllocationMethod::RelativeFairValueGross, &inputs, &[]).unwrap();
        assert_relative_eq!(weights.values().sum::<f64>(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(weights[&TradeId::new("T2")], 0.75, epsilon = 1e-9);
    }

    #[test]
    fn relative_fair_value_gross_rejects_zero_denominator() {
        let inputs = vec![input("T1", 0.0, 1.0, vec![]), input("T2", 0.0, 1.0, vec![])];
        let result = allocation_weights(AllocationMethod::RelativeFairValueGross, &inputs, &[]);
        assert!(matches!(result, Err(AggregationError::ZeroDenominator(_))));
    }

    #[test]
    fn relative_fair_value_net_allows_negative_share() {
        let inputs = vec![
            input("T1", 100.0, 1.0, vec![]),
            input("T2", -40.0, 1.0, vec![]),
        ];
        let weights =
            allocation_weights(AllocationMethod::RelativeFairValueNet, &inputs, &[]).unwrap();
        assert!(weights[&TradeId::new("T2")] < 0.0);
        assert_relative_eq!(weights.values().sum::<f64>(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn relative_fair_value_net_rejects_zero_denominator() {
        let inputs = vec![
            input("T1", 40.0, 1.0, vec![]),
            input("T2", -40.0, 1.0, vec![]),
        ];
        let result = allocation_weights(AllocationMethod::RelativeFairValueNet, &inputs, &[]);
        assert!(matches!(result, Err(AggregationError::ZeroDenominator(_))));
    }

    #[test]
    fn relative_xva_weights_by_standalone_xva() {
        let inputs = vec![
            input("T1", 0.0, 30.0, vec![]),
            input("T2", 0.0, 70.0, vec![]),
        ];
        let weights = allocation_weights(AllocationMethod::RelativeXVA, &inputs, &[]).unwrap();
        assert_relative_eq!(weights[&TradeId::new("T1")], 0.3, epsilon = 1e-9);
    }

    #[test]
    fn marginal_allocation_splits_by_itm_contribution() {
        // netting set total = T1 + T2 at each (sample, date)
        let t1_paths = vec![vec![10.0, 20.0], vec![-5.0, 5.0]];
        let t2_paths = vec![vec![5.0, 10.0], vec![5.0, -15.0]];
        let total_paths: Vec<Vec<f64>> = t1_paths
            .iter()
            .zip(t2_paths.iter())
            .map(|(a, b)| a.iter().zip(b.iter()).map(|(x, y)| x + y).collect())
            .collect();

        let inputs = vec![
            input("T1", 0.0, 0.0, t1_paths),
            input("T2", 0.0, 0.0, t2_paths),
        ];
        let weights = allocation_weights(AllocationMethod::Marginal, &inputs, &total_paths).unwrap();
        assert_relative_eq!(weights.values().sum::<f64>(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn allocate_xva_splits_totals_by_weight() {
        let mut weights = HashMap::new();
        weights.insert(TradeId::new("T1"), 0.4);
        weights.insert(TradeId::new("T2"), 0.6);
        let allocated = allocate_xva(100.0, 50.0, &weights);
        assert_relative_eq!(allocated[&TradeId::new("T1")].0, 40.0, epsilon = 1e-9);
        assert_relative_eq!(allocated[&TradeId::new("T2")].1, 30.0, epsilon = 1e-9);
    }
}
