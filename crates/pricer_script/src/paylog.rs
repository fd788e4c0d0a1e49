//! Ordered path-wise cashflow record produced by `logpay` (§4.4/§4.5).
//!
//! A `PayLog` accumulates one [`PayLogEntry`] per `logpay` call encountered
//! while walking a trade's script, in script-execution order. The valuation
//! driver runs one trade per rayon task with its own `PayLog`, then merges
//! the per-trade logs back into a single report ordered by trade index —
//! the same thread-local-buffer-then-merge shape `pricer_xva`'s exposure
//! calculators use for the sample dimension.

use crate::value::RandomVariable;

/// One recorded cashflow: the undiscounted `amount` plus its observation/
/// payment dates and bookkeeping fields, vectorized across Monte Carlo paths.
#[derive(Debug, Clone)]
pub struct PayLogEntry {
    /// Undiscounted payoff amount, as passed to `logpay`.
    pub amount: RandomVariable,
    /// Observation date (year fraction from the model's reference date).
    pub obs: f64,
    /// Payment date (year fraction from the model's reference date).
    pub pay: f64,
    /// Settlement currency.
    pub ccy: String,
    /// Optional leg number, for multi-leg trades.
    pub leg_no: Option<i64>,
    /// Optional cashflow type name (e.g. `"Fixed"`, `"Floating"`).
    pub cashflow_type: Option<String>,
    /// Optional cube depth slot this cashflow should be attributed to.
    pub slot: Option<i64>,
}

/// The cashflow log for a single script evaluation.
#[derive(Debug, Clone, Default)]
pub struct PayLog {
    entries: Vec<PayLogEntry>,
}

impl PayLog {
    /// An empty log.
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Record a cashflow, in call order.
    pub fn push(&mut self, entry: PayLogEntry) {
        self.entries.push(entry);
    }

    /// Number of recorded cashflows.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if no cashflow has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recorded cashflows, in script-execution order.
    pub fn entries(&self) -> &[PayLogEntry] {
        &self.entries
    }

    /// Merge per-trade logs collected on separate rayon tasks into a single
    /// report ordered first by trade index, then by each trade's own
    /// script-execution order.
    pub fn merge(logs: Vec<(usize, PayLog)>) -> Vec<(usize, PayLogEntry)> {
        let mut ordered = logs;
        ordered.sort_by_key(|(trade_idx, _)| *trade_idx);
        ordered
            .into_iter()
            .flat_map(|(trade_idx, log)| log.entries.into_iter().map(move |e| (trade_idx, e)))
            .collect()
    }
}
