//! Valuation Driver: iterates the simulation grid, advances the market,
//! invokes per-trade calculators, and writes the NPV cube (§4.5).
//!
//! `pricer_script`'s `RandomVariable` already vectorizes a script evaluation
//! across every Monte Carlo sample, so where the spec's algorithm describes
//! an outer loop over scenario samples and an inner loop over valuation
//! dates, this driver's outer loop is over valuation dates only: one
//! `Engine::run` call per (trade, date) produces the whole cross-sample row
//! in a single pass, which is then written into the cube with
//! [`crate::cube::NpvCube::row_mut`]. "Advance SimMarket to scenario s" /
//! "set evaluation date" (§4.5 steps 1-2a) becomes [`AsOfModel`] wrapping
//! the trade's underlying [`pricer_script::Model`] with the grid date as
//! its `reference_date()`, which is what the `pay`/`npvmem` primitives use
//! to decide whether a cashflow has already settled.
mod as_of;
mod calculator;
mod cashflow_calculator;
mod npv_calculator;
mod trade_script;
mod valuation_driver;

pub use as_of::AsOfModel;
pub use calculator::Calculator;
pub use cashflow_calculator::CashflowCalculator;
pub use npv_calculator::NpvCalculator;
pub use trade_script::TradeScript;
pub use valuation_driver::{DriverTrade, ValuationDriver, ValuationOutcome};
