//! # Pricer Risk (L4: Scenario & Bump-and-Reval Infrastructure)
//!
//! Risk-factor shift primitives and scenario execution used to drive
//! bump-and-reval analyses: parallel/twist/butterfly curve shifts, named
//! scenario bundles, Greeks-by-factor aggregation, and preset stress
//! scenarios.
//!
//! This crate is the scenario-generation collaborator referenced by
//! `pricer_xva`'s CVA spread-sensitivity step: bumping a hazard-rate
//! pillar is expressed as a [`scenarios::RiskFactorShift`] applied through
//! [`scenarios::ScenarioEngine`], with the sensitivity itself recomputed by
//! `pricer_xva::postprocess::sensitivity` calling back into
//! `pricer_xva::xva::cva::compute_cva`.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            pricer_risk (L4)              │
//! ├─────────────────────────────────────────┤
//! │  scenarios/  - RiskFactorShift, Scenario,│
//! │               ScenarioEngine, presets    │
//! │  parallel/   - Rayon batch utilities     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use pricer_risk::scenarios::{BumpScenario, RiskFactorShift, Scenario};
//! use pricer_core::traits::risk::RiskFactorType;
//!
//! let bumps = BumpScenario::new()
//!     .with_shift(RiskFactorShift::rate_parallel("USD.OIS.*", 0.0001_f64));
//! let scenario = Scenario::new("parallel_up_1bp", "parallel +1bp on USD OIS", bumps);
//!
//! assert_eq!(scenario.bumps().len(), 1);
//! assert!(scenario.bumps().has_shifts_for(RiskFactorType::InterestRate));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod parallel;
pub mod scenarios;

// Re-export commonly used types
pub use parallel::{ParallelConfig, DEFAULT_BATCH_SIZE};
pub use scenarios::{
    AggregationMethod, BucketDv01Calculator, BucketDv01Config, BucketDv01Entry, BucketDv01Error,
    BucketDv01Result, BumpScenario, CurveShiftError, CurveShiftSpec, CurveShiftType,
    CurveShifter, GreeksAggregator, KeyRateDurationEntry, KeyRateDurationResult, PortfolioGreeks,
    PresetScenario, PresetScenarioType, RiskFactorId, RiskFactorShift, Scenario, ScenarioEngine,
    ScenarioPnL, ScenarioResult, STANDARD_TENOR_LABELS, STANDARD_TENOR_POINTS,
};
