//! # Pricer Kernel (L3: Monte Carlo engine)
//!
//! Path generation, payoff evaluation, and Greeks infrastructure underneath
//! the scripted-payoff valuation driver.
//!
//! This crate provides:
//! - GBM path generation and a reusable per-thread [`mc::PathWorkspace`]
//! - Smooth (AD-friendly) vanilla/Asian payoff evaluation and a
//!   [`mc::MonteCarloPricer`] that drives both
//! - [`rng::PricerRng`], a reproducible RNG wrapper for path generation
//! - [`greeks`] configuration for bump-and-revalue / forward-AD sensitivity
//!   calculation modes
//! - [`analytical`] closed-form references (geometric Asian, barrier
//!   options) used to cross-check Monte Carlo pricing accuracy

#![warn(missing_docs)]

pub mod analytical;
pub mod greeks;
pub mod mc;
pub mod rng;
