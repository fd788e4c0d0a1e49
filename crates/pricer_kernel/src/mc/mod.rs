//! Monte Carlo simulation engine.
//!
//! Path generation ([`paths`]), smooth payoff evaluation ([`payoff`]), and
//! the orchestrating [`pricer::MonteCarloPricer`] that drives both against a
//! reusable [`workspace::PathWorkspace`].

mod config;
mod error;
mod paths;
mod payoff;
mod pricer;
mod workspace;

pub use config::{MonteCarloConfig, MonteCarloConfigBuilder};
pub use error::ConfigError;
pub use paths::{generate_gbm_paths, generate_gbm_paths_tangent_spot, GbmParams};
pub use payoff::{
    asian_arithmetic_call_smooth, asian_arithmetic_put_smooth, compute_payoff, compute_payoffs,
    european_call_smooth, european_put_smooth, soft_plus, soft_plus_derivative, PayoffParams,
    PayoffType,
};
pub use pricer::{Greek, MonteCarloPricer, PricingResult};
pub use workspace::PathWorkspace;
