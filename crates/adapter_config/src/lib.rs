//! # Adapter Config (Input/Output adapters)
//!
//! Readers and writers for the ambient file formats described in the
//! external interfaces: the run-configuration XML, market-data and
//! historical-fixing CSV files, and the exposure/XVA CSV reports.
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                adapter_config                  │
//! ├───────────────────────────────────────────────┤
//! │  xml         - RunConfiguration (8 groups)     │
//! │  csv_loader  - market data / fixings (Quote)   │
//! │  portfolio_loader - scripted-trade portfolio   │
//! │  reports     - ExposureRow / XvaRow writers    │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! Everything downstream of parsing (curve bootstrapping, instrument
//! construction) belongs to `pricer_models`/`pricer_optimiser`; this crate
//! only turns bytes on disk into typed rows.

#![warn(missing_docs)]

pub mod csv_loader;
pub mod error;
pub mod portfolio_loader;
pub mod reports;
pub mod xml;

pub use csv_loader::{load_fixings, load_market_data, Quote};
pub use error::ConfigError;
pub use portfolio_loader::{load_portfolio, PortfolioRow};
pub use reports::{write_exposure_report, write_xva_report, ExposureRow, XvaRow};
pub use xml::{ConfigGroup, RunConfiguration};
