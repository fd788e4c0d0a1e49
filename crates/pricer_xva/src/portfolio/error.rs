//! Portfolio construction and validation errors.

use thiserror::Error;

/// Errors that can occur while building or validating a portfolio.
#[derive(Debug, Error)]
pub enum PortfolioError {
    /// A trade ID was added more than once.
    #[error("Duplicate trade id: {0}")]
    DuplicateTrade(String),

    /// A counterparty ID was added more than once.
    #[error("Duplicate counterparty id: {0}")]
    DuplicateCounterparty(String),

    /// A netting set ID was added more than once.
    #[error("Duplicate netting set id: {0}")]
    DuplicateNettingSet(String),

    /// A trade references a counterparty that was never added.
    #[error("Trade {0} references unknown counterparty {1}")]
    UnknownCounterpartyReference(String, String),

    /// A trade references a netting set that was never added.
    #[error("Trade {0} references unknown netting set {1}")]
    UnknownNettingSetReference(String, String),

    /// A netting set references a counterparty that was never added.
    #[error("Netting set {0} references unknown counterparty {1}")]
    NettingSetUnknownCounterparty(String, String),

    /// Credit parameters failed validation.
    #[error("Invalid credit parameters: {0}")]
    InvalidCreditParams(String),

    /// Collateral agreement terms failed validation.
    #[error("Invalid collateral agreement: {0}")]
    InvalidCollateralAgreement(String),
}
