//! Scripted-trade portfolio CSV loader.
//!
//! `instrument construction` is an external collaborator per the scripted
//! payoff engine's scope, but the engine still needs *something* to drive
//! through the Valuation Driver. Rather than inventing a bespoke trade-XML
//! dialect, this loader extends the workspace's existing `date,key,value`
//! CSV idiom (`csv_loader`) one column further: one row per trade, with the
//! trade's scripted payoff carried as a single quoted DSL field.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// One parsed portfolio row: the trade's netting/counterparty metadata plus
/// its scripted payoff source.
#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioRow {
    /// Trade identifier.
    #[serde(rename = "tradeId")]
    pub trade_id: String,
    /// Counterparty identifier.
    #[serde(rename = "counterpartyId")]
    pub counterparty_id: String,
    /// Netting set identifier.
    #[serde(rename = "nettingSetId")]
    pub netting_set_id: String,
    /// Settlement currency, ISO 4217 code.
    pub ccy: String,
    /// Notional amount, bound into the script as the external `Notional`.
    pub notional: f64,
    /// Counterparty hazard rate (flat, annualised).
    #[serde(rename = "hazardRate")]
    pub hazard_rate: f64,
    /// Counterparty loss given default, in `[0, 1]`.
    pub lgd: f64,
    /// The scripted payoff DSL source (§4.2 grammar), e.g.
    /// `NUMBER NPV; NPV = pay(Notional, 0, 1, "USD");`.
    pub script: String,
}

/// Load a portfolio CSV into a flat list of rows, one per trade.
pub fn load_portfolio(path: impl AsRef<Path>) -> Result<Vec<PortfolioRow>, ConfigError> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize::<PortfolioRow>().enumerate() {
        let row = result.map_err(|source| ConfigError::MalformedRow {
            row: idx + 1,
            source,
        })?;
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_a_single_trade_row() {
        let mut path = std::env::temp_dir();
        path.push(format!("adapter_config_portfolio_{}.csv", std::process::id()));
        std::fs::write(
            &path,
            "tradeId,counterpartyId,nettingSetId,ccy,notional,hazardRate,lgd,script\n\
             T1,CP1,NS1,USD,1000000,0.02,0.4,\"NUMBER NPV; NPV = pay(Notional, 0, 1, \"\"USD\"\");\"\n",
        )
        .unwrap();
        let rows = load_portfolio(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].trade_id, "T1");
        assert_eq!(rows[0].netting_set_id, "NS1");
        assert!(rows[0].script.contains("pay(Notional"));
    }

    #[test]
    fn malformed_row_reports_its_line_number() {
        let mut path = std::env::temp_dir();
        path.push(format!("adapter_config_portfolio_bad_{}.csv", std::process::id()));
        std::fs::write(
            &path,
            "tradeId,counterpartyId,nettingSetId,ccy,notional,hazardRate,lgd,script\n\
             T1,CP1,NS1,USD,not_a_number,0.02,0.4,x\n",
        )
        .unwrap();
        let err = load_portfolio(&path).unwrap_err();
        let _ = std::fs::remove_file(&path);
        assert!(matches!(err, ConfigError::MalformedRow { row: 1, .. }));
    }
}
