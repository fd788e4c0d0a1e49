//! CSV report writers for exposure profiles and XVA results.
//!
//! Column layouts follow the external interfaces verbatim: exposure reports
//! carry one row per time-grid point, `xva.csv` carries one row per trade
//! and per netting set.

use std::path::Path;

use pricer_core::types::time::Date;
use serde::Serialize;

use crate::error::ConfigError;

/// One row of an exposure profile report.
#[derive(Debug, Clone, Serialize)]
pub struct ExposureRow {
    /// Time in years from the as-of date.
    pub time: f64,
    /// Calendar date of this grid point, ISO 8601.
    pub date: String,
    /// Expected positive exposure.
    #[serde(rename = "EPE")]
    pub epe: f64,
    /// Expected negative exposure.
    #[serde(rename = "ENE")]
    pub ene: f64,
    /// Basel-style effective expected exposure.
    #[serde(rename = "EE_B")]
    pub ee_b: f64,
    /// Effective EE (non-decreasing running max of EE_B).
    #[serde(rename = "EEE_B")]
    pub eee_b: f64,
    /// Potential future exposure at the configured confidence level.
    #[serde(rename = "PFE")]
    pub pfe: f64,
    /// Expected posted/received collateral.
    #[serde(rename = "expectedCollateral")]
    pub expected_collateral: f64,
}

/// One row of `xva.csv`.
#[derive(Debug, Clone, Serialize)]
pub struct XvaRow {
    /// Trade identifier, empty for netting-set-level rows.
    #[serde(rename = "tradeId")]
    pub trade_id: String,
    /// Netting-set identifier.
    #[serde(rename = "nettingSetId")]
    pub netting_set_id: String,
    /// Credit valuation adjustment.
    #[serde(rename = "CVA")]
    pub cva: f64,
    /// Debit valuation adjustment.
    #[serde(rename = "DVA")]
    pub dva: f64,
    /// Funding benefit adjustment.
    #[serde(rename = "FBA")]
    pub fba: f64,
    /// Funding cost adjustment.
    #[serde(rename = "FCA")]
    pub fca: f64,
    /// Margin valuation adjustment.
    #[serde(rename = "MVA")]
    pub mva: f64,
    /// Collateral valuation adjustment.
    #[serde(rename = "COLVA")]
    pub colva: f64,
    /// Collateral floor value.
    #[serde(rename = "collateralFloor")]
    pub collateral_floor: f64,
    /// CVA allocated to this trade.
    #[serde(rename = "allocatedCVA")]
    pub allocated_cva: f64,
    /// DVA allocated to this trade.
    #[serde(rename = "allocatedDVA")]
    pub allocated_dva: f64,
    /// CCR capital valuation adjustment.
    #[serde(rename = "KVACCR")]
    pub kva_ccr: f64,
    /// CVA capital valuation adjustment.
    #[serde(rename = "KVACVA")]
    pub kva_cva: f64,
}

/// Write an exposure profile report to `path`.
pub fn write_exposure_report(
    path: impl AsRef<Path>,
    rows: &[ExposureRow],
) -> Result<(), ConfigError> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `xva.csv` to `path`.
pub fn write_xva_report(path: impl AsRef<Path>, rows: &[XvaRow]) -> Result<(), ConfigError> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

impl From<csv::Error> for ConfigError {
    fn from(e: csv::Error) -> Self {
        ConfigError::MalformedRow {
            row: 0,
            source: e,
        }
    }
}

/// Format a date for report output (ISO 8601).
pub fn format_date(date: Date) -> String {
    date.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_exposure_rows_with_header() {
        let mut path = std::env::temp_dir();
        path.push(format!("adapter_config_exposure_{}.csv", std::process::id()));
        let rows = vec![ExposureRow {
            time: 1.0,
            date: "2025-01-02".to_string(),
            epe: 123.4,
            ene: 0.0,
            ee_b: 130.0,
            eee_b: 130.0,
            pfe: 250.0,
            expected_collateral: 10.0,
        }];
        write_exposure_report(&path, &rows).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert!(contents.starts_with("time,date,EPE,ENE,EE_B,EEE_B,PFE,expectedCollateral"));
        assert!(contents.contains("123.4"));
    }

    #[test]
    fn writes_xva_rows_with_header() {
        let mut path = std::env::temp_dir();
        path.push(format!("adapter_config_xva_{}.csv", std::process::id()));
        let rows = vec![XvaRow {
            trade_id: "T1".to_string(),
            netting_set_id: "NS1".to_string(),
            cva: 3.0,
            dva: 1.0,
            fba: 0.0,
            fca: 0.0,
            mva: 0.0,
            colva: 0.0,
            collateral_floor: 0.0,
            allocated_cva: 2.4,
            allocated_dva: 0.8,
            kva_ccr: 0.0,
            kva_cva: 0.0,
        }];
        write_xva_report(&path, &rows).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert!(contents.contains("tradeId,nettingSetId,CVA,DVA,FBA,FCA,MVA,COLVA"));
        assert!(contents.contains("T1,NS1,3,1"));
    }
}
