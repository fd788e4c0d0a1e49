//! Result types the post-processor accumulates stage by stage.
//!
//! These mirror `adapter_config::reports::XvaRow`'s field set field-for-
//! field (so a report writer can build an `XvaRow` from either variant with
//! no renaming), but live here rather than being bolted onto
//! [`crate::xva::result::NettingSetXva`]: several existing tests construct
//! that type via direct struct literals, so it stays frozen at its current
//! field set and this module owns the richer, post-processor-specific shape
//! instead.

use std::collections::HashMap;

use crate::portfolio::{NettingSetId, TradeId};

/// Exposure profile for one netting set, one row per cube valuation date.
#[derive(Clone, Debug, Default)]
pub struct ExposureProfile {
    /// Valuation dates, as year fractions from the reference date.
    pub dates: Vec<f64>,
    /// Expected positive exposure at each date (uncollateralised).
    pub epe: Vec<f64>,
    /// Expected negative exposure at each date (uncollateralised).
    pub ene: Vec<f64>,
    /// `EPE(t)/P(t)`, `P(t)` the default-probability-weighted discount factor.
    pub ee_b: Vec<f64>,
    /// Non-decreasing running max of `ee_b`.
    pub eee_b: Vec<f64>,
    /// Time-weighted mean of `eee_b` over the first year; drives KVA-CCR.
    pub eepe_b: f64,
    /// Potential future exposure at the configured confidence level.
    pub pfe: Vec<f64>,
    /// Expected collateral balance at each date (signed).
    pub expected_collateral: Vec<f64>,
}

/// Standalone XVA figures for one netting set (§4.6 steps 2-4).
#[derive(Clone, Debug, Default)]
pub struct NettingSetXvaResult {
    /// Netting set identifier.
    pub netting_set_id: NettingSetId,
    /// Uncollateralised exposure profile.
    pub uncollateralised: ExposureProfile,
    /// Collateralised exposure profile (identical to uncollateralised when
    /// the netting set has no CSA).
    pub collateralised: ExposureProfile,
    /// Credit valuation adjustment.
    pub cva: f64,
    /// Debit valuation adjustment.
    pub dva: f64,
    /// Funding cost adjustment.
    pub fca: f64,
    /// Funding benefit adjustment.
    pub fba: f64,
    /// Margin valuation adjustment.
    pub mva: f64,
    /// Collateral valuation adjustment.
    pub colva: f64,
    /// Collateral floor value.
    pub collateral_floor: f64,
}

impl NettingSetXvaResult {
    /// `FCA - FBA`.
    pub fn fva(&self) -> f64 {
        self.fca - self.fba
    }

    /// `CVA - DVA + FVA + MVA + COLVA + CollateralFloor`.
    pub fn total_xva(&self) -> f64 {
        self.cva - self.dva + self.fva() + self.mva + self.colva + self.collateral_floor
    }
}

/// KVA figures for one netting set, computed after the standalone XVA stage
/// (§4.6 step 4, Supplementary Feature).
#[derive(Clone, Debug, Default)]
pub struct NettingSetKvaResult {
    /// Netting set identifier.
    pub netting_set_id: NettingSetId,
    /// Counterparty credit risk capital valuation adjustment.
    pub kva_ccr: f64,
    /// CVA risk capital valuation adjustment.
    pub kva_cva: f64,
}

/// Trade-level allocation of a netting set's standalone XVA/KVA (§4.6 step 5).
#[derive(Clone, Debug, Default)]
pub struct TradeXvaResult {
    /// Trade identifier.
    pub trade_id: TradeId,
    /// Netting set this trade belongs to.
    pub netting_set_id: NettingSetId,
    /// CVA allocated to this trade.
    pub allocated_cva: f64,
    /// DVA allocated to this trade.
    pub allocated_dva: f64,
    /// KVA-CCR allocated to this trade.
    pub allocated_kva_ccr: f64,
    /// KVA-CVA allocated to this trade.
    pub allocated_kva_cva: f64,
}

/// All results the post-processor has accumulated, keyed for lookup by the
/// accessors in [`super::PostProcess`].
#[derive(Clone, Debug, Default)]
pub struct PostProcessResults {
    /// Standalone XVA by netting set, populated by `update_standalone_xva`.
    pub netting_set_xva: HashMap<NettingSetId, NettingSetXvaResult>,
    /// KVA by netting set, populated by `update_netting_set_kva`.
    pub netting_set_kva: HashMap<NettingSetId, NettingSetKvaResult>,
    /// Allocated XVA/KVA by trade, populated by `update_allocated_xva`.
    pub trade_xva: HashMap<TradeId, TradeXvaResult>,
}
