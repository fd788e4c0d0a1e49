//! Post-trade aggregation pipeline: netting, collateralisation, exposure
//! profiles, XVA, KVA, CVA spread sensitivities, and trade-level allocation
//! (§4.6) — the consumer of the Valuation Driver's [`crate::cube::NpvCube`]
//! output and the producer of everything `adapter_config::reports` writes.
//!
//! [`PostProcess`] is a small state machine mirroring the external
//! interface's staged evaluation order: `updateStandAloneXVA` must run
//! before `updateNettingSetKVA`, which must run before `updateAllocatedXVA`.
//! Querying a stage's results before it has run returns
//! [`crate::error::AggregationError::StageNotRun`] rather than a default or
//! partially-populated value.

pub mod allocation;
pub mod kva;
pub mod netting;
pub mod result;
pub mod sensitivity;
pub mod xva;

pub use allocation::{allocate_xva, allocation_weights, AllocationMethod, TradeAllocationInput};
pub use kva::{compute_kva_ccr, compute_kva_cva, KvaParams};
pub use result::{
    ExposureProfile, NettingSetKvaResult, NettingSetXvaResult, PostProcessResults, TradeXvaResult,
};
pub use sensitivity::{cva_spread_sensitivities, CvaBucketSensitivity, HazardCurve};
pub use xva::XvaAssumptions;

use std::collections::HashMap;

use crate::cube::NpvCube;
use crate::error::AggregationError;
use crate::portfolio::{NettingSetId, Portfolio, TradeId};

/// The post-trade aggregation pipeline for one simulated portfolio.
///
/// Borrows its [`Portfolio`] and [`NpvCube`] rather than owning them: the
/// cube in particular is large (trades × dates × samples × depth) and
/// typically produced once by the Valuation Driver and shared across
/// several post-processing runs (e.g. re-allocating under a different
/// [`AllocationMethod`] without re-running the netting/exposure stages).
pub struct PostProcess<'a> {
    portfolio: &'a Portfolio,
    cube: &'a NpvCube,
    results: PostProcessResults,
    standalone_run: bool,
    kva_run: bool,
    allocated_run: bool,
}

impl<'a> PostProcess<'a> {
    /// Constructs a post-processor over `portfolio`'s netting sets and
    /// `cube`'s simulated paths. No stage has run yet.
    pub fn new(portfolio: &'a Portfolio, cube: &'a NpvCube) -> Self {
        Self {
            portfolio,
            cube,
            results: PostProcessResults::default(),
            standalone_run: false,
            kva_run: false,
            allocated_run: false,
        }
    }

    /// Runs the netting, collateralisation, exposure-profile, and
    /// standalone-XVA stages for every netting set in the portfolio.
    ///
    /// `assumptions_by_netting_set` must have one entry per netting set
    /// returned by [`Portfolio::netting_sets`]; a missing entry is reported
    /// as [`AggregationError::UnknownNettingSet`].
    pub fn update_standalone_xva(
        &mut self,
        assumptions_by_netting_set: &HashMap<NettingSetId, XvaAssumptions<'_>>,
    ) -> Result<(), AggregationError> {
        for netting_set in self.portfolio.netting_sets() {
            let assumptions = assumptions_by_netting_set
                .get(netting_set.id())
                .ok_or_else(|| AggregationError::UnknownNettingSet(netting_set.id().to_string()))?;

            let trade_idx = netting::trade_indices(self.cube, netting_set.trade_ids())?;
            let paths = netting::net_exposure_paths(self.cube, &trade_idx)?;
            let dates = self.cube.dates();

            let result = xva::compute_netting_set_xva(
                netting_set.id().clone(),
                dates,
                &paths,
                netting_set.collateral(),
                assumptions,
            );
            self.results.netting_set_xva.insert(netting_set.id().clone(), result);
        }
        self.standalone_run = true;
        Ok(())
    }

    /// Runs the KVA-CCR/KVA-CVA stage for every netting set already priced
    /// by [`Self::update_standalone_xva`]. `assumptions_by_netting_set` is
    /// reused only for its discount factors; netting sets missing an entry
    /// in `kva_params_by_netting_set` fall back to [`KvaParams::standard_defaults`].
    pub fn update_netting_set_kva(
        &mut self,
        assumptions_by_netting_set: &HashMap<NettingSetId, XvaAssumptions<'_>>,
        kva_params_by_netting_set: &HashMap<NettingSetId, KvaParams>,
    ) -> Result<(), AggregationError> {
        if !self.standalone_run {
            return Err(AggregationError::StageNotRun("update_standalone_xva"));
        }

        let netting_set_xva = self.results.netting_set_xva.clone();
        for (ns_id, xva_result) in netting_set_xva {
            let assumptions = assumptions_by_netting_set
                .get(&ns_id)
                .ok_or_else(|| AggregationError::UnknownNettingSet(ns_id.to_string()))?;
            let params = kva_params_by_netting_set
                .get(&ns_id)
                .copied()
                .unwrap_or_else(KvaParams::standard_defaults);

            let dates = &xva_result.collateralised.dates;
            let kva_ccr = kva::compute_kva_ccr(
                &xva_result.collateralised.eee_b,
                dates,
                assumptions.discount_factors,
                &params,
            );
            let kva_cva = kva::compute_kva_cva(
                &xva_result.collateralised.epe,
                dates,
                assumptions.discount_factors,
                &params,
            );

            self.results.netting_set_kva.insert(
                ns_id.clone(),
                NettingSetKvaResult {
                    netting_set_id: ns_id,
                    kva_ccr,
                    kva_cva,
                },
            );
        }
        self.kva_run = true;
        Ok(())
    }

    /// Allocates every netting set's standalone CVA/DVA (and KVA, when the
    /// KVA stage has run) down to its constituent trades under `method`.
    pub fn update_allocated_xva(&mut self, method: AllocationMethod) -> Result<(), AggregationError> {
        if !self.standalone_run {
            return Err(AggregationError::StageNotRun("update_standalone_xva"));
        }

        for netting_set in self.portfolio.netting_sets() {
            let ns_id = netting_set.id().clone();
            let xva_result = self
                .results
                .netting_set_xva
                .get(&ns_id)
                .ok_or_else(|| AggregationError::UnknownNettingSet(ns_id.to_string()))?;
            let kva_result = self.results.netting_set_kva.get(&ns_id).cloned();

            let trade_idx = netting::trade_indices(self.cube, netting_set.trade_ids())?;
            let netting_paths = netting::net_exposure_paths(self.cube, &trade_idx)?;

            let mut inputs = Vec::with_capacity(trade_idx.len());
            for (&idx, trade_id) in trade_idx.iter().zip(netting_set.trade_ids().iter()) {
                let paths = netting::trade_exposure_paths(self.cube, idx)?;
                let fair_value =
                    paths.iter().map(|p| p[0]).sum::<f64>() / paths.len().max(1) as f64;
                inputs.push(TradeAllocationInput {
                    trade_id: trade_id.clone(),
                    fair_value,
                    standalone_xva: 0.0,
                    paths,
                });
            }

            let weights = allocation::allocation_weights(method, &inputs, &netting_paths)?;
            let allocated_xva = allocation::allocate_xva(xva_result.cva, xva_result.dva, &weights);

            for (trade_id, (allocated_cva, allocated_dva)) in allocated_xva {
                let w = weights.get(&trade_id).copied().unwrap_or(0.0);
                let (kva_ccr, kva_cva) = kva_result
                    .as_ref()
                    .map(|k| (k.kva_ccr, k.kva_cva))
                    .unwrap_or((0.0, 0.0));
                self.results.trade_xva.insert(
                    trade_id.clone(),
                    TradeXvaResult {
                        trade_id,
                        netting_set_id: ns_id.clone(),
                        allocated_cva,
                        allocated_dva,
                        allocated_kva_ccr: kva_ccr * w,
                        allocated_kva_cva: kva_cva * w,
                    },
                );
            }
        }
        self.allocated_run = true;
        Ok(())
    }

    /// The standalone XVA result for `netting_set_id`.
    pub fn netting_set_xva(&self, netting_set_id: &NettingSetId) -> Result<&NettingSetXvaResult, AggregationError> {
        if !self.standalone_run {
            return Err(AggregationError::StageNotRun("update_standalone_xva"));
        }
        self.results
            .netting_set_xva
            .get(netting_set_id)
            .ok_or_else(|| AggregationError::UnknownNettingSet(netting_set_id.to_string()))
    }

    /// The KVA result for `netting_set_id`.
    pub fn netting_set_kva(&self, netting_set_id: &NettingSetId) -> Result<&NettingSetKvaResult, AggregationError> {
        if !self.kva_run {
            return Err(AggregationError::StageNotRun("update_netting_set_kva"));
        }
        self.results
            .netting_set_kva
            .get(netting_set_id)
            .ok_or_else(|| AggregationError::UnknownNettingSet(netting_set_id.to_string()))
    }

    /// The allocated XVA result for `trade_id`.
    pub fn trade_xva(&self, trade_id: &TradeId) -> Result<&TradeXvaResult, AggregationError> {
        if !self.allocated_run {
            return Err(AggregationError::StageNotRun("update_allocated_xva"));
        }
        self.results
            .trade_xva
            .get(trade_id)
            .ok_or_else(|| AggregationError::UnknownTrade(trade_id.to_string()))
    }

    /// Portfolio-level CVA: the sum of every netting set's standalone CVA.
    pub fn portfolio_cva(&self) -> Result<f64, AggregationError> {
        if !self.standalone_run {
            return Err(AggregationError::StageNotRun("update_standalone_xva"));
        }
        Ok(self.results.netting_set_xva.values().map(|r| r.cva).sum())
    }

    /// Portfolio-level DVA: the sum of every netting set's standalone DVA.
    pub fn portfolio_dva(&self) -> Result<f64, AggregationError> {
        if !self.standalone_run {
            return Err(AggregationError::StageNotRun("update_standalone_xva"));
        }
        Ok(self.results.netting_set_xva.values().map(|r| r.dva).sum())
    }
}
