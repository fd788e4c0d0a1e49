//! Exposure profile and standalone XVA assembly for one netting set
//! (§4.6 steps 2-4): nets trade paths, applies collateralisation, derives
//! EPE/ENE/EEE_B/PFE, and composes the CVA/DVA/FVA/MVA/COLVA/Collateral
//! Floor figures from the free-function calculators in [`crate::xva`].

use crate::collateral::CollateralExposureHelper;
use crate::exposure::ExposureCalculator;
use crate::portfolio::{CollateralAgreement, CreditParams};
use crate::xva::{
    compute_collateral_floor, compute_colva, compute_cva, compute_dva, compute_fca, compute_fba,
    compute_mva, OwnCreditParams,
};

use super::result::{ExposureProfile, NettingSetXvaResult};

/// The credit, funding, and collateral-remuneration assumptions a netting
/// set's standalone XVA is computed under.
///
/// Optional profiles default to all-zero when not supplied, so a netting
/// set with no initial margin model or no remunerated CSA still produces a
/// complete (zero-valued) MVA/COLVA/Collateral Floor rather than requiring
/// the caller to special-case them.
pub struct XvaAssumptions<'a> {
    /// Counterparty credit parameters (hazard rate, LGD) for CVA.
    pub credit_params: &'a CreditParams,
    /// Own credit parameters (hazard rate, LGD) for DVA.
    pub own_credit: &'a OwnCreditParams,
    /// Borrowing spread for FCA.
    pub funding_spread_borrow: f64,
    /// Lending spread for FBA.
    pub funding_spread_lend: f64,
    /// Risk-free discount factors, one per cube valuation date.
    pub discount_factors: &'a [f64],
    /// PFE confidence level, e.g. `0.95`.
    pub pfe_confidence: f64,
    /// Expected initial margin profile for MVA; zero when `None`.
    pub initial_margin: Option<&'a [f64]>,
    /// Initial margin funding spread.
    pub im_funding_spread: f64,
    /// CSA remuneration rate minus OIS rate at each date, for COLVA; zero
    /// when `None`.
    pub collateral_rate_spread: Option<&'a [f64]>,
    /// OIS rate at each date, for the Collateral Floor; zero when `None`.
    pub ois_rate: Option<&'a [f64]>,
    /// CSA's contractual remuneration floor rate (often `0.0`).
    pub collateral_floor_rate: f64,
}

fn running_max(values: &[f64]) -> Vec<f64> {
    let mut result = vec![0.0; values.len()];
    let mut running = 0.0_f64;
    for (i, &v) in values.iter().enumerate() {
        running = running.max(v);
        result[i] = running;
    }
    result
}

/// Builds one netting set's exposure profile (§4.6 step 4).
///
/// `EE_B(t) = EPE(t)/P(t)`, where `P(t)` is the default-probability-weighted
/// discount factor `discount_factors[t] * credit_params.survival_prob(t)`.
/// `EEE_B` is the running max of `EE_B`, and `EEPE_B` its time-weighted mean
/// over the first year.
fn build_profile(
    dates: &[f64],
    paths: &[Vec<f64>],
    pfe_confidence: f64,
    expected_collateral: Vec<f64>,
    discount_factors: &[f64],
    credit_params: &CreditParams,
) -> ExposureProfile {
    let epe = ExposureCalculator::expected_exposure(paths);
    let ene = ExposureCalculator::expected_negative_exposure(paths);
    let ee_b: Vec<f64> = dates
        .iter()
        .enumerate()
        .map(|(i, &t)| {
            let df = discount_factors.get(i).copied().unwrap_or(1.0);
            let p_t = df * credit_params.survival_prob(t);
            if p_t > 0.0 {
                epe[i] / p_t
            } else {
                0.0
            }
        })
        .collect();
    let eee_b = running_max(&ee_b);
    let eepe_b = ExposureCalculator::effective_epe(&ee_b, dates, 1.0);
    let pfe = ExposureCalculator::potential_future_exposure(paths, pfe_confidence);

    ExposureProfile {
        dates: dates.to_vec(),
        epe,
        ene,
        ee_b,
        eee_b,
        eepe_b,
        pfe,
        expected_collateral,
    }
}

/// Applies a netting set's CSA to its uncollateralised path-wise exposure,
/// returning the collateralised path matrix (same `[sample][date]` shape).
fn collateralise_paths(
    dates: &[f64],
    paths: &[Vec<f64>],
    collateral: &CollateralAgreement,
) -> Vec<Vec<f64>> {
    let helper = CollateralExposureHelper::new(collateral);
    paths
        .iter()
        .map(|path| helper.collateralise_path(dates, path))
        .collect()
}

/// Builds the uncollateralised and (when the netting set has a CSA)
/// collateralised exposure profiles, then the standalone XVA figures, for
/// one netting set.
pub fn compute_netting_set_xva(
    netting_set_id: crate::portfolio::NettingSetId,
    dates: &[f64],
    uncollateralised_paths: &[Vec<f64>],
    collateral: Option<&CollateralAgreement>,
    assumptions: &XvaAssumptions<'_>,
) -> NettingSetXvaResult {
    let uncollateralised = build_profile(
        dates,
        uncollateralised_paths,
        assumptions.pfe_confidence,
        vec![0.0; dates.len()],
        assumptions.discount_factors,
        assumptions.credit_params,
    );

    let (collateralised, collateralised_paths) = match collateral {
        Some(csa) => {
            let paths = collateralise_paths(dates, uncollateralised_paths, csa);
            let expected_collateral: Vec<f64> = (0..dates.len())
                .map(|d| {
                    let mean_exposure: f64 = uncollateralised_paths.iter().map(|p| p[d]).sum::<f64>()
                        / uncollateralised_paths.len().max(1) as f64;
                    let mean_collateralised: f64 =
                        paths.iter().map(|p| p[d]).sum::<f64>() / paths.len().max(1) as f64;
                    mean_exposure - mean_collateralised
                })
                .collect();
            let profile = build_profile(
                dates,
                &paths,
                assumptions.pfe_confidence,
                expected_collateral,
                assumptions.discount_factors,
                assumptions.credit_params,
            );
            (profile, paths)
        }
        None => (uncollateralised.clone(), uncollateralised_paths.to_vec()),
    };
    let _ = &collateralised_paths;

    let cva = compute_cva(&collateralised.epe, dates, assumptions.credit_params);
    let dva = compute_dva(&collateralised.ene, dates, assumptions.own_credit);
    let fca = compute_fca(
        &collateralised.epe,
        dates,
        assumptions.funding_spread_borrow,
        assumptions.discount_factors,
    );
    let fba = compute_fba(
        &collateralised.ene,
        dates,
        assumptions.funding_spread_lend,
        assumptions.discount_factors,
    );

    let zero_profile = vec![0.0; dates.len()];
    let im = assumptions.initial_margin.unwrap_or(&zero_profile);
    let mva = compute_mva(im, dates, assumptions.im_funding_spread, assumptions.discount_factors);

    let rate_spread = assumptions.collateral_rate_spread.unwrap_or(&zero_profile);
    let colva = compute_colva(
        &collateralised.expected_collateral,
        dates,
        rate_spread,
        assumptions.discount_factors,
    );

    let ois_rate = assumptions.ois_rate.unwrap_or(&zero_profile);
    let collateral_floor = compute_collateral_floor(
        &collateralised.expected_collateral,
        dates,
        ois_rate,
        assumptions.collateral_floor_rate,
        assumptions.discount_factors,
    );

    NettingSetXvaResult {
        netting_set_id,
        uncollateralised,
        collateralised,
        cva,
        dva,
        fca,
        fba,
        mva,
        colva,
        collateral_floor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::{CreditParams, NettingSetId};
    use pricer_core::types::Currency;

    fn flat_df(rate: f64, times: &[f64]) -> Vec<f64> {
        times.iter().map(|&t| (-rate * t).exp()).collect()
    }

    #[test]
    fn uncollateralised_netting_set_collateralised_profile_matches() {
        let dates = vec![0.0, 0.5, 1.0];
        let paths = vec![vec![10.0, 20.0, 5.0], vec![-5.0, 15.0, 10.0]];
        let credit = CreditParams::new(0.02, 0.4).unwrap();
        let own_credit = OwnCreditParams::new(0.03, 0.4).unwrap();
        let df = flat_df(0.02, &dates);
        let assumptions = XvaAssumptions {
            credit_params: &credit,
            own_credit: &own_credit,
            funding_spread_borrow: 0.005,
            funding_spread_lend: 0.003,
            discount_factors: &df,
            pfe_confidence: 0.95,
            initial_margin: None,
            im_funding_spread: 0.0,
            collateral_rate_spread: None,
            ois_rate: None,
            collateral_floor_rate: 0.0,
        };

        let result = compute_netting_set_xva(NettingSetId::new("NS1"), &dates, &paths, None, &assumptions);
        assert_eq!(result.uncollateralised.epe, result.collateralised.epe);
        assert!(result.cva > 0.0);
        assert!(result.dva >= 0.0);
        assert_eq!(result.mva, 0.0);
        assert_eq!(result.colva, 0.0);
    }

    #[test]
    fn collateralised_epe_is_no_larger_than_uncollateralised() {
        let dates = vec![0.0, 0.5, 1.0];
        let paths = vec![vec![0.0, 300.0, 300.0], vec![0.0, 250.0, 280.0]];
        let credit = CreditParams::new(0.02, 0.4).unwrap();
        let own_credit = OwnCreditParams::new(0.03, 0.4).unwrap();
        let df = flat_df(0.02, &dates);
        let assumptions = XvaAssumptions {
            credit_params: &credit,
            own_credit: &own_credit,
            funding_spread_borrow: 0.005,
            funding_spread_lend: 0.003,
            discount_factors: &df,
            pfe_confidence: 0.95,
            initial_margin: None,
            im_funding_spread: 0.0,
            collateral_rate_spread: None,
            ois_rate: None,
            collateral_floor_rate: 0.0,
        };
        let collateral = CollateralAgreement::new(100.0, 0.0, 0.0, Currency::USD, 10.0 / 252.0).unwrap();

        let result = compute_netting_set_xva(
            NettingSetId::new("NS1"),
            &dates,
            &paths,
            Some(&collateral),
            &assumptions,
        );
        for (c, u) in result.collateralised.epe.iter().zip(result.uncollateralised.epe.iter()) {
            assert!(c <= u);
        }
        assert!(result.collateralised.expected_collateral.iter().any(|&v| v > 0.0));
    }
}
