//! Exposure aggregation calculations.
//!
//! This module provides utilities for computing exposure metrics
//! used in XVA calculations:
//!
//! - Expected Exposure (EE)
//! - Expected Positive Exposure (EPE)
//! - Potential Future Exposure (PFE)
//! - Netting benefit analysis

use rayon::prelude::*;

/// Exposure calculation utilities.
///
/// Provides methods for computing standard exposure metrics
/// from simulated portfolio values.
pub struct ExposureCalculator;

impl ExposureCalculator {
    /// Computes Expected Exposure at each time point.
    ///
    /// EE(t) = E[max(V(t), 0)]
    ///
    /// # Arguments
    ///
    /// * `values` - Simulated values `[scenario_idx][time_idx]`
    ///
    /// # Returns
    ///
    /// Expected exposure at each time point.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_xva::exposure::ExposureCalculator;
    ///
    /// let values = vec![
    ///     vec![10.0, 20.0, 15.0],   // Scenario 1
    ///     vec![5.0, -10.0, 25.0],   // Scenario 2
    ///     vec![-5.0, 15.0, 10.0],   // Scenario 3
    /// ];
    ///
    /// let ee = ExposureCalculator::expected_exposure(&values);
    /// // At t=0: mean(max(10,0), max(5,0), max(-5,0)) = (10+5+0)/3 = 5
    /// ```
    pub fn expected_exposure(values: &[Vec<f64>]) -> Vec<f64> {
        if values.is_empty() {
            return Vec::new();
        }

        let n_times = values[0].len();
        let n_scenarios = values.len();

        if n_scenarios == 0 {
            return vec![0.0; n_times];
        }

        (0..n_times)
            .into_par_iter()
            .map(|t| {
                let sum: f64 = values.iter().map(|path| path[t].max(0.0)).sum();
                sum / n_scenarios as f64
            })
            .collect()
    }

    /// Computes time-weighted Expected Positive Exposure (EPE).
    ///
    /// EPE = (1/T) ∫₀ᵀ EE(t) dt
    ///
    /// Uses trapezoidal integration over the time grid.
    ///
    /// # Arguments
    ///
    /// * `ee` - Expected exposure profile
    /// * `time_grid` - Time points in years
    ///
    /// # Returns
    ///
    /// Time-averaged EPE (scalar).
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_xva::exposure::ExposureCalculator;
    ///
    /// let ee = vec![0.0, 10.0, 20.0, 15.0, 5.0];
    /// let time_grid = vec![0.0, 0.25, 0.5, 0.75, 1.0];
    ///
    /// let epe = ExposureCalculator::expected_positive_exposure(&ee, &time_grid);
    /// // EPE is the time-weighted average
    /// ```
    pub fn expected_positive_exposure(ee: &[f64], time_grid: &[f64]) -> f64 {
        if time_grid.len() < 2 || ee.len() != time_grid.len() {
            return ee.first().copied().unwrap_or(0.0);
        }

        // Trapezoidal integration
        let mut integral = 0.0;
        for i in 0..time_grid.len() - 1 {
            let dt = time_grid[i + 1] - time_grid[i];
            integral += 0.5 * (ee[i] + ee[i + 1]) * dt;
        }

        let total_time = time_grid.last().unwrap() - time_grid.first().unwrap();
        if total_time > 0.0 {
            integral / total_time
        } else {
            ee.first().copied().unwrap_or(0.0)
        }
    }

    /// Computes Potential Future Exposure at specified confidence level.
    ///
    /// PFE(t, α) = Quantile_α(max(V(t), 0))
    ///
    /// # Arguments
    ///
    /// * `values` - Simulated values `[scenario_idx][time_idx]`
    /// * `confidence` - Confidence level (e.g., 0.95 or 0.99)
    ///
    /// # Returns
    ///
    /// PFE at each time point.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_xva::exposure::ExposureCalculator;
    ///
    /// let values = vec![
    ///     vec![10.0, 20.0],
    ///     vec![5.0, 30.0],
    ///     vec![15.0, 10.0],
    ///     vec![8.0, 25.0],
    /// ];
    ///
    /// let pfe_95 = ExposureCalculator::potential_future_exposure(&values, 0.95);
    /// ```
    pub fn potential_future_exposure(values: &[Vec<f64>], confidence: f64) -> Vec<f64> {
        if values.is_empty() {
            return Vec::new();
        }

        let n_times = values[0].len();
        let n_scenarios = values.len();

        if n_scenarios == 0 {
            return vec![0.0; n_times];
        }

        // Clamp confidence to valid range
        let confidence = confidence.clamp(0.0, 1.0);
        let quantile_idx = ((n_scenarios as f64 - 1.0) * confidence).round() as usize;
        let quantile_idx = quantile_idx.min(n_scenarios - 1);

        (0..n_times)
            .into_par_iter()
            .map(|t| {
                let mut exposures: Vec<f64> = values.iter().map(|path| path[t].max(0.0)).collect();
                exposures.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                exposures[quantile_idx]
            })
            .collect()
    }

    /// Computes peak PFE across all time points.
    ///
    /// # Arguments
    ///
    /// * `pfe` - PFE profile across time
    ///
    /// # Returns
    ///
    /// Maximum PFE value.
    #[inline]
    pub fn peak_pfe(pfe: &[f64]) -> f64 {
        pfe.iter().copied().fold(0.0_f64, |max, val| max.max(val))
    }

    /// Computes gross and net exposure from trade values.
    ///
    /// Gross exposure is the sum of absolute values (no netting).
    /// Net exposure applies netting: max(sum of values, 0).
    ///
    /// # Arguments
    ///
    /// * `trade_values` - MTM values for each trade
    ///
    /// # Returns
    ///
    /// Tuple of (gross_exposure, net_exposure).
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_xva::exposure::ExposureCalculator;
    ///
    /// let trade_values = vec![10.0, -5.0, 3.0];
    /// let (gross, net) = ExposureCalculator::netting_benefit(&trade_values);
    ///
    /// // Gross = |10| + |-5| + |3| = 18
    /// // Net = max(10 - 5 + 3, 0) = 8
    /// assert_eq!(gross, 18.0);
    /// assert_eq!(net, 8.0);
    /// ```
    pub fn netting_benefit(trade_values: &[f64]) -> (f64, f64) {
        let gross: f64 = trade_values.iter().map(|v| v.abs()).sum();
        let net: f64 = trade_values.iter().sum::<f64>().max(0.0);
        (gross, net)
    }

    /// Computes the netting benefit ratio.
    ///
    /// Ratio = 1 - (net_exposure / gross_exposure)
    ///
    /// A ratio of 0 means no benefit (all same sign).
    /// A ratio approaching 1 means significant netting benefit.
    ///
    /// # Arguments
    ///
    /// * `trade_values` - MTM values for each trade
    ///
    /// # Returns
    ///
    /// Netting benefit ratio in [0, 1].
    pub fn netting_benefit_ratio(trade_values: &[f64]) -> f64 {
        let (gross, net) = Self::netting_benefit(trade_values);
        if gross > 0.0 {
            1.0 - (net / gross)
        } else {
            0.0
        }
    }

    /// Computes Effective Expected Positive Exposure (EEPE).
    ///
    /// EEPE is the time-weighted average of non-decreasing EE,
    /// used in regulatory capital calculations.
    ///
    /// # Arguments
    ///
    /// * `ee` - Expected exposure profile
    /// * `time_grid` - Time points in years
    /// * `maturity_time` - Time horizon (typically 1 year for regulatory)
    ///
    /// # Returns
    ///
    /// Effective EPE (scalar).
    pub fn effective_epe(ee: &[f64], time_grid: &[f64], maturity_time: f64) -> f64 {
        if time_grid.is_empty() || ee.is_empty() {
            return 0.0;
        }

        // Compute Effective EE (non-decreasing)
        let mut effective_ee = vec![0.0; ee.len()];
        let mut running_max = 0.0_f64;
        for (i, &val) in ee.iter().enumerate() {
            running_max = running_max.max(val);
            effective_ee[i] = running_max;
        }

        // Integrate up to maturity_time
        let mut integral = 0.0;
        let mut t_max = 0.0;

        for i in 0..time_grid.len() - 1 {
            let t0 = time_grid[i];
            let t1 = time_grid[i + 1].min(maturity_time);

            if t0 >= maturity_time {
                break;
            }

            let dt = t1 - t0;
            if dt > 0.0 {
                // Linear interpolation for effective_ee at boundaries
                integral += 0.5 * (effective_ee[i] + effective_ee[i + 1]) * dt;
                t_max = t1;
            }
        }

        if t_max > 0.0 {
            integral / t_max
        } else {
            effective_ee.first().copied().unwrap_or(0.0)
        }
    }

    /// Computes Expected Negative Exposure (ENE) at each time point.
    ///
    /// ENE(t) = E[max(-V(t), 0)] = E[min(V(t), 0).abs()]
    ///
    /// Used for DVA calculations (exposure to counterparty if we default).
    ///
    /// # Arguments
    ///
    /// * `values` - Simulated values `[scenario_idx][time_idx]`
    ///
    /// # Returns
    ///
    /// Expected negative exposure at each time point.
    pub fn expected_negative_exposure(values: &[Vec<f64>]) -> Vec<f64> {
        if values.is_empty() {
            return Vec::new();
        }

        let n_times = values[0].len();
        let n_scenarios = values.len();

        if n_scenarios == 0 {
            return vec![0.0; n_times];
        }

        (0..n_times)
            .into_par_iter()
            .map(|t| {
                let sum: f64 = values.iter().map(|path| (-path[t]).max(0.0)).sum();
                sum / n_scenarios as f64
            })
            .collect()
    }
}
