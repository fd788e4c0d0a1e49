//! Generic model calibrator using Levenberg-Marquardt solver.
//!
//! This module provides a generic calibrator that wraps the LM solver
//! and integrates with the Calibrator trait from pricer_core.

use pricer_core::math::solvers::{LMConfig, LMResult, LevenbergMarquardtSolver};
use pricer_core::traits::calibration::{
    CalibrationConfig, CalibrationResult, Calibrator, Constraint, ParameterBounds,
};
use pricer_core::types::CalibrationError;

/// Configuration for the model calibrator.
#[derive(Debug, Clone)]
pub struct ModelCalibratorConfig {
    /// LM solver configuration.
    pub lm_config: LMConfig,
    /// Parameter bounds.
    pub bounds: Vec<ParameterBounds>,
    /// Whether to apply bounds constraints.
    pub enforce_bounds: bool,
}

impl Default for ModelCalibratorConfig {
    fn default() -> Self {
        Self {
            lm_config: LMConfig::default(),
            bounds: Vec::new(),
            enforce_bounds: true,
        }
    }
}

impl ModelCalibratorConfig {
    /// Create a new configuration.
    pub fn new(lm_config: LMConfig) -> Self {
        Self {
            lm_config,
            bounds: Vec::new(),
            enforce_bounds: true,
        }
    }

    /// Set parameter bounds.
    pub fn with_bounds(mut self, bounds: Vec<ParameterBounds>) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set whether to enforce bounds.
    pub fn with_enforce_bounds(mut self, enforce: bool) -> Self {
        self.enforce_bounds = enforce;
        self
    }

    /// Create from CalibrationConfig.
    pub fn from_calibration_config(config: &CalibrationConfig) -> Self {
        Self {
            lm_config: LMConfig {
                tolerance: config.tolerance,
                max_iterations: config.max_iterations,
                param_tolerance: config.param_tolerance,
                ..LMConfig::default()
            },
            bounds: Vec::new(),
            enforce_bounds: true,
        }
    }
}

/// Generic model calibrator using Levenberg-Marquardt.
///
/// This calibrator wraps the LM solver and provides a convenient
/// interface for calibrating model parameters to market data.
///
/// # Example
///
/// ```
/// use pricer_models::calibration::{ModelCalibrator, ModelCalibratorConfig};
/// use pricer_core::math::solvers::LMConfig;
///
/// let config = ModelCalibratorConfig::new(LMConfig::default());
/// let calibrator = ModelCalibrator::new(config);
///
/// // Define residual function: model(params) - market_data
/// let residuals = |params: &[f64]| -> Vec<f64> {
///     vec![params[0] - 1.0, params[1] - 2.0]
/// };
///
/// let result = calibrator.calibrate_with_residuals(residuals, vec![0.5, 0.5]);
/// assert!(result.converged);
/// ```
#[derive(Debug, Clone)]
pub struct ModelCalibrator {
    config: ModelCalibratorConfig,
}

impl ModelCalibrator {
    /// Create a new model calibrator.
    pub fn new(config: ModelCalibratorConfig) -> Self {
        Self { config }
    }

    /// Create with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: ModelCalibratorConfig::default(),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ModelCalibratorConfig {
        &self.config
    }

    /// Calibrate using a residual function.
    ///
    /// The residual function should return a vector of residuals
    /// (model - market) for each observation.
    ///
    /// # Arguments
    ///
    /// * `residuals` - Function computing residuals from parameters
    /// * `initial_params` - Starting parameter values
    ///
    /// # Returns
    ///
    /// Calibration result with final parameters.
    pub fn calibrate_with_residuals<F>(
        &self,
        residuals: F,
        initial_params: Vec<f64>,
    ) -> CalibrationResult<Vec<f64>>
    where
        F: Fn(&[f64]) -> Vec<f64>,
    {
        // Apply bounds to initial params if needed
        let initial = if self.config.enforce_bounds && !self.config.bounds.is_empty() {
            self.apply_bounds(&initial_params)
        } else {
            initial_params
        };

        // Create constrained residual function
        // Always use bounds-aware version (handles empty bounds correctly)
        let bounds = self.config.bounds.clone();
        let enforce = self.config.enforce_bounds && !bounds.is_empty();

        let constrained_residuals = move |params: &[f64]| {
            if enforce {
                let clamped: Vec<f64> = params
                    .iter()
                    .enumerate()
                    .map(|(i, &p)| bounds.get(i).map_or(p, |b| b.clamp(p)))
                    .collect();
                residuals(&clamped)
            } else {
                residuals(params)
            }
        };

        // Run LM solver
        let solver = LevenbergMarquardtSolver::new(self.config.lm_config);
        match solver.solve(constrained_residuals, initial) {
            Ok(lm_result) => {
                let mut result = self.convert_lm_result(lm_result);
                // Apply bounds to final result if enabled
                if enforce {
                    result.params = self.apply_bounds(&result.params);
                }
                result
            }
            Err(e) => {
                let calib_err: CalibrationError = e.into();
                CalibrationResult::not_converged(
                    Vec::new(),
                    calib_err.iterations,
                    calib_err.residual_ss,
                    format!("{}", calib_err),
                )
            }
        }
    }

    /// Calibrate and return CalibrationError on failure.
    pub fn calibrate_or_error<F>(
        &self,
        residuals: F,
        initial_params: Vec<f64>,
    ) -> Result<CalibrationResult<Vec<f64>>, CalibrationError>
    where
        F: Fn(&[f64]) -> Vec<f64>,
    {
        let result = self.calibrate_with_residuals(residuals, initial_params);
        if result.converged {
            Ok(result)
        } else {
            Err(CalibrationError::not_converged(
                result.iterations,
                result.residual_ss,
            )
            .with_parameters(result.params.clone())
            .with_message(result.message.unwrap_or_default()))
        }
    }

    /// Apply bounds to parameters.
    fn apply_bounds(&self, params: &[f64]) -> Vec<f64> {
        params
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                self.config.bounds.get(i).map_or(p, |b| b.clamp(p))
            })
            .collect()
    }

    /// Convert LM result to CalibrationResult.
    fn convert_lm_result(&self, lm_result: LMResult) -> CalibrationResult<Vec<f64>> {
        CalibrationResult::with_details(
            lm_result.params,
            lm_result.converged,
            lm_result.iterations,
            lm_result.residual_ss,
            Vec::new(), // LM doesn't return individual residuals
        )
    }
}

/// Implement Calibrator trait for a specific market data type.
///
/// This is a helper struct that wraps ModelCalibrator for use with
/// the Calibrator trait.
pub struct GenericCalibrator<F, M> {
    calibrator: ModelCalibrator,
    residual_fn: F,
    constraints: Vec<Constraint>,
    _phantom: std::marker::PhantomData<M>,
}

impl<F, M> GenericCalibrator<F, M>
where
    F: Fn(&[f64], &M) -> Vec<f64>,
{
    /// Create a new generic calibrator.
    pub fn new(config: ModelCalibratorConfig, residual_fn: F) -> Self {
        Self {
            calibrator: ModelCalibrator::new(config),
            residual_fn,
            constraints: Vec::new(),
            _phantom: std::marker::PhantomData,
        }
    }

    /// Add constraints.
    pub fn with_constraints(mut self, constraints: Vec<Constraint>) -> Self {
        self.constraints = constraints;
        self
    }
}

impl<F, M> Calibrator for GenericCalibrator<F, M>
where
    F: Fn(&[f64], &M) -> Vec<f64>,
{
    type MarketData = M;
    type ModelParams = Vec<f64>;

    fn calibrate(
        &self,
        market_data: &Self::MarketData,
        initial_params: Self::ModelParams,
        _config: &CalibrationConfig,
    ) -> CalibrationResult<Self::ModelParams> {
        let residuals = |params: &[f64]| (self.residual_fn)(params, market_data);
        self.calibrator.calibrate_with_residuals(residuals, initial_params)
    }

    fn objective_function(
        &self,
        params: &Self::ModelParams,
        market_data: &Self::MarketData,
    ) -> Vec<f64> {
        (self.residual_fn)(params, market_data)
    }

    fn constraints(&self) -> Vec<Constraint> {
        self.constraints.clone()
    }
}
