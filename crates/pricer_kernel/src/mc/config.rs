//! Monte Carlo run configuration.

use super::error::ConfigError;

/// Configuration for a Monte Carlo simulation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonteCarloConfig {
    n_paths: usize,
    n_steps: usize,
    seed: Option<u64>,
}

impl MonteCarloConfig {
    /// Starts a [`MonteCarloConfigBuilder`].
    pub fn builder() -> MonteCarloConfigBuilder {
        MonteCarloConfigBuilder::default()
    }

    /// Number of simulated paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Number of time steps per path.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Explicit seed set via the builder, if any.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Validates that path/step counts are non-zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_paths == 0 {
            return Err(ConfigError::ZeroPaths);
        }
        if self.n_steps == 0 {
            return Err(ConfigError::ZeroSteps);
        }
        Ok(())
    }
}

/// Builder for [`MonteCarloConfig`].
#[derive(Clone, Copy, Debug, Default)]
pub struct MonteCarloConfigBuilder {
    n_paths: Option<usize>,
    n_steps: Option<usize>,
    seed: Option<u64>,
}

impl MonteCarloConfigBuilder {
    /// Sets the number of simulated paths.
    pub fn n_paths(mut self, n_paths: usize) -> Self {
        self.n_paths = Some(n_paths);
        self
    }

    /// Sets the number of time steps per path.
    pub fn n_steps(mut self, n_steps: usize) -> Self {
        self.n_steps = Some(n_steps);
        self
    }

    /// Sets an explicit seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds the configuration, defaulting `n_paths` to 10,000 and
    /// `n_steps` to 1 when unset, then validating.
    pub fn build(self) -> Result<MonteCarloConfig, ConfigError> {
        let config = MonteCarloConfig {
            n_paths: self.n_paths.unwrap_or(10_000),
            n_steps: self.n_steps.unwrap_or(1),
            seed: self.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = MonteCarloConfig::builder().build().unwrap();
        assert_eq!(config.n_paths(), 10_000);
        assert_eq!(config.n_steps(), 1);
        assert!(config.seed().is_none());
    }

    #[test]
    fn builder_explicit_values() {
        let config = MonteCarloConfig::builder()
            .n_paths(5_000)
            .n_steps(252)
            .seed(7)
            .build()
            .unwrap();
        assert_eq!(config.n_paths(), 5_000);
        assert_eq!(config.n_steps(), 252);
        assert_eq!(config.seed(), Some(7));
    }

    #[test]
    fn builder_rejects_zero_paths() {
        let err = MonteCarloConfig::builder().n_paths(0).build().unwrap_err();
        assert_eq!(err, ConfigError::ZeroPaths);
    }

    #[test]
    fn builder_rejects_zero_steps() {
        let err = MonteCarloConfig::builder().n_steps(0).build().unwrap_err();
        assert_eq!(err, ConfigError::ZeroSteps);
    }
}
