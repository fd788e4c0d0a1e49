//! Configuration errors for the Monte Carlo engine.

use thiserror::Error;

/// Errors raised while building or validating a [`super::config::MonteCarloConfig`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `n_paths` was zero.
    #[error("number of paths must be positive")]
    ZeroPaths,

    /// `n_steps` was zero.
    #[error("number of steps must be positive")]
    ZeroSteps,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_stable() {
        assert_eq!(ConfigError::ZeroPaths.to_string(), "number of paths must be positive");
        assert_eq!(ConfigError::ZeroSteps.to_string(), "number of steps must be positive");
    }
}
