//! Shared trait for 1D interpolators.

use crate::types::InterpolationError;
use num_traits::Float;

/// Common interface for one-dimensional interpolation methods.
///
/// Implementations are generic over `T: Float` so the same interpolator
/// works with both plain `f64` and AD-carrying types such as `Dual64`.
pub trait Interpolator<T: Float> {
    /// Interpolates the value at `x`.
    ///
    /// # Errors
    ///
    /// Returns `InterpolationError::OutOfBounds` if `x` lies outside `domain()`.
    fn interpolate(&self, x: T) -> Result<T, InterpolationError>;

    /// The `[x_min, x_max]` range over which `interpolate` is valid.
    fn domain(&self) -> (T, T);
}
