//! Monotonicity-preserving cubic Hermite interpolation (Fritsch-Carlson).

use super::Interpolator;
use crate::types::InterpolationError;
use num_traits::Float;

/// Cubic Hermite interpolator that preserves monotonicity of the input data.
///
/// Implements the Fritsch-Carlson method: tangents are initialised from the
/// three-point difference estimate and then clamped so that the resulting
/// Hermite spline never overshoots between two monotone data points. Unlike
/// [`CubicSplineInterpolator`](super::CubicSplineInterpolator), it will not
/// introduce spurious oscillations in monotone data (e.g. discount factors,
/// cumulative default probabilities), at the cost of only C¹ continuity.
///
/// Supports automatic differentiation through the generic `T: Float` type
/// parameter.
///
/// # Construction
///
/// Data points are automatically sorted by x-coordinate. At least 2 data
/// points are required (with exactly 2, the interpolator degenerates to a
/// straight line).
///
/// # Example
///
/// ```
/// use pricer_core::math::interpolators::{Interpolator, MonotonicInterpolator};
///
/// let xs = [0.0, 1.0, 2.0, 3.0];
/// let ys = [0.0, 1.0, 3.0, 6.0];
///
/// let interp = MonotonicInterpolator::new(&xs, &ys).unwrap();
/// let y = interp.interpolate(1.5).unwrap();
/// assert!(y > 1.0 && y < 3.0);
/// ```
#[derive(Debug, Clone)]
pub struct MonotonicInterpolator<T: Float> {
    /// Sorted x-coordinates
    xs: Vec<T>,
    /// Corresponding y-values
    ys: Vec<T>,
    /// Tangent (slope) at each data point, after monotonicity clamping
    tangents: Vec<T>,
}

impl<T: Float> MonotonicInterpolator<T> {
    /// Construct a monotone cubic Hermite interpolator from x and y data points.
    ///
    /// # Arguments
    ///
    /// * `xs` - Slice of x-coordinates
    /// * `ys` - Slice of corresponding y-values
    ///
    /// # Returns
    ///
    /// * `Ok(MonotonicInterpolator)` - Successfully constructed interpolator
    /// * `Err(InterpolationError::InsufficientData)` - Fewer than 2 data points
    /// * `Err(InterpolationError::InvalidInput)` - Mismatched array lengths
    pub fn new(xs: &[T], ys: &[T]) -> Result<Self, InterpolationError> {
        if xs.len() != ys.len() {
            return Err(InterpolationError::InvalidInput(format!(
                "xs and ys must have same length: got {} and {}",
                xs.len(),
                ys.len()
            )));
        }

        if xs.len() < 2 {
            return Err(InterpolationError::InsufficientData {
                got: xs.len(),
                need: 2,
            });
        }

        let mut pairs: Vec<(T, T)> = xs.iter().copied().zip(ys.iter().copied()).collect();
        pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        let (sorted_xs, sorted_ys): (Vec<T>, Vec<T>) = pairs.into_iter().unzip();

        let tangents = Self::compute_tangents(&sorted_xs, &sorted_ys);

        Ok(Self {
            xs: sorted_xs,
            ys: sorted_ys,
            tangents,
        })
    }

    /// Compute Fritsch-Carlson tangents, clamped to preserve monotonicity.
    fn compute_tangents(xs: &[T], ys: &[T]) -> Vec<T> {
        let n = xs.len();
        let zero = T::zero();
        let two = T::from(2.0).unwrap();
        let three = T::from(3.0).unwrap();

        // Secant slopes between consecutive points.
        let secants: Vec<T> = (0..n - 1)
            .map(|i| (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i]))
            .collect();

        if n == 2 {
            return vec![secants[0], secants[0]];
        }

        // Initial tangent estimate: average of adjacent secants at interior
        // points, one-sided secant at the endpoints.
        let mut tangents = vec![zero; n];
        tangents[0] = secants[0];
        tangents[n - 1] = secants[n - 2];
        for i in 1..n - 1 {
            tangents[i] = (secants[i - 1] + secants[i]) / two;
        }

        // Clamp tangents so the Hermite cubic on each segment stays monotone:
        // if the secant is flat (or changes sign across a knot), force the
        // tangent to zero; otherwise cap the ratio m/secant at 3.
        for i in 0..n {
            let left = if i > 0 { Some(secants[i - 1]) } else { None };
            let right = if i < n - 1 { Some(secants[i]) } else { None };

            let flat_or_sign_change = match (left, right) {
                (Some(l), Some(r)) => l * r <= zero,
                (Some(l), None) => l == zero,
                (None, Some(r)) => r == zero,
                (None, None) => false,
            };

            if flat_or_sign_change {
                tangents[i] = zero;
                continue;
            }

            for secant in [left, right].into_iter().flatten() {
                if secant == zero {
                    tangents[i] = zero;
                } else {
                    let alpha = tangents[i] / secant;
                    if alpha > three {
                        tangents[i] = three * secant;
                    } else if alpha < zero {
                        tangents[i] = zero;
                    }
                }
            }
        }

        tangents
    }

    /// Find the segment index for interpolation using binary search.
    #[inline]
    fn find_segment(&self, x: T) -> usize {
        let pos = self.xs.partition_point(|&xi| xi <= x);
        if pos == 0 {
            0
        } else if pos >= self.xs.len() {
            self.xs.len() - 2
        } else {
            pos - 1
        }
    }

    /// Returns a reference to the sorted x-coordinates.
    #[inline]
    pub fn xs(&self) -> &[T] {
        &self.xs
    }

    /// Returns a reference to the y-values (in sorted x order).
    #[inline]
    pub fn ys(&self) -> &[T] {
        &self.ys
    }

    /// Returns the number of data points.
    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Returns true if the interpolator has no data points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

impl<T: Float> Interpolator<T> for MonotonicInterpolator<T> {
    /// Interpolate value at point `x` using the monotone cubic Hermite spline.
    ///
    /// # Returns
    ///
    /// * `Ok(y)` - The interpolated value
    /// * `Err(InterpolationError::OutOfBounds)` - If `x` is outside the domain
    fn interpolate(&self, x: T) -> Result<T, InterpolationError> {
        let x_min = self.xs[0];
        let x_max = self.xs[self.xs.len() - 1];

        if x < x_min || x > x_max {
            return Err(InterpolationError::OutOfBounds {
                x: x.to_f64().unwrap_or(f64::NAN),
                min: x_min.to_f64().unwrap_or(f64::NAN),
                max: x_max.to_f64().unwrap_or(f64::NAN),
            });
        }

        let i = self.find_segment(x);
        let h = self.xs[i + 1] - self.xs[i];
        let t = (x - self.xs[i]) / h;

        let t2 = t * t;
        let t3 = t2 * t;
        let two = T::from(2.0).unwrap();
        let three = T::from(3.0).unwrap();

        // Cubic Hermite basis functions.
        let h00 = two * t3 - three * t2 + T::one();
        let h10 = t3 - two * t2 + t;
        let h01 = -two * t3 + three * t2;
        let h11 = t3 - t2;

        Ok(h00 * self.ys[i]
            + h10 * h * self.tangents[i]
            + h01 * self.ys[i + 1]
            + h11 * h * self.tangents[i + 1])
    }

    /// Return the valid interpolation domain.
    #[inline]
    fn domain(&self) -> (T, T) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }
}
