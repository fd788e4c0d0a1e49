//! Branch-free linear interpolation, safe for automatic differentiation.

use crate::math::smoothing::smooth_indicator;
use crate::types::InterpolationError;
use num_traits::Float;

/// Linear interpolation with a differentiable segment selector.
///
/// [`LinearInterpolator`](super::LinearInterpolator) picks the active segment
/// with a hard binary search, which is a non-differentiable branch: the
/// gradient of the interpolated value with respect to `x` is discontinuous
/// exactly at the knots. `smooth_interp` instead blends every segment's
/// linear extension with a sigmoid-based weight that is near 1 inside the
/// segment and near 0 outside it, so the result — and its derivative — varies
/// smoothly even across knot boundaries. As `epsilon -> 0` it converges to
/// standard piecewise-linear interpolation.
///
/// # Arguments
///
/// * `xs` - Slice of x-coordinates (need not be pre-sorted)
/// * `ys` - Slice of corresponding y-values
/// * `x` - The point at which to interpolate
/// * `epsilon` - Smoothing width of the segment selector (recommended range:
///   1e-8 to 1e-3); smaller values track the hard piecewise-linear function
///   more closely at the cost of a sharper (still smooth) transition
///
/// # Returns
///
/// * `Ok(y)` - The interpolated value
/// * `Err(InterpolationError::OutOfBounds)` - If `x` is outside `[min(xs), max(xs)]`
/// * `Err(InterpolationError::InsufficientData)` - Fewer than 2 data points
/// * `Err(InterpolationError::InvalidInput)` - Mismatched array lengths
///
/// # Example
///
/// ```
/// use pricer_core::math::interpolators::smooth_interp;
///
/// let xs = [0.0, 1.0, 2.0];
/// let ys = [0.0, 2.0, 4.0];
///
/// let y = smooth_interp(&xs, &ys, 0.5, 1e-6).unwrap();
/// assert!((y - 1.0).abs() < 1e-4);
/// ```
pub fn smooth_interp<T: Float>(
    xs: &[T],
    ys: &[T],
    x: T,
    epsilon: T,
) -> Result<T, InterpolationError> {
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
    let (xs, ys): (Vec<T>, Vec<T>) = pairs.into_iter().unzip();

    let x_min = xs[0];
    let x_max = xs[xs.len() - 1];
    if x < x_min || x > x_max {
        return Err(InterpolationError::OutOfBounds {
            x: x.to_f64().unwrap_or(f64::NAN),
            min: x_min.to_f64().unwrap_or(f64::NAN),
            max: x_max.to_f64().unwrap_or(f64::NAN),
        });
    }

    let mut weighted_sum = T::zero();
    let mut weight_total = T::zero();

    for i in 0..xs.len() - 1 {
        let (x0, x1, y0, y1) = (xs[i], xs[i + 1], ys[i], ys[i + 1]);
        let t = (x - x0) / (x1 - x0);
        let segment_value = y0 + (y1 - y0) * t;

        // Weight is ~1 when x is to the right of x0 AND to the left of x1,
        // decaying smoothly outside [x0, x1].
        let weight = smooth_indicator(x - x0, epsilon) * smooth_indicator(x1 - x, epsilon);

        weighted_sum = weighted_sum + weight * segment_value;
        weight_total = weight_total + weight;
    }

    Ok(weighted_sum / weight_total)
}
