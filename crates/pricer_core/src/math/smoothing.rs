//! Smooth approximations for discontinuous functions.
//!
//! This module provides differentiable smoothing functions that replace
//! discontinuous operations (max, min, abs, indicator) with smooth approximations.
//! Required for Enzyme AD: hard `if` conditions are non-differentiable.
//!
//! All functions use generic type parameter `T: num_traits::Float` for f32/f64 support.

use num_traits::Float;

/// Differentiable maximum function using LogSumExp.
///
/// # Mathematical Definition
/// ```text
/// smooth_max(a, b, ε) = ε * log(exp(a/ε) + exp(b/ε))
/// ```
///
/// # Convergence
/// As ε → 0, smooth_max(a, b, ε) → max(a, b)
///
/// # Arguments
/// * `a` - First argument
/// * `b` - Second argument
/// * `epsilon` - Smoothing parameter (recommended range: 1e-8 to 1e-3)
///
/// # Returns
/// Differentiable approximation of max(a, b)
///
/// # Panics
/// Panics if epsilon <= 0
///
/// # Examples
/// ```
/// use pricer_core::math::smoothing::smooth_max;
///
/// let result = smooth_max(3.0_f64, 5.0_f64, 1e-6);
/// assert!((result - 5.0).abs() < 1e-3);
/// ```
#[inline]
pub fn smooth_max<T: Float>(a: T, b: T, epsilon: T) -> T {
    assert!(epsilon > T::zero(), "epsilon must be positive");

    // Numerically stable LogSumExp using log-sum-exp trick
    // smooth_max(a, b, ε) = m + ε * log(exp((a-m)/ε) + exp((b-m)/ε))
    // where m = max(a, b) to prevent overflow
    let m = if a > b { a } else { b };
    let exp_a = ((a - m) / epsilon).exp();
    let exp_b = ((b - m) / epsilon).exp();

    m + epsilon * (exp_a + exp_b).ln()
}

/// Differentiable minimum function as dual of smooth_max.
///
/// # Mathematical Definition
/// ```text
/// smooth_min(a, b, ε) = -smooth_max(-a, -b, ε)
/// ```
///
/// # Convergence
/// As ε → 0, smooth_min(a, b, ε) → min(a, b)
///
/// # Arguments
/// * `a` - First argument
/// * `b` - Second argument
/// * `epsilon` - Smoothing parameter (recommended range: 1e-8 to 1e-3)
///
/// # Returns
/// Differentiable approximation of min(a, b)
///
/// # Panics
/// Panics if epsilon <= 0
#[inline]
pub fn smooth_min<T: Float>(a: T, b: T, epsilon: T) -> T {
    assert!(epsilon > T::zero(), "epsilon must be positive");

    // Dual of smooth_max: smooth_min(a, b, ε) = -smooth_max(-a, -b, ε)
    -smooth_max(-a, -b, epsilon)
}

/// Differentiable Heaviside function using sigmoid.
///
/// # Mathematical Definition
/// ```text
/// smooth_indicator(x, ε) = 1 / (1 + exp(-x/ε))
/// ```
///
/// # Convergence
/// As ε → 0:
/// - x < 0 → 0
/// - x = 0 → 0.5
/// - x > 0 → 1
///
/// # Arguments
/// * `x` - Input value
/// * `epsilon` - Smoothing parameter (recommended range: 1e-8 to 1e-3)
///
/// # Returns
/// Differentiable approximation of Heaviside step function
///
/// # Panics
/// Panics if epsilon <= 0
#[inline]
pub fn smooth_indicator<T: Float>(x: T, epsilon: T) -> T {
    assert!(epsilon > T::zero(), "epsilon must be positive");

    // Sigmoid function: σ(x/ε) = 1 / (1 + exp(-x/ε))
    let one = T::one();
    one / (one + (-x / epsilon).exp())
}

/// Differentiable absolute value function using Softplus.
///
/// # Mathematical Definition
/// ```text
/// smooth_abs(x, ε) = ε * log(exp(x/ε) + exp(-x/ε))
/// ```
///
/// # Convergence
/// As ε → 0, smooth_abs(x, ε) → |x|
///
/// # Arguments
/// * `x` - Input value
/// * `epsilon` - Smoothing parameter (recommended range: 1e-8 to 1e-3)
///
/// # Returns
/// Differentiable approximation of |x|
///
/// # Panics
/// Panics if epsilon <= 0
#[inline]
pub fn smooth_abs<T: Float>(x: T, epsilon: T) -> T {
    assert!(epsilon > T::zero(), "epsilon must be positive");

    // Softplus-based: smooth_abs(x, ε) = ε * log(exp(x/ε) + exp(-x/ε))
    // Using log-sum-exp trick for numerical stability
    // smooth_abs(x, ε) = |x| + ε * log(1 + exp(-2|x|/ε))
    let abs_x = x.abs();
    let two = T::from(2.0).unwrap();
    let term = (-two * abs_x / epsilon).exp();

    abs_x + epsilon * (T::one() + term).ln()
}

/// Differentiable square root function.
///
/// # Mathematical Definition
/// ```text
/// smooth_sqrt(x, ε) = sqrt(x + ε²) - ε
/// ```
///
/// This formula provides:
/// - smooth_sqrt(0, ε) = 0 (exact at zero)
/// - smooth_sqrt(x, ε) → sqrt(x) as ε → 0 for x > 0
/// - Always non-negative for any x (even x < 0 due to ε² term)
/// - Differentiable everywhere including at x = 0
///
/// # Convergence
/// As ε → 0, smooth_sqrt(x, ε) → sqrt(x) for x >= 0
///
/// # Arguments
/// * `x` - Input value (can be slightly negative due to numerical errors)
/// * `epsilon` - Smoothing parameter (recommended range: 1e-8 to 1e-3)
///
/// # Returns
/// Differentiable approximation of sqrt(max(x, 0))
///
/// # Panics
/// Panics if epsilon <= 0
///
/// # Examples
/// ```
/// use pricer_core::math::smoothing::smooth_sqrt;
///
/// let result = smooth_sqrt(4.0_f64, 1e-6);
/// assert!((result - 2.0).abs() < 1e-4);
///
/// // Handles zero smoothly
/// let at_zero = smooth_sqrt(0.0_f64, 1e-6);
/// assert!(at_zero.abs() < 1e-10);
/// ```
#[inline]
pub fn smooth_sqrt<T: Float>(x: T, epsilon: T) -> T {
    assert!(epsilon > T::zero(), "epsilon must be positive");

    // smooth_sqrt(x, ε) = sqrt(x + ε²) - ε
    // This ensures:
    // 1. At x=0: sqrt(ε²) - ε = ε - ε = 0
    // 2. For x >> ε²: sqrt(x + ε²) ≈ sqrt(x)
    // 3. Always real-valued (x + ε² > 0 always)
    let eps_squared = epsilon * epsilon;
    let radicand = x + eps_squared;
    // Clamp to 0 to handle x < -ε² (e.g. large negative inputs)
    let safe_radicand = if radicand < T::zero() {
        T::zero()
    } else {
        radicand
    };
    safe_radicand.sqrt() - epsilon
}

/// Differentiable natural logarithm function.
///
/// # Mathematical Definition
/// ```text
/// smooth_log(x, ε) = ln(x + ε)
/// ```
///
/// This formula provides:
/// - Avoids the singularity at x = 0 by shifting the argument by ε
/// - smooth_log(x, ε) → ln(x) as ε → 0 for x > 0
/// - Returns finite values even for x ≈ 0 or x < 0
/// - Differentiable everywhere
///
/// # Convergence
/// As ε → 0, smooth_log(x, ε) → ln(x) for x > 0
///
/// # Arguments
/// * `x` - Input value (should typically be positive)
/// * `epsilon` - Smoothing parameter (recommended range: 1e-8 to 1e-3)
///
/// # Returns
/// Differentiable approximation of ln(x)
///
/// # Panics
/// Panics if epsilon <= 0
///
/// # Examples
/// ```
/// use pricer_core::math::smoothing::smooth_log;
///
/// let result = smooth_log(std::f64::consts::E, 1e-10);
/// assert!((result - 1.0).abs() < 1e-8);
///
/// // Handles near-zero smoothly
/// let near_zero = smooth_log(1e-10_f64, 1e-6);
/// assert!(near_zero.is_finite());
/// ```
#[inline]
pub fn smooth_log<T: Float>(x: T, epsilon: T) -> T {
    assert!(epsilon > T::zero(), "epsilon must be positive");

    // smooth_log(x, ε) = ln(x + ε)
    // This ensures:
    // 1. At x=0: ln(ε) which is finite (though negative for small ε)
    // 2. For x >> ε: ln(x + ε) ≈ ln(x)
    // 3. Always defined (x + ε > 0 for x >= 0)
    (x + epsilon).ln()
}

/// Differentiable power function for non-integer exponents.
///
/// # Mathematical Definition
/// ```text
/// smooth_pow(x, p, ε) = exp(p * smooth_log(smooth_abs(x, ε) + ε, ε))
/// ```
///
/// For positive x (the common case):
/// ```text
/// smooth_pow(x, p, ε) ≈ exp(p * ln(x + ε)) = (x + ε)^p
/// ```
///
/// This formula provides:
/// - Handles x near zero smoothly
/// - Works for any real exponent p (integer or fractional)
/// - Differentiable everywhere
/// - Uses smooth_abs for robustness with slightly negative x
///
/// # Convergence
/// As ε → 0, smooth_pow(x, p, ε) → x^p for x > 0
///
/// # Arguments
/// * `x` - Base value (should typically be positive)
/// * `p` - Exponent (can be any real number)
/// * `epsilon` - Smoothing parameter (recommended range: 1e-8 to 1e-3)
///
/// # Returns
/// Differentiable approximation of x^p
///
/// # Panics
/// Panics if epsilon <= 0
///
/// # Examples
/// ```
/// use pricer_core::math::smoothing::smooth_pow;
///
/// // x^2
/// let result = smooth_pow(3.0_f64, 2.0, 1e-8);
/// assert!((result - 9.0).abs() < 1e-4);
///
/// // x^0.5 (square root)
/// let sqrt_result = smooth_pow(4.0_f64, 0.5, 1e-8);
/// assert!((sqrt_result - 2.0).abs() < 1e-4);
///
/// // x^0 = 1
/// let zero_exp = smooth_pow(5.0_f64, 0.0, 1e-8);
/// assert!((zero_exp - 1.0).abs() < 1e-4);
/// ```
#[inline]
pub fn smooth_pow<T: Float>(x: T, p: T, epsilon: T) -> T {
    assert!(epsilon > T::zero(), "epsilon must be positive");

    // For numerical stability, we use:
    // smooth_pow(x, p, ε) = exp(p * ln(|x| + ε))
    //
    // This avoids issues with:
    // 1. x = 0: |0| + ε = ε > 0, so ln is defined
    // 2. x < 0: |x| + ε > 0, so ln is defined
    // 3. Large x: standard exp(p * ln(x)) = x^p
    //
    // For very small |x|: (|x| + ε)^p ≈ ε^p which is small for p > 0

    // Use smooth_abs for robustness, but for typical positive x,
    // this simplifies to x + ε (since smooth_abs(x) ≈ |x| for x away from 0)
    let abs_x = smooth_abs(x, epsilon);
    let stabilized_base = abs_x + epsilon;

    // exp(p * ln(base)) = base^p
    (p * stabilized_base.ln()).exp()
}
