//! Vectorized numeric lanes across Monte-Carlo samples.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use super::filter::Filter;

#[derive(Clone, Debug, PartialEq)]
enum Repr {
    Deterministic(f64),
    Lanes(Vec<f64>),
}

/// A sequence of `size` real-valued lanes with an optimized deterministic
/// representation: when every lane holds the same value, arithmetic is O(1)
/// and the variable is stored in compact form. The first write that makes a
/// lane differ from the rest expands the representation.
///
/// Carries an optional time tag used by the pricing model to position the
/// variable in its stochastic calendar; numeric assignment resets the tag
/// (see `Context::assign`).
#[derive(Clone, Debug)]
pub struct RandomVariable {
    size: usize,
    repr: Repr,
    tag: Option<f64>,
}

impl RandomVariable {
    /// Construct a deterministic variable: every lane equals `value`.
    pub fn deterministic(size: usize, value: f64) -> Self {
        Self {
            size,
            repr: Repr::Deterministic(value),
            tag: None,
        }
    }

    /// Construct from an explicit per-lane vector.
    ///
    /// `update_deterministic` is run immediately so a uniform vector still
    /// collapses to the compact form.
    pub fn from_lanes(lanes: Vec<f64>) -> Self {
        let mut rv = Self {
            size: lanes.len(),
            repr: Repr::Lanes(lanes),
            tag: None,
        };
        rv.update_deterministic();
        rv
    }

    /// Number of lanes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether this variable is currently stored in collapsed form.
    pub fn deterministic(&self) -> bool {
        matches!(self.repr, Repr::Deterministic(_))
    }

    /// Re-scan a general-form variable and collapse it if every lane is
    /// equal. No-op on an already-deterministic variable.
    pub fn update_deterministic(&mut self) -> bool {
        if let Repr::Lanes(lanes) = &self.repr {
            if let Some(first) = lanes.first().copied() {
                if lanes.iter().all(|&v| v == first) {
                    self.repr = Repr::Deterministic(first);
                }
            }
        }
        self.deterministic()
    }

    /// Value of lane `k`. Panics if `k >= size()` — callers (the engine)
    /// are expected to bounds-check subscripts themselves per §4.4.
    pub fn at(&self, k: usize) -> f64 {
        match &self.repr {
            Repr::Deterministic(v) => {
                assert!(k < self.size, "lane index out of range");
                *v
            }
            Repr::Lanes(lanes) => lanes[k],
        }
    }

    /// Set a single lane, demoting a deterministic variable to general form
    /// if necessary.
    pub fn set(&mut self, k: usize, value: f64) {
        if let Repr::Deterministic(v) = self.repr {
            if v == value {
                return;
            }
            self.repr = Repr::Lanes(vec![v; self.size]);
        }
        if let Repr::Lanes(lanes) = &mut self.repr {
            lanes[k] = value;
        }
    }

    /// Materialize all lanes into a `Vec<f64>`.
    pub fn to_vec(&self) -> Vec<f64> {
        match &self.repr {
            Repr::Deterministic(v) => vec![*v; self.size],
            Repr::Lanes(lanes) => lanes.clone(),
        }
    }

    /// Current time tag, if any.
    pub fn tag(&self) -> Option<f64> {
        self.tag
    }

    /// Set the time tag (used by the model when stamping a produced value).
    pub fn set_tag(&mut self, tag: Option<f64>) {
        self.tag = tag;
    }

    fn unary<F: Fn(f64) -> f64>(&self, f: F) -> Self {
        match &self.repr {
            Repr::Deterministic(v) => Self::deterministic(self.size, f(*v)),
            Repr::Lanes(lanes) => Self::from_lanes(lanes.iter().map(|&v| f(v)).collect()),
        }
    }

    fn binary<F: Fn(f64, f64) -> f64>(&self, other: &Self, f: F) -> Self {
        assert_eq!(self.size, other.size, "RandomVariable size mismatch");
        match (&self.repr, &other.repr) {
            (Repr::Deterministic(a), Repr::Deterministic(b)) => {
                Self::deterministic(self.size, f(*a, *b))
            }
            _ => {
                let lanes = (0..self.size).map(|k| f(self.at(k), other.at(k))).collect();
                Self::from_lanes(lanes)
            }
        }
    }

    /// Elementwise absolute value.
    pub fn abs(&self) -> Self {
        self.unary(f64::abs)
    }

    /// Elementwise natural exponential.
    pub fn exp(&self) -> Self {
        self.unary(f64::exp)
    }

    /// Elementwise natural logarithm.
    pub fn log(&self) -> Self {
        self.unary(f64::ln)
    }

    /// Elementwise square root.
    pub fn sqrt(&self) -> Self {
        self.unary(f64::sqrt)
    }

    /// Elementwise power by a scalar exponent.
    pub fn pow(&self, exponent: f64) -> Self {
        self.unary(|v| v.powf(exponent))
    }

    /// Elementwise standard normal CDF, via the Abramowitz-Stegun
    /// erfc approximation.
    pub fn normal_cdf(&self) -> Self {
        self.unary(norm_cdf)
    }

    /// Elementwise standard normal PDF.
    pub fn normal_pdf(&self) -> Self {
        self.unary(norm_pdf)
    }

    /// Elementwise minimum.
    pub fn min(&self, other: &Self) -> Self {
        self.binary(other, f64::min)
    }

    /// Elementwise maximum.
    pub fn max(&self, other: &Self) -> Self {
        self.binary(other, f64::max)
    }

    /// `select(mask, then, else)`: lane `k` is `then[k]` if `mask[k]` else
    /// `else[k]`.
    pub fn select(mask: &Filter, then: &Self, otherwise: &Self) -> Self {
        assert_eq!(then.size, otherwise.size, "RandomVariable size mismatch");
        assert_eq!(mask.size(), then.size, "Filter/RandomVariable size mismatch");
        if let Some(b) = mask.deterministic_value() {
            return if b { then.clone() } else { otherwise.clone() };
        }
        let lanes = (0..then.size)
            .map(|k| if mask.at(k) { then.at(k) } else { otherwise.at(k) })
            .collect();
        Self::from_lanes(lanes)
    }

    /// Elementwise comparisons producing a `Filter`.
    pub fn eq_rv(&self, other: &Self) -> Filter {
        self.compare(other, |a, b| a == b)
    }
    /// See [`RandomVariable::eq_rv`].
    pub fn ne_rv(&self, other: &Self) -> Filter {
        self.compare(other, |a, b| a != b)
    }
    /// See [`RandomVariable::eq_rv`].
    pub fn lt_rv(&self, other: &Self) -> Filter {
        self.compare(other, |a, b| a < b)
    }
    /// See [`RandomVariable::eq_rv`].
    pub fn le_rv(&self, other: &Self) -> Filter {
        self.compare(other, |a, b| a <= b)
    }
    /// See [`RandomVariable::eq_rv`].
    pub fn gt_rv(&self, other: &Self) -> Filter {
        self.compare(other, |a, b| a > b)
    }
    /// See [`RandomVariable::eq_rv`].
    pub fn ge_rv(&self, other: &Self) -> Filter {
        self.compare(other, |a, b| a >= b)
    }

    fn compare<F: Fn(f64, f64) -> bool>(&self, other: &Self, f: F) -> Filter {
        assert_eq!(self.size, other.size, "RandomVariable size mismatch");
        match (&self.repr, &other.repr) {
            (Repr::Deterministic(a), Repr::Deterministic(b)) => {
                Filter::deterministic(self.size, f(*a, *b))
            }
            _ => {
                let lanes = (0..self.size).map(|k| f(self.at(k), other.at(k))).collect();
                Filter::from_lanes(lanes)
            }
        }
    }
}

/// Standard normal CDF using the Abramowitz-Stegun erfc approximation
/// (matches `pricer_kernel::analytical::barrier::norm_cdf`).
fn norm_cdf(x: f64) -> f64 {
    if x.abs() > 8.0 {
        return if x > 0.0 { 1.0 } else { 0.0 };
    }
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let arg = -x / std::f64::consts::SQRT_2;
    let abs_arg = arg.abs();
    let t = 1.0 / (1.0 + p * abs_arg);
    let poly = a1 + t * (a2 + t * (a3 + t * (a4 + t * a5)));
    let erfc_abs = t * poly * (-abs_arg * abs_arg).exp();
    let erfc_val = if arg < 0.0 { 2.0 - erfc_abs } else { erfc_abs };
    0.5 * erfc_val
}

fn norm_pdf(x: f64) -> f64 {
    const INV_SQRT_2PI: f64 = 0.3989422804014327;
    INV_SQRT_2PI * (-0.5 * x * x).exp()
}

impl Add for &RandomVariable {
    type Output = RandomVariable;
    fn add(self, rhs: Self) -> RandomVariable {
        self.binary(rhs, |a, b| a + b)
    }
}

impl Sub for &RandomVariable {
    type Output = RandomVariable;
    fn sub(self, rhs: Self) -> RandomVariable {
        self.binary(rhs, |a, b| a - b)
    }
}

impl Mul for &RandomVariable {
    type Output = RandomVariable;
    fn mul(self, rhs: Self) -> RandomVariable {
        self.binary(rhs, |a, b| a * b)
    }
}

impl Div for &RandomVariable {
    type Output = RandomVariable;
    fn div(self, rhs: Self) -> RandomVariable {
        self.binary(rhs, |a, b| a / b)
    }
}

impl Neg for &RandomVariable {
    type Output = RandomVariable;
    fn neg(self) -> RandomVariable {
        self.unary(|v| -v)
    }
}

impl PartialEq for RandomVariable {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && (0..self.size).all(|k| self.at(k) == other.at(k))
    }
}

impl fmt::Display for RandomVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Deterministic(v) => write!(f, "det({v})×{}", self.size),
            Repr::Lanes(lanes) => write!(f, "{lanes:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn deterministic_lane_equals_at_any_index() {
        let r = RandomVariable::deterministic(5, 3.0);
        for k in 0..5 {
            assert_eq!(r.at(k), 3.0);
        }
        assert!(r.deterministic());
    }

    #[test]
    fn set_demotes_to_general_form() {
        let mut r = RandomVariable::deterministic(3, 1.0);
        r.set(1, 2.0);
        assert!(!r.deterministic());
        assert_eq!(r.at(0), 1.0);
        assert_eq!(r.at(1), 2.0);
        assert_eq!(r.at(2), 1.0);
    }

    #[test]
    fn update_deterministic_collapses_uniform_vector() {
        let mut r = RandomVariable::from_lanes(vec![2.0, 2.0, 2.0]);
        assert!(r.deterministic());
        r.set(0, 5.0);
        assert!(!r.deterministic());
        r.set(0, 2.0);
        assert!(r.update_deterministic());
    }

    #[test]
    fn arithmetic_stays_deterministic_when_both_operands_are() {
        let a = RandomVariable::deterministic(4, 2.0);
        let b = RandomVariable::deterministic(4, 3.0);
        let sum = &a + &b;
        assert!(sum.deterministic());
        assert_eq!(sum.at(2), 5.0);
    }

    #[test]
    fn arithmetic_expands_on_mixed_operands() {
        let a = RandomVariable::deterministic(3, 2.0);
        let mut b = RandomVariable::deterministic(3, 3.0);
        b.set(0, 10.0);
        let sum = &a + &b;
        assert!(!sum.deterministic());
        assert_eq!(sum.at(0), 12.0);
        assert_eq!(sum.at(1), 5.0);
    }

    #[test]
    fn select_respects_mask_lanes() {
        let mask = Filter::from_lanes(vec![true, false, true]);
        let then = RandomVariable::deterministic(3, 1.0);
        let otherwise = RandomVariable::deterministic(3, 0.0);
        let result = RandomVariable::select(&mask, &then, &otherwise);
        assert_eq!(result.at(0), 1.0);
        assert_eq!(result.at(1), 0.0);
        assert_eq!(result.at(2), 1.0);
    }

    #[test]
    fn normal_cdf_matches_known_values() {
        let r = RandomVariable::deterministic(1, 0.0);
        assert_relative_eq!(r.normal_cdf().at(0), 0.5, epsilon = 1e-6);
        let r = RandomVariable::deterministic(1, 1.959964);
        assert_relative_eq!(r.normal_cdf().at(0), 0.975, epsilon = 1e-4);
    }

    #[test]
    fn comparisons_produce_filters() {
        let a = RandomVariable::from_lanes(vec![1.0, 2.0, 3.0]);
        let b = RandomVariable::deterministic(3, 2.0);
        let lt = a.lt_rv(&b);
        assert_eq!(lt.at(0), true);
        assert_eq!(lt.at(1), false);
        assert_eq!(lt.at(2), false);
    }
}
