//! Vectorized boolean lanes across Monte-Carlo samples.

use std::fmt;
use std::ops::{BitAnd, BitOr, Not};

#[derive(Clone, Debug, PartialEq)]
enum Repr {
    Deterministic(bool),
    Lanes(Vec<bool>),
}

/// A sequence of `size` boolean lanes with the same deterministic-collapse
/// optimization as `RandomVariable`. Generated by comparisons, combined by
/// logical operators, and used to mask assignments.
#[derive(Clone, Debug)]
pub struct Filter {
    size: usize,
    repr: Repr,
}

impl Filter {
    /// An all-true filter of the given size — the script engine's initial
    /// filter-stack entry.
    pub fn all_true(size: usize) -> Self {
        Self::deterministic(size, true)
    }

    /// A deterministic filter: every lane equals `value`.
    pub fn deterministic(size: usize, value: bool) -> Self {
        Self {
            size,
            repr: Repr::Deterministic(value),
        }
    }

    /// Construct from an explicit per-lane vector, collapsing to compact
    /// form when uniform.
    pub fn from_lanes(lanes: Vec<bool>) -> Self {
        let mut f = Self {
            size: lanes.len(),
            repr: Repr::Lanes(lanes),
        };
        f.update_deterministic();
        f
    }

    /// Number of lanes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether this filter is currently stored in collapsed form.
    pub fn deterministic(&self) -> bool {
        matches!(self.repr, Repr::Deterministic(_))
    }

    /// The collapsed value, if this filter is deterministic.
    pub fn deterministic_value(&self) -> Option<bool> {
        match self.repr {
            Repr::Deterministic(v) => Some(v),
            Repr::Lanes(_) => None,
        }
    }

    /// Re-scan and collapse if every lane agrees.
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

    /// Value of lane `k`.
    pub fn at(&self, k: usize) -> bool {
        match &self.repr {
            Repr::Deterministic(v) => {
                assert!(k < self.size, "lane index out of range");
                *v
            }
            Repr::Lanes(lanes) => lanes[k],
        }
    }

    /// Set a single lane, demoting to general form if necessary.
    pub fn set(&mut self, k: usize, value: bool) {
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

    /// Materialize all lanes.
    pub fn to_vec(&self) -> Vec<bool> {
        match &self.repr {
            Repr::Deterministic(v) => vec![*v; self.size],
            Repr::Lanes(lanes) => lanes.clone(),
        }
    }

    /// `true` iff every active (true) lane in `self` also holds in `other`
    /// — used by `REQUIRE` to test the implication `mask ⇒ cond`.
    pub fn implies(&self, other: &Self) -> bool {
        assert_eq!(self.size, other.size, "Filter size mismatch");
        (0..self.size).all(|k| !self.at(k) || other.at(k))
    }

    /// `true` iff every lane is `false`.
    pub fn is_all_false(&self) -> bool {
        match self.repr {
            Repr::Deterministic(v) => !v,
            Repr::Lanes(ref lanes) => lanes.iter().all(|v| !v),
        }
    }

    fn binary<F: Fn(bool, bool) -> bool>(&self, other: &Self, f: F) -> Self {
        assert_eq!(self.size, other.size, "Filter size mismatch");
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
}

impl BitAnd for &Filter {
    type Output = Filter;
    fn bitand(self, rhs: Self) -> Filter {
        self.binary(rhs, |a, b| a && b)
    }
}

impl BitOr for &Filter {
    type Output = Filter;
    fn bitor(self, rhs: Self) -> Filter {
        self.binary(rhs, |a, b| a || b)
    }
}

impl Not for &Filter {
    type Output = Filter;
    fn not(self) -> Filter {
        match &self.repr {
            Repr::Deterministic(v) => Filter::deterministic(self.size, !v),
            Repr::Lanes(lanes) => Filter::from_lanes(lanes.iter().map(|v| !v).collect()),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Deterministic(v) => write!(f, "det({v})×{}", self.size),
            Repr::Lanes(lanes) => write!(f, "{lanes:?}"),
        }
    }
}
