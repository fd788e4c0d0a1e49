//! Typed expression tree for the payoff DSL.
//!
//! The AST is a plain tree (no cycles); each node carries a source location
//! for diagnostics. Variable-resolution caches that the spec describes as a
//! "direct pointer into Context" are represented here as a `Cell<Option<VarKind>>`
//! — a safe-Rust stand-in that still avoids re-deriving scalar-vs-array
//! classification on every evaluation, and is cleared by [`Node::reset_caches`]
//! before re-evaluation on a fresh `Context`.

pub mod parser;

use std::cell::Cell;
use std::fmt;

pub use parser::Parser;

/// A 1-based line/column source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceLoc {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
}

impl SourceLoc {
    /// Construct a new location.
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Whether a resolved identifier names a scalar or an array — the cached
/// half of variable resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    /// A scalar (`NUMBER x`).
    Scalar,
    /// An array element (`NUMBER x[n]`).
    Array,
}

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

/// Comparison operators, producing a `Filter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

/// `DATEINDEX` comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateIndexOp {
    /// First element equal to the event variable.
    Eq,
    /// First element greater-than-or-equal to the event variable.
    Geq,
    /// First element strictly greater than the event variable.
    Gt,
}

/// An assignment target: a scalar name, or an array element `name[index]`.
#[derive(Debug, Clone)]
pub enum AssignTarget {
    /// `v = rhs`
    Scalar(String),
    /// `v[e] = rhs`
    Element(String, Box<Node>),
}

/// The optional compounding/averaging block of `fwdComp`/`fwdAvg`.
#[derive(Debug, Clone)]
pub struct SpreadBlock {
    /// Additive spread.
    pub spread: Box<Node>,
    /// Multiplicative gearing.
    pub gearing: Box<Node>,
}

/// The optional lookback/cutoff block of `fwdComp`/`fwdAvg`.
#[derive(Debug, Clone)]
pub struct LookbackBlock {
    /// Lookback period (days).
    pub lookback: Box<Node>,
    /// Rate cutoff (days).
    pub rate_cutoff: Box<Node>,
    /// Fixing days.
    pub fixing_days: Box<Node>,
    /// Whether the spread is included pre- or post-compounding (encoded ±1).
    pub include_spread: Box<Node>,
}

/// The optional cap/floor block of `fwdComp`/`fwdAvg`.
#[derive(Debug, Clone)]
pub struct CapFloorBlock {
    /// Cap level.
    pub cap: Box<Node>,
    /// Floor level.
    pub floor: Box<Node>,
    /// Naked option flag (encoded ±1).
    pub naked_option: Box<Node>,
    /// Local cap/floor flag (encoded ±1).
    pub local_cap_floor: Box<Node>,
}

/// A node in the payoff AST.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// A numeric literal.
    Number(f64),
    /// A string literal — a currency/index/day-counter/cashflow-type name
    /// constant, valid only where the model-aware primitives expect one.
    StringLit(String),
    /// A variable reference (scalar or array element, resolved via cache).
    Ident(String),
    /// `name[index]`
    Subscript(String, Box<Node>),
    /// `lhs op rhs`
    Binary(BinOp, Box<Node>, Box<Node>),
    /// `-operand`
    Negate(Box<Node>),
    /// `lhs op rhs` producing a `Filter`.
    Compare(CmpOp, Box<Node>, Box<Node>),
    /// `lhs AND rhs` (short-circuit).
    And(Box<Node>, Box<Node>),
    /// `lhs OR rhs` (short-circuit).
    Or(Box<Node>, Box<Node>),
    /// `NOT operand`
    NotOp(Box<Node>),
    /// `v = rhs` or `v[e] = rhs`
    Assign(AssignTarget, Box<Node>),
    /// `NUMBER v` or `NUMBER v[n]`
    Declare(String, Option<Box<Node>>),
    /// `{ s1; s2; ... }`
    Sequence(Vec<Node>),
    /// `IF c THEN t [ELSE e]`
    If(Box<Node>, Box<Node>, Option<Box<Node>>),
    /// `FOR name = a TO b STEP s DO body`
    For {
        /// Loop variable name.
        var: String,
        /// Inclusive start.
        from: Box<Node>,
        /// Inclusive end.
        to: Box<Node>,
        /// Step (non-zero).
        step: Box<Node>,
        /// Loop body.
        body: Box<Node>,
    },
    /// `REQUIRE cond`
    Require(Box<Node>),
    /// `SIZE(arr)`
    Size(String),
    /// `DATEINDEX(eventVar, arrayName, op)`
    DateIndex(Box<Node>, String, DateIndexOp),
    /// `SORT(x [,y] [,p])`
    Sort(String, Option<String>, Option<String>),
    /// `PERMUTE(x [,y] [,p])`
    Permute(String, Option<String>, Option<String>),
    /// `black(cp, obsDate, expiryDate, strike, forward, vol)`
    Black {
        /// Put/call flag (+1 call, -1 put).
        cp: Box<Node>,
        /// Observation date.
        obs: Box<Node>,
        /// Option expiry date.
        expiry: Box<Node>,
        /// Strike.
        strike: Box<Node>,
        /// Forward.
        forward: Box<Node>,
        /// Volatility.
        vol: Box<Node>,
    },
    /// `pay(amount, obsDate, payDate, payCcy)`
    Pay {
        /// Payoff amount.
        amount: Box<Node>,
        /// Observation date.
        obs: Box<Node>,
        /// Payment date.
        pay: Box<Node>,
        /// Payment currency.
        ccy: Box<Node>,
    },
    /// `logpay(amount, obsDate, payDate, payCcy, legNo?, cashflowTypeName?, slot?)`
    LogPay {
        /// Payoff amount (undiscounted, as recorded in the PayLog).
        amount: Box<Node>,
        /// Observation date.
        obs: Box<Node>,
        /// Payment date.
        pay: Box<Node>,
        /// Payment currency.
        ccy: Box<Node>,
        /// Optional leg number.
        leg_no: Option<Box<Node>>,
        /// Optional cashflow type name.
        cashflow_type: Option<Box<Node>>,
        /// Optional cube depth slot.
        slot: Option<Box<Node>>,
    },
    /// `npv(amount, obsDate, regressionFilter?, addReg1?, addReg2?)`
    Npv {
        /// Amount to condition-expect.
        amount: Box<Node>,
        /// Observation date.
        obs: Box<Node>,
        /// Optional regression filter.
        regression_filter: Option<Box<Node>>,
        /// Optional first extra regressor.
        add_regressor_1: Option<Box<Node>>,
        /// Optional second extra regressor.
        add_regressor_2: Option<Box<Node>>,
    },
    /// `npvmem(amount, obsDate, memSlot, ...)`
    NpvMem {
        /// Amount to condition-expect.
        amount: Box<Node>,
        /// Observation date.
        obs: Box<Node>,
        /// Basis-reuse memory slot (deterministic integer).
        mem_slot: Box<Node>,
        /// Optional regression filter.
        regression_filter: Option<Box<Node>>,
        /// Optional first extra regressor.
        add_regressor_1: Option<Box<Node>>,
        /// Optional second extra regressor.
        add_regressor_2: Option<Box<Node>>,
    },
    /// `histfixing(index, obsDate)`
    HistFixing(Box<Node>, Box<Node>),
    /// `discount(obs, pay, ccy)`
    Discount(Box<Node>, Box<Node>, Box<Node>),
    /// `fwdComp`/`fwdAvg(index, obs, start, end, [spread block], [lookback block], [cap/floor block])`
    FwdCompAvg {
        /// `true` for `fwdAvg`, `false` for `fwdComp`.
        is_average: bool,
        /// Index identifier.
        index: Box<Node>,
        /// Observation date.
        obs: Box<Node>,
        /// Accrual start date.
        start: Box<Node>,
        /// Accrual end date.
        end: Box<Node>,
        /// Optional spread/gearing block.
        spread: Option<SpreadBlock>,
        /// Optional lookback/cutoff block.
        lookback: Option<LookbackBlock>,
        /// Optional cap/floor block.
        cap_floor: Option<CapFloorBlock>,
    },
    /// `aboveprob`/`belowprob(index, obsDate1, obsDate2, barrier)`
    BarrierProb {
        /// `true` for `aboveprob`, `false` for `belowprob`.
        above: bool,
        /// Index identifier.
        index: Box<Node>,
        /// Window start.
        obs1: Box<Node>,
        /// Window end.
        obs2: Box<Node>,
        /// Barrier level.
        barrier: Box<Node>,
    },
    /// `indexEval(obsDate[, fwdDate])`
    IndexEval {
        /// Index identifier.
        index: Box<Node>,
        /// Observation date.
        obs: Box<Node>,
        /// Optional forward date.
        fwd: Option<Box<Node>>,
    },
}

/// A node plus its source location and resolution cache.
#[derive(Debug, Clone)]
pub struct Node {
    /// The node payload.
    pub kind: NodeKind,
    /// Where this node appears in the source.
    pub loc: SourceLoc,
    cache: Cell<Option<VarKind>>,
}

impl Node {
    /// Construct a node at the given location.
    pub fn new(kind: NodeKind, loc: SourceLoc) -> Self {
        Self {
            kind,
            loc,
            cache: Cell::new(None),
        }
    }

    /// The cached variable-resolution kind, if this node has been evaluated
    /// at least once since the last reset.
    pub fn cached_kind(&self) -> Option<VarKind> {
        self.cache.get()
    }

    /// Populate the resolution cache on first encounter.
    pub fn set_cached_kind(&self, kind: VarKind) {
        self.cache.set(Some(kind));
    }

    /// Clear this node's cache and recurse into children — the reset pass
    /// required before re-evaluating the same AST on a fresh `Context`.
    pub fn reset_caches(&self) {
        self.cache.set(None);
        self.for_each_child(|child| child.reset_caches());
    }

    fn for_each_child<F: FnMut(&Node)>(&self, mut f: F) {
        match &self.kind {
            NodeKind::Number(_) | NodeKind::StringLit(_) | NodeKind::Ident(_) | NodeKind::Size(_) => {}
            NodeKind::Subscript(_, idx) => f(idx),
            NodeKind::Binary(_, l, r)
            | NodeKind::Compare(_, l, r)
            | NodeKind::And(l, r)
            | NodeKind::Or(l, r) => {
                f(l);
                f(r);
            }
            NodeKind::Negate(n) | NodeKind::NotOp(n) | NodeKind::Require(n) => f(n),
            NodeKind::Assign(target, value) => {
                if let AssignTarget::Element(_, idx) = target {
                    f(idx);
                }
                f(value);
            }
            NodeKind::Declare(_, size) => {
                if let Some(size) = size {
                    f(size);
                }
            }
            NodeKind::Sequence(nodes) => nodes.iter().for_each(f),
            NodeKind::If(c, t, e) => {
                f(c);
                f(t);
                if let Some(e) = e {
                    f(e);
                }
            }
            NodeKind::For {
                from, to, step, body, ..
            } => {
                f(from);
                f(to);
                f(step);
                f(body);
            }
            NodeKind::DateIndex(event, _, _) => f(event),
            NodeKind::Sort(..) | NodeKind::Permute(..) => {}
            NodeKind::Black {
                cp,
                obs,
                expiry,
                strike,
                forward,
                vol,
            } => {
                f(cp);
                f(obs);
                f(expiry);
                f(strike);
                f(forward);
                f(vol);
            }
            NodeKind::Pay {
                amount,
                obs,
                pay,
                ccy,
            } => {
                f(amount);
                f(obs);
                f(pay);
                f(ccy);
            }
            NodeKind::LogPay {
                amount,
                obs,
                pay,
                ccy,
                leg_no,
                cashflow_type,
                slot,
            } => {
                f(amount);
                f(obs);
                f(pay);
                f(ccy);
                if let Some(n) = leg_no {
                    f(n);
                }
                if let Some(n) = cashflow_type {
                    f(n);
                }
                if let Some(n) = slot {
                    f(n);
                }
            }
            NodeKind::Npv {
                amount,
                obs,
                regression_filter,
                add_regressor_1,
                add_regressor_2,
            } => {
                f(amount);
                f(obs);
                if let Some(n) = regression_filter {
                    f(n);
                }
                if let Some(n) = add_regressor_1 {
                    f(n);
                }
                if let Some(n) = add_regressor_2 {
                    f(n);
                }
            }
            NodeKind::NpvMem {
                amount,
                obs,
                mem_slot,
                regression_filter,
                add_regressor_1,
                add_regressor_2,
            } => {
                f(amount);
                f(obs);
                f(mem_slot);
                if let Some(n) = regression_filter {
                    f(n);
                }
                if let Some(n) = add_regressor_1 {
                    f(n);
                }
                if let Some(n) = add_regressor_2 {
                    f(n);
                }
            }
            NodeKind::HistFixing(a, b) => {
                f(a);
                f(b);
            }
            NodeKind::Discount(a, b, c) => {
                f(a);
                f(b);
                f(c);
            }
            NodeKind::FwdCompAvg {
                index,
                obs,
                start,
                end,
                spread,
                lookback,
                cap_floor,
                ..
            } => {
                f(index);
                f(obs);
                f(start);
                f(end);
                if let Some(s) = spread {
                    f(&s.spread);
                    f(&s.gearing);
                }
                if let Some(l) = lookback {
                    f(&l.lookback);
                    f(&l.rate_cutoff);
                    f(&l.fixing_days);
                    f(&l.include_spread);
                }
                if let Some(c) = cap_floor {
                    f(&c.cap);
                    f(&c.floor);
                    f(&c.naked_option);
                    f(&c.local_cap_floor);
                }
            }
            NodeKind::BarrierProb {
                index,
                obs1,
                obs2,
                barrier,
                ..
            } => {
                f(index);
                f(obs1);
                f(obs2);
                f(barrier);
            }
            NodeKind::IndexEval { index, obs, fwd } => {
                f(index);
                f(obs);
                if let Some(fwd) = fwd {
                    f(fwd);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_caches_clears_nested_nodes() {
        let ident = Node::new(NodeKind::Ident("x".into()), SourceLoc::new(1, 1));
        ident.set_cached_kind(VarKind::Scalar);
        let seq = Node::new(NodeKind::Sequence(vec![ident]), SourceLoc::new(1, 1));
        if let NodeKind::Sequence(nodes) = &seq.kind {
            assert_eq!(nodes[0].cached_kind(), Some(VarKind::Scalar));
        }
        seq.reset_caches();
        if let NodeKind::Sequence(nodes) = &seq.kind {
            assert_eq!(nodes[0].cached_kind(), None);
        }
    }
}
