//! A parsed payoff script bound to one trade, plus the externally injected
//! bindings (trade terms, §3 "Context" design) the driver supplies before
//! each evaluation.

use pricer_script::ast::{Node, Parser};
use pricer_script::context::Context;
use pricer_script::value::RandomVariable;

use crate::error::AggregationError;

/// The Context variable the driver reads after running a trade's script to
/// obtain its NPV — the convention the valuation driver and a trade's
/// script source agree on (ORE's own scripted trades use the same
/// `NUMBER NPV` result-variable convention).
pub const DEFAULT_RESULT_VARIABLE: &str = "NPV";

/// A trade's scripted payoff: the parsed AST, the name of the scalar the
/// engine assigns the trade's NPV to, and the externally injected
/// deterministic bindings (notional, strike, fixed rate, ...) that fill in
/// for trade terms §3's "Context" says are bound in from outside the
/// script rather than declared by it.
#[derive(Clone, Debug)]
pub struct TradeScript {
    root: Node,
    result_variable: String,
    external_bindings: Vec<(String, f64)>,
}

impl TradeScript {
    /// Parses `source` once. Re-used across every (date) evaluation for
    /// this trade — `reset_caches()` is called before each run since the
    /// AST's variable-resolution caches are per-`Context` (§4.2).
    pub fn parse(source: &str) -> Result<Self, AggregationError> {
        let root = Parser::parse(source).map_err(|e| {
            AggregationError::ScriptFailure {
                trade: "<parse>".to_string(),
                error: pricer_script::error::locate(
                    pricer_script::error::ScriptError::Config(e.to_string()),
                    None,
                ),
            }
        })?;
        Ok(Self {
            root,
            result_variable: DEFAULT_RESULT_VARIABLE.to_string(),
            external_bindings: Vec::new(),
        })
    }

    /// Overrides the default `NPV` result-variable name.
    pub fn with_result_variable(mut self, name: impl Into<String>) -> Self {
        self.result_variable = name.into();
        self
    }

    /// Adds a deterministic external binding (a trade term), marked
    /// constant so the engine never rejects an assignment to it as
    /// mutating a constant while also never treating it as path-dependent.
    pub fn with_binding(mut self, name: impl Into<String>, value: f64) -> Self {
        self.external_bindings.push((name.into(), value));
        self
    }

    /// The parsed AST root.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// The result variable name this script assigns its NPV to.
    pub fn result_variable(&self) -> &str {
        &self.result_variable
    }

    /// Builds a fresh `Context` over `n_samples` lanes with every external
    /// binding pre-declared and marked constant, and resets the AST's
    /// variable-resolution caches so the script can be safely re-evaluated
    /// against it (§4.2's required reset pass).
    pub fn fresh_context(&self, n_samples: usize) -> Context {
        let mut ctx = Context::new(n_samples);
        for (name, value) in &self.external_bindings {
            ctx.bind_external(name, RandomVariable::deterministic(n_samples, *value));
            ctx.mark_constant(name);
        }
        self.root.reset_caches();
        ctx
    }
}
