//! Tree-walking interpreter for the payoff AST (§4.4).
//!
//! The spec describes the engine in terms of a value stack and a filter
//! stack; this crate's AST is already a plain recursive tree (mirroring
//! `ast::parser`'s recursive-descent shape), so the interpreter is a
//! recursive evaluator over `&Node` rather than a literal two-stack
//! machine — the stack depth at any point is simply the Rust call stack,
//! and the "stack holds exactly one value on return" postcondition the
//! spec states is just "every expression evaluates to exactly one
//! `EngineValue`", which the type system already guarantees.
//!
//! Conditional branches are masked with a `Filter` tracking which Monte
//! Carlo paths are currently active. When that mask collapses to a
//! deterministic constant, the inactive branch of an `IF` is skipped
//! entirely rather than evaluated-and-discarded: this is not just an
//! optimization, it is what makes path-independent `REQUIRE` checks and
//! `logpay` bookkeeping behave correctly when a branch can never fire for
//! any path still being evaluated.

use crate::ast::{AssignTarget, BinOp, CmpOp, DateIndexOp, Node, NodeKind};
use crate::context::{Context, ValueType};
use crate::error::{locate, Located, ScriptError};
use crate::model::{CapFloorParams, FwdCompAvgArgs, LookbackParams, Model, NpvArgs, SpreadParams};
use crate::paylog::{PayLog, PayLogEntry};
use crate::value::{Filter, RandomVariable};

/// The value an expression node produces.
enum EngineValue {
    Number(RandomVariable),
    Filter(Filter),
    Text(String),
}

impl EngineValue {
    fn into_number(self, loc: crate::ast::SourceLoc) -> Result<RandomVariable, Located<ScriptError>> {
        match self {
            EngineValue::Number(rv) => Ok(rv),
            EngineValue::Filter(_) => Err(locate(
                ScriptError::Type("expected a numeric value, found a filter".to_string()),
                Some(loc),
            )),
            EngineValue::Text(_) => Err(locate(
                ScriptError::Type("expected a numeric value, found a string literal".to_string()),
                Some(loc),
            )),
        }
    }

    fn into_filter(self, loc: crate::ast::SourceLoc) -> Result<Filter, Located<ScriptError>> {
        match self {
            EngineValue::Filter(f) => Ok(f),
            EngineValue::Number(_) => Err(locate(
                ScriptError::Type("expected a filter, found a numeric value".to_string()),
                Some(loc),
            )),
            EngineValue::Text(_) => Err(locate(
                ScriptError::Type("expected a filter, found a string literal".to_string()),
                Some(loc),
            )),
        }
    }
}

/// The payoff script interpreter.
///
/// Stateless: all mutable state lives in the `Context` and `PayLog` passed
/// to [`Engine::run`], so one `Engine` (really, a zero-sized marker) can be
/// shared across the rayon tasks the valuation driver spawns per trade.
pub struct Engine;

impl Engine {
    /// Evaluate `program` against `ctx`, driven by `model`. Returns the
    /// cashflow log recorded by any `logpay` calls encountered.
    ///
    /// `program`'s caches should have been reset via [`Node::reset_caches`]
    /// if it was previously evaluated against a different `Context`.
    pub fn run(program: &Node, ctx: &mut Context, model: &dyn Model) -> Result<PayLog, Located<ScriptError>> {
        let mut paylog = PayLog::new();
        let active = Filter::all_true(ctx.size());
        exec(program, ctx, model, &mut paylog, &active)?;
        Ok(paylog)
    }
}

fn exec(
    node: &Node,
    ctx: &mut Context,
    model: &dyn Model,
    paylog: &mut PayLog,
    active: &Filter,
) -> Result<(), Located<ScriptError>> {
    let loc = node.loc;
    match &node.kind {
        NodeKind::Sequence(stmts) => {
            for s in stmts {
                exec(s, ctx, model, paylog, active)?;
            }
            Ok(())
        }
        NodeKind::Declare(name, size_expr) => {
            match size_expr {
                None => ctx.declare_scalar(name).map_err(|e| locate(e, Some(loc)))?,
                Some(size_node) => {
                    let len = eval_deterministic_usize(size_node, ctx, model, paylog, active)?;
                    ctx.declare_array(name, len).map_err(|e| locate(e, Some(loc)))?;
                }
            }
            Ok(())
        }
        NodeKind::Assign(target, rhs) => exec_assign(target, rhs, ctx, model, paylog, active),
        NodeKind::If(cond, then_branch, else_branch) => {
            let cond_filter = eval_expr(cond, ctx, model, paylog, active)?.into_filter(cond.loc)?;
            match cond_filter.deterministic_value() {
                Some(true) => exec(then_branch, ctx, model, paylog, active),
                Some(false) => {
                    if let Some(e) = else_branch {
                        exec(e, ctx, model, paylog, active)
                    } else {
                        Ok(())
                    }
                }
                None => {
                    let then_mask = active & &cond_filter;
                    exec(then_branch, ctx, model, paylog, &then_mask)?;
                    if let Some(e) = else_branch {
                        let else_mask = active & &!&cond_filter;
                        exec(e, ctx, model, paylog, &else_mask)?;
                    }
                    Ok(())
                }
            }
        }
        NodeKind::For {
            var,
            from,
            to,
            step,
            body,
        } => {
            let from_v = eval_deterministic_f64(from, ctx, model, paylog, active)?;
            let to_v = eval_deterministic_f64(to, ctx, model, paylog, active)?;
            let step_v = eval_deterministic_f64(step, ctx, model, paylog, active)?;
            if step_v == 0.0 {
                return Err(locate(
                    ScriptError::Bounds("FOR step must be non-zero".to_string()),
                    Some(loc),
                ));
            }
            let size = ctx.size();
            let mut i = from_v;
            loop {
                if step_v > 0.0 && i > to_v {
                    break;
                }
                if step_v < 0.0 && i < to_v {
                    break;
                }
                ctx.bind_external(var, RandomVariable::deterministic(size, i));
                ctx.mark_constant(var);
                exec(body, ctx, model, paylog, active)?;
                i += step_v;
            }
            Ok(())
        }
        NodeKind::Require(cond) => {
            let cond_filter = eval_expr(cond, ctx, model, paylog, active)?.into_filter(cond.loc)?;
            if active.implies(&cond_filter) {
                Ok(())
            } else {
                Err(locate(
                    ScriptError::RequireFailure(
                        "condition did not hold on every active path".to_string(),
                    ),
                    Some(loc),
                ))
            }
        }
        NodeKind::Sort(x, y, p) => exec_sort(x, y.as_deref(), p.as_deref(), ctx, loc),
        NodeKind::Permute(x, y, p) => exec_permute(x, y.as_deref(), p.as_deref(), ctx, loc),
        _ => {
            // Any other node appearing in statement position is a bare
            // expression; evaluate for potential side effects (logpay) and
            // discard the result.
            eval_expr(node, ctx, model, paylog, active)?;
            Ok(())
        }
    }
}

fn exec_assign(
    target: &AssignTarget,
    rhs: &Node,
    ctx: &mut Context,
    model: &dyn Model,
    paylog: &mut PayLog,
    active: &Filter,
) -> Result<(), Located<ScriptError>> {
    let new_value = eval_expr(rhs, ctx, model, paylog, active)?;
    match target {
        AssignTarget::Scalar(name) => {
            let old = ctx
                .get_scalar(name)
                .map_err(|e| locate(e, Some(rhs.loc)))?
                .clone();
            let blended = blend(active, new_value, old, rhs.loc)?;
            ctx.set_scalar(name, blended).map_err(|e| locate(e, Some(rhs.loc)))
        }
        AssignTarget::Element(name, idx_node) => {
            let idx = eval_subscript_index(idx_node, ctx, model, paylog, active)?;
            let old = ctx
                .get_element(name, idx)
                .map_err(|e| locate(e, Some(idx_node.loc)))?
                .clone();
            let blended = blend(active, new_value, old, rhs.loc)?;
            ctx.set_element(name, idx, blended)
                .map_err(|e| locate(e, Some(rhs.loc)))
        }
    }
}

/// Blend a freshly computed value into the previously stored one, keeping
/// the old value on lanes the current mask does not cover.
fn blend(
    active: &Filter,
    new_value: EngineValue,
    old_value: ValueType,
    loc: crate::ast::SourceLoc,
) -> Result<ValueType, Located<ScriptError>> {
    if let Some(true) = active.deterministic_value() {
        return match new_value {
            EngineValue::Number(rv) => Ok(ValueType::Number(rv)),
            EngineValue::Filter(f) => Ok(ValueType::Filter(f)),
            EngineValue::Text(_) => Err(locate(
                ScriptError::Type("cannot assign a string literal to a variable".to_string()),
                Some(loc),
            )),
        };
    }
    match (new_value, old_value) {
        (EngineValue::Number(new_rv), ValueType::Number(old_rv)) => {
            Ok(ValueType::Number(RandomVariable::select(active, &new_rv, &old_rv)))
        }
        (EngineValue::Filter(new_f), ValueType::Filter(old_f)) => {
            Ok(ValueType::Filter(&(active & &new_f) | &(&!active & &old_f)))
        }
        (EngineValue::Text(_), _) => Err(locate(
            ScriptError::Type("cannot assign a string literal to a variable".to_string()),
            Some(loc),
        )),
        _ => Err(locate(
            ScriptError::Type("assignment changed the variable's type".to_string()),
            Some(loc),
        )),
    }
}

fn eval_deterministic_f64(
    node: &Node,
    ctx: &mut Context,
    model: &dyn Model,
    paylog: &mut PayLog,
    active: &Filter,
) -> Result<f64, Located<ScriptError>> {
    let rv = eval_expr(node, ctx, model, paylog, active)?.into_number(node.loc)?;
    if !rv.deterministic() {
        return Err(locate(
            ScriptError::Type("expected a deterministic (path-independent) value".to_string()),
            Some(node.loc),
        ));
    }
    Ok(rv.at(0))
}

fn eval_deterministic_usize(
    node: &Node,
    ctx: &mut Context,
    model: &dyn Model,
    paylog: &mut PayLog,
    active: &Filter,
) -> Result<usize, Located<ScriptError>> {
    let v = eval_deterministic_f64(node, ctx, model, paylog, active)?;
    if v < 0.0 || v.fract() != 0.0 {
        return Err(locate(
            ScriptError::Bounds(format!("expected a non-negative integer, found {v}")),
            Some(node.loc),
        ));
    }
    Ok(v as usize)
}

/// Evaluates a 1-based array subscript, rejecting 0 and negative/fractional
/// values, and converts it to the 0-based index `Context` stores arrays
/// under. Distinct from [`eval_deterministic_usize`], which also backs array
/// size declarations where 0 is a legitimate (empty array) size.
fn eval_subscript_index(
    node: &Node,
    ctx: &mut Context,
    model: &dyn Model,
    paylog: &mut PayLog,
    active: &Filter,
) -> Result<usize, Located<ScriptError>> {
    let v = eval_deterministic_f64(node, ctx, model, paylog, active)?;
    if v < 1.0 || v.fract() != 0.0 {
        return Err(locate(
            ScriptError::Bounds(format!("array subscript must be a positive integer (1-based), found {v}")),
            Some(node.loc),
        ));
    }
    Ok(v as usize - 1)
}

/// Extracts the scalar date a deterministic `RandomVariable` holds,
/// rejecting path-dependent dates (§4.3's dates are always deterministic
/// year fractions from the reference date).
fn deterministic_date(
    rv: &RandomVariable,
    what: &str,
    loc: crate::ast::SourceLoc,
) -> Result<f64, Located<ScriptError>> {
    if !rv.deterministic() {
        return Err(locate(
            ScriptError::Type(format!("{what} must be deterministic")),
            Some(loc),
        ));
    }
    Ok(rv.at(0))
}

/// Clamps an observation date up to the reference (valuation) date, lane by
/// lane: `NPV`/`NPVMEM`'s regression basis is never evaluated strictly
/// before the as-of date.
fn clamp_obs_to_reference_date(obs: RandomVariable, model: &dyn Model, size: usize) -> RandomVariable {
    let ref_date = RandomVariable::deterministic(size, model.reference_date());
    let below_ref = obs.lt_rv(&ref_date);
    match below_ref.deterministic_value() {
        Some(false) => obs,
        Some(true) => ref_date,
        None => RandomVariable::select(&below_ref, &ref_date, &obs),
    }
}

fn eval_text(
    node: &Node,
    ctx: &mut Context,
    model: &dyn Model,
    paylog: &mut PayLog,
    active: &Filter,
) -> Result<String, Located<ScriptError>> {
    match eval_expr(node, ctx, model, paylog, active)? {
        EngineValue::Text(s) => Ok(s),
        _ => Err(locate(
            ScriptError::Type("expected a string literal".to_string()),
            Some(node.loc),
        )),
    }
}

fn eval_expr(
    node: &Node,
    ctx: &mut Context,
    model: &dyn Model,
    paylog: &mut PayLog,
    active: &Filter,
) -> Result<EngineValue, Located<ScriptError>> {
    let loc = node.loc;
    match &node.kind {
        NodeKind::Number(v) => Ok(EngineValue::Number(RandomVariable::deterministic(ctx.size(), *v))),
        NodeKind::StringLit(s) => Ok(EngineValue::Text(s.clone())),
        NodeKind::Ident(name) => {
            if ctx.is_array(name) {
                return Err(locate(
                    ScriptError::Type(format!("'{name}' is an array; subscript it")),
                    Some(loc),
                ));
            }
            match ctx.get_scalar(name).map_err(|e| locate(e, Some(loc)))? {
                ValueType::Number(rv) => Ok(EngineValue::Number(rv.clone())),
                ValueType::Filter(f) => Ok(EngineValue::Filter(f.clone())),
            }
        }
        NodeKind::Subscript(name, idx) => {
            let index = eval_subscript_index(idx, ctx, model, paylog, active)?;
            match ctx.get_element(name, index).map_err(|e| locate(e, Some(loc)))? {
                ValueType::Number(rv) => Ok(EngineValue::Number(rv.clone())),
                ValueType::Filter(f) => Ok(EngineValue::Filter(f.clone())),
            }
        }
        NodeKind::Binary(op, l, r) => {
            let lv = eval_expr(l, ctx, model, paylog, active)?.into_number(l.loc)?;
            let rv = eval_expr(r, ctx, model, paylog, active)?.into_number(r.loc)?;
            let result = match op {
                BinOp::Add => &lv + &rv,
                BinOp::Sub => &lv - &rv,
                BinOp::Mul => &lv * &rv,
                BinOp::Div => &lv / &rv,
            };
            Ok(EngineValue::Number(result))
        }
        NodeKind::Negate(n) => {
            let v = eval_expr(n, ctx, model, paylog, active)?.into_number(n.loc)?;
            Ok(EngineValue::Number(-&v))
        }
        NodeKind::Compare(op, l, r) => {
            let lv = eval_expr(l, ctx, model, paylog, active)?.into_number(l.loc)?;
            let rv = eval_expr(r, ctx, model, paylog, active)?.into_number(r.loc)?;
            let result = match op {
                CmpOp::Eq => lv.eq_rv(&rv),
                CmpOp::Ne => lv.ne_rv(&rv),
                CmpOp::Lt => lv.lt_rv(&rv),
                CmpOp::Le => lv.le_rv(&rv),
                CmpOp::Gt => lv.gt_rv(&rv),
                CmpOp::Ge => lv.ge_rv(&rv),
            };
            Ok(EngineValue::Filter(result))
        }
        NodeKind::And(l, r) => {
            let lv = eval_expr(l, ctx, model, paylog, active)?.into_filter(l.loc)?;
            if lv.deterministic_value() == Some(false) {
                return Ok(EngineValue::Filter(Filter::deterministic(ctx.size(), false)));
            }
            let rv = eval_expr(r, ctx, model, paylog, active)?.into_filter(r.loc)?;
            Ok(EngineValue::Filter(&lv & &rv))
        }
        NodeKind::Or(l, r) => {
            let lv = eval_expr(l, ctx, model, paylog, active)?.into_filter(l.loc)?;
            if lv.deterministic_value() == Some(true) {
                return Ok(EngineValue::Filter(Filter::deterministic(ctx.size(), true)));
            }
            let rv = eval_expr(r, ctx, model, paylog, active)?.into_filter(r.loc)?;
            Ok(EngineValue::Filter(&lv | &rv))
        }
        NodeKind::NotOp(n) => {
            let v = eval_expr(n, ctx, model, paylog, active)?.into_filter(n.loc)?;
            Ok(EngineValue::Filter(!&v))
        }
        NodeKind::Size(name) => {
            let len = ctx.array_len(name).map_err(|e| locate(e, Some(loc)))?;
            Ok(EngineValue::Number(RandomVariable::deterministic(ctx.size(), len as f64)))
        }
        NodeKind::DateIndex(event, array_name, op) => {
            let event_v = eval_deterministic_f64(event, ctx, model, paylog, active)?;
            let len = ctx.array_len(array_name).map_err(|e| locate(e, Some(loc)))?;
            for i in 0..len {
                let elem = ctx
                    .get_element(array_name, i)
                    .map_err(|e| locate(e, Some(loc)))?
                    .as_number()
                    .map_err(|e| locate(e, Some(loc)))?;
                if !elem.deterministic() {
                    return Err(locate(
                        ScriptError::Type("DATEINDEX requires a deterministic date array".to_string()),
                        Some(loc),
                    ));
                }
                let v = elem.at(0);
                let matched = match op {
                    DateIndexOp::Eq => v == event_v,
                    DateIndexOp::Geq => v >= event_v,
                    DateIndexOp::Gt => v > event_v,
                };
                if matched {
                    return Ok(EngineValue::Number(RandomVariable::deterministic(ctx.size(), (i + 1) as f64)));
                }
            }
            match op {
                DateIndexOp::Eq => Ok(EngineValue::Number(RandomVariable::deterministic(ctx.size(), 0.0))),
                DateIndexOp::Geq | DateIndexOp::Gt => Err(locate(
                    ScriptError::Bounds(format!("DATEINDEX found no matching element in '{array_name}'")),
                    Some(loc),
                )),
            }
        }
        NodeKind::Black {
            cp,
            obs,
            expiry,
            strike,
            forward,
            vol,
        } => {
            let cp_v = eval_deterministic_f64(cp, ctx, model, paylog, active)?;
            let obs_v = eval_expr(obs, ctx, model, paylog, active)?.into_number(obs.loc)?;
            let expiry_v = eval_expr(expiry, ctx, model, paylog, active)?.into_number(expiry.loc)?;
            let obs_date = deterministic_date(&obs_v, "a BLACK observation date", loc)?;
            let expiry_date = deterministic_date(&expiry_v, "a BLACK expiry date", loc)?;
            if obs_date > expiry_date {
                return Err(locate(
                    ScriptError::Bounds("BLACK requires obs <= expiry".to_string()),
                    Some(loc),
                ));
            }
            let dt = model.dt(&obs_v, &expiry_v).map_err(|e| locate(e, Some(loc)))?;
            let strike_v = eval_expr(strike, ctx, model, paylog, active)?.into_number(strike.loc)?;
            let forward_v = eval_expr(forward, ctx, model, paylog, active)?.into_number(forward.loc)?;
            let vol_v = eval_expr(vol, ctx, model, paylog, active)?.into_number(vol.loc)?;
            Ok(EngineValue::Number(model.black(cp_v, &dt, &strike_v, &forward_v, &vol_v)))
        }
        NodeKind::Pay { amount, obs, pay, ccy } => {
            let amount_v = eval_expr(amount, ctx, model, paylog, active)?.into_number(amount.loc)?;
            let obs_v = eval_expr(obs, ctx, model, paylog, active)?.into_number(obs.loc)?;
            let pay_v = eval_expr(pay, ctx, model, paylog, active)?.into_number(pay.loc)?;
            let ccy_v = eval_text(ccy, ctx, model, paylog, active)?;
            let pay_date = deterministic_date(&pay_v, "a PAY payment date", loc)?;
            if pay_date <= model.reference_date() {
                return Ok(EngineValue::Number(RandomVariable::deterministic(ctx.size(), 0.0)));
            }
            let obs_date = deterministic_date(&obs_v, "a PAY observation date", loc)?;
            if obs_date > pay_date {
                return Err(locate(
                    ScriptError::Bounds("PAY requires obs <= pay".to_string()),
                    Some(loc),
                ));
            }
            let result = model
                .pay(&amount_v, &obs_v, &pay_v, &ccy_v)
                .map_err(|e| locate(e, Some(loc)))?;
            Ok(EngineValue::Number(result))
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
            let amount_v = eval_expr(amount, ctx, model, paylog, active)?.into_number(amount.loc)?;
            let obs_v = eval_expr(obs, ctx, model, paylog, active)?.into_number(obs.loc)?;
            let pay_v = eval_expr(pay, ctx, model, paylog, active)?.into_number(pay.loc)?;
            let ccy_v = eval_text(ccy, ctx, model, paylog, active)?;
            if !obs_v.deterministic() || !pay_v.deterministic() {
                return Err(locate(
                    ScriptError::Type("logpay observation/payment dates must be deterministic".to_string()),
                    Some(loc),
                ));
            }
            let leg_no_v = match leg_no {
                Some(n) => Some(eval_deterministic_f64(n, ctx, model, paylog, active)? as i64),
                None => None,
            };
            let cashflow_type_v = match cashflow_type {
                Some(n) => Some(eval_text(n, ctx, model, paylog, active)?),
                None => None,
            };
            let slot_v = match slot {
                Some(n) => Some(eval_deterministic_f64(n, ctx, model, paylog, active)? as i64),
                None => None,
            };
            let result = model
                .pay(&amount_v, &obs_v, &pay_v, &ccy_v)
                .map_err(|e| locate(e, Some(loc)))?;
            paylog.push(PayLogEntry {
                amount: amount_v,
                obs: obs_v.at(0),
                pay: pay_v.at(0),
                ccy: ccy_v,
                leg_no: leg_no_v,
                cashflow_type: cashflow_type_v,
                slot: slot_v,
            });
            Ok(EngineValue::Number(result))
        }
        NodeKind::Npv {
            amount,
            obs,
            regression_filter,
            add_regressor_1,
            add_regressor_2,
        } => {
            let amount_v = eval_expr(amount, ctx, model, paylog, active)?.into_number(amount.loc)?;
            let obs_v = eval_expr(obs, ctx, model, paylog, active)?.into_number(obs.loc)?;
            let obs_v = clamp_obs_to_reference_date(obs_v, model, ctx.size());
            let filter_v = match regression_filter {
                Some(n) => Some(eval_expr(n, ctx, model, paylog, active)?.into_filter(n.loc)?),
                None => None,
            };
            let reg1 = match add_regressor_1 {
                Some(n) => Some(eval_expr(n, ctx, model, paylog, active)?.into_number(n.loc)?),
                None => None,
            };
            let reg2 = match add_regressor_2 {
                Some(n) => Some(eval_expr(n, ctx, model, paylog, active)?.into_number(n.loc)?),
                None => None,
            };
            let result = model
                .npv(NpvArgs {
                    amount: &amount_v,
                    obs: &obs_v,
                    regression_filter: filter_v.as_ref(),
                    memory_slot: None,
                    add_regressor_1: reg1.as_ref(),
                    add_regressor_2: reg2.as_ref(),
                })
                .map_err(|e| locate(e, Some(loc)))?;
            Ok(EngineValue::Number(result))
        }
        NodeKind::NpvMem {
            amount,
            obs,
            mem_slot,
            regression_filter,
            add_regressor_1,
            add_regressor_2,
        } => {
            let amount_v = eval_expr(amount, ctx, model, paylog, active)?.into_number(amount.loc)?;
            let obs_v = eval_expr(obs, ctx, model, paylog, active)?.into_number(obs.loc)?;
            let obs_v = clamp_obs_to_reference_date(obs_v, model, ctx.size());
            let slot_v = eval_deterministic_f64(mem_slot, ctx, model, paylog, active)? as i64;
            let filter_v = match regression_filter {
                Some(n) => Some(eval_expr(n, ctx, model, paylog, active)?.into_filter(n.loc)?),
                None => None,
            };
            let reg1 = match add_regressor_1 {
                Some(n) => Some(eval_expr(n, ctx, model, paylog, active)?.into_number(n.loc)?),
                None => None,
            };
            let reg2 = match add_regressor_2 {
                Some(n) => Some(eval_expr(n, ctx, model, paylog, active)?.into_number(n.loc)?),
                None => None,
            };
            let result = model
                .npv(NpvArgs {
                    amount: &amount_v,
                    obs: &obs_v,
                    regression_filter: filter_v.as_ref(),
                    memory_slot: Some(slot_v),
                    add_regressor_1: reg1.as_ref(),
                    add_regressor_2: reg2.as_ref(),
                })
                .map_err(|e| locate(e, Some(loc)))?;
            Ok(EngineValue::Number(result))
        }
        NodeKind::HistFixing(index, obs) => {
            let index_v = eval_text(index, ctx, model, paylog, active)?;
            let obs_v = eval_deterministic_f64(obs, ctx, model, paylog, active)?;
            let present = obs_v <= model.reference_date() && model.has_historical_fixing(&index_v, obs_v);
            Ok(EngineValue::Number(RandomVariable::deterministic(
                ctx.size(),
                if present { 1.0 } else { 0.0 },
            )))
        }
        NodeKind::Discount(obs, pay, ccy) => {
            let obs_v = eval_expr(obs, ctx, model, paylog, active)?.into_number(obs.loc)?;
            let pay_v = eval_expr(pay, ctx, model, paylog, active)?.into_number(pay.loc)?;
            let ccy_v = eval_text(ccy, ctx, model, paylog, active)?;
            let obs_date = deterministic_date(&obs_v, "a DISCOUNT observation date", loc)?;
            let pay_date = deterministic_date(&pay_v, "a DISCOUNT payment date", loc)?;
            if obs_date < model.reference_date() || obs_date > pay_date {
                return Err(locate(
                    ScriptError::Bounds("DISCOUNT requires referenceDate() <= obs <= pay".to_string()),
                    Some(loc),
                ));
            }
            let result = model
                .discount(&obs_v, &pay_v, &ccy_v)
                .map_err(|e| locate(e, Some(loc)))?;
            Ok(EngineValue::Number(result))
        }
        NodeKind::FwdCompAvg {
            is_average,
            index,
            obs,
            start,
            end,
            spread,
            lookback,
            cap_floor,
        } => {
            let index_v = eval_text(index, ctx, model, paylog, active)?;
            let obs_v = eval_expr(obs, ctx, model, paylog, active)?.into_number(obs.loc)?;
            let start_v = eval_expr(start, ctx, model, paylog, active)?.into_number(start.loc)?;
            let end_v = eval_expr(end, ctx, model, paylog, active)?.into_number(end.loc)?;
            let spread_v = match spread {
                Some(s) => Some(SpreadParams {
                    spread: eval_expr(&s.spread, ctx, model, paylog, active)?.into_number(s.spread.loc)?,
                    gearing: eval_expr(&s.gearing, ctx, model, paylog, active)?.into_number(s.gearing.loc)?,
                }),
                None => None,
            };
            let lookback_v = match lookback {
                Some(l) => Some(LookbackParams {
                    lookback_days: eval_deterministic_f64(&l.lookback, ctx, model, paylog, active)? as i64,
                    rate_cutoff_days: eval_deterministic_f64(&l.rate_cutoff, ctx, model, paylog, active)? as i64,
                    fixing_days: eval_deterministic_f64(&l.fixing_days, ctx, model, paylog, active)? as i64,
                    include_spread: eval_deterministic_f64(&l.include_spread, ctx, model, paylog, active)? > 0.0,
                }),
                None => None,
            };
            let cap_floor_v = match cap_floor {
                Some(c) => Some(CapFloorParams {
                    cap: eval_expr(&c.cap, ctx, model, paylog, active)?.into_number(c.cap.loc)?,
                    floor: eval_expr(&c.floor, ctx, model, paylog, active)?.into_number(c.floor.loc)?,
                    naked_option: eval_deterministic_f64(&c.naked_option, ctx, model, paylog, active)? > 0.0,
                    local_cap_floor: eval_deterministic_f64(&c.local_cap_floor, ctx, model, paylog, active)? > 0.0,
                }),
                None => None,
            };
            let result = model
                .fwd_comp_avg(FwdCompAvgArgs {
                    is_average: *is_average,
                    index: &index_v,
                    obs: &obs_v,
                    start: &start_v,
                    end: &end_v,
                    spread: spread_v,
                    lookback: lookback_v,
                    cap_floor: cap_floor_v,
                })
                .map_err(|e| locate(e, Some(loc)))?;
            Ok(EngineValue::Number(result))
        }
        NodeKind::BarrierProb {
            above,
            index,
            obs1,
            obs2,
            barrier,
        } => {
            let index_v = eval_text(index, ctx, model, paylog, active)?;
            let obs1_v = eval_expr(obs1, ctx, model, paylog, active)?.into_number(obs1.loc)?;
            let obs2_v = eval_expr(obs2, ctx, model, paylog, active)?.into_number(obs2.loc)?;
            let barrier_v = eval_expr(barrier, ctx, model, paylog, active)?.into_number(barrier.loc)?;
            let obs1_date = deterministic_date(&obs1_v, "a barrier probability start date", loc)?;
            let obs2_date = deterministic_date(&obs2_v, "a barrier probability end date", loc)?;
            if obs1_date > obs2_date {
                return Ok(EngineValue::Number(RandomVariable::deterministic(ctx.size(), 0.0)));
            }
            let result = model
                .barrier_probability(&index_v, &obs1_v, &obs2_v, &barrier_v, *above)
                .map_err(|e| locate(e, Some(loc)))?;
            Ok(EngineValue::Number(result))
        }
        NodeKind::IndexEval { index, obs, fwd } => {
            let index_v = eval_text(index, ctx, model, paylog, active)?;
            let obs_v = eval_expr(obs, ctx, model, paylog, active)?.into_number(obs.loc)?;
            let fwd_v = match fwd {
                Some(n) => Some(eval_expr(n, ctx, model, paylog, active)?.into_number(n.loc)?),
                None => None,
            };
            let fwd_v = match fwd_v {
                Some(f) => {
                    let obs_date = deterministic_date(&obs_v, "an index evaluation date", loc)?;
                    let fwd_date = deterministic_date(&f, "an index forward date", loc)?;
                    if fwd_date == obs_date {
                        None
                    } else if fwd_date < obs_date {
                        return Err(locate(
                            ScriptError::Bounds("index forward date must be after the observation date".to_string()),
                            Some(loc),
                        ));
                    } else {
                        Some(f)
                    }
                }
                None => None,
            };
            let result = model
                .eval(&index_v, &obs_v, fwd_v.as_ref())
                .map_err(|e| locate(e, Some(loc)))?;
            Ok(EngineValue::Number(result))
        }
        // Statement-only nodes cannot appear in expression position.
        NodeKind::Sequence(_)
        | NodeKind::Declare(..)
        | NodeKind::Assign(..)
        | NodeKind::If(..)
        | NodeKind::For { .. }
        | NodeKind::Require(_)
        | NodeKind::Sort(..)
        | NodeKind::Permute(..) => Err(locate(
            ScriptError::Type("statement used in expression position".to_string()),
            Some(loc),
        )),
    }
}

/// Per-lane sort of array `x` (ascending), carrying array `y` along with it
/// and recording the resulting permutation into array `p`, all lane-wise —
/// each Monte Carlo path may sort its own elements into a different order.
fn exec_sort(
    x: &str,
    y: Option<&str>,
    p: Option<&str>,
    ctx: &mut Context,
    loc: crate::ast::SourceLoc,
) -> Result<(), Located<ScriptError>> {
    let size = ctx.size();
    let len = ctx.array_len(x).map_err(|e| locate(e, Some(loc)))?;
    let x_values = gather_array(ctx, x, len, loc)?;
    let y_values = match y {
        Some(name) => Some(gather_array(ctx, name, len, loc)?),
        None => None,
    };

    let mut perm = vec![vec![0usize; len]; size];
    for lane in 0..size {
        let mut idx: Vec<usize> = (0..len).collect();
        idx.sort_by(|&a, &b| x_values[a][lane].partial_cmp(&x_values[b][lane]).unwrap());
        perm[lane] = idx;
    }

    for pos in 0..len {
        let sorted_x: Vec<f64> = (0..size).map(|lane| x_values[perm[lane][pos]][lane]).collect();
        ctx.set_element(x, pos, ValueType::Number(RandomVariable::from_lanes(sorted_x)))
            .map_err(|e| locate(e, Some(loc)))?;
        if let (Some(name), Some(values)) = (y, &y_values) {
            let sorted_y: Vec<f64> = (0..size).map(|lane| values[perm[lane][pos]][lane]).collect();
            ctx.set_element(name, pos, ValueType::Number(RandomVariable::from_lanes(sorted_y)))
                .map_err(|e| locate(e, Some(loc)))?;
        }
        if let Some(name) = p {
            let perm_pos: Vec<f64> = (0..size).map(|lane| (perm[lane][pos] + 1) as f64).collect();
            ctx.set_element(name, pos, ValueType::Number(RandomVariable::from_lanes(perm_pos)))
                .map_err(|e| locate(e, Some(loc)))?;
        }
    }
    Ok(())
}

/// Apply a previously computed permutation `p` (e.g. from a prior `SORT`)
/// to array `x` (and optionally `y`), lane-wise.
fn exec_permute(
    x: &str,
    y: Option<&str>,
    p: Option<&str>,
    ctx: &mut Context,
    loc: crate::ast::SourceLoc,
) -> Result<(), Located<ScriptError>> {
    let p_name = p.ok_or_else(|| {
        locate(
            ScriptError::Config("PERMUTE requires a permutation array".to_string()),
            Some(loc),
        )
    })?;
    let size = ctx.size();
    let len = ctx.array_len(x).map_err(|e| locate(e, Some(loc)))?;
    let x_values = gather_array(ctx, x, len, loc)?;
    let y_values = match y {
        Some(name) => Some(gather_array(ctx, name, len, loc)?),
        None => None,
    };
    let perm_values = gather_array(ctx, p_name, len, loc)?;

    for pos in 0..len {
        let sorted_x: Vec<f64> = (0..size)
            .map(|lane| x_values[perm_values[pos][lane] as usize - 1][lane])
            .collect();
        ctx.set_element(x, pos, ValueType::Number(RandomVariable::from_lanes(sorted_x)))
            .map_err(|e| locate(e, Some(loc)))?;
        if let (Some(name), Some(values)) = (y, &y_values) {
            let sorted_y: Vec<f64> = (0..size)
                .map(|lane| values[perm_values[pos][lane] as usize - 1][lane])
                .collect();
            ctx.set_element(name, pos, ValueType::Number(RandomVariable::from_lanes(sorted_y)))
                .map_err(|e| locate(e, Some(loc)))?;
        }
    }
    Ok(())
}

fn gather_array(
    ctx: &Context,
    name: &str,
    len: usize,
    loc: crate::ast::SourceLoc,
) -> Result<Vec<Vec<f64>>, Located<ScriptError>> {
    (0..len)
        .map(|i| {
            ctx.get_element(name, i)
                .map_err(|e| locate(e, Some(loc)))?
                .as_number()
                .map_err(|e| locate(e, Some(loc)))
                .map(|rv| rv.to_vec())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Parser;
    use crate::model::ModelType;

    struct FlatModel {
        size: usize,
        discount_rate: f64,
        fixing: Option<f64>,
    }

    impl Model for FlatModel {
        fn size(&self) -> usize {
            self.size
        }
        fn reference_date(&self) -> f64 {
            0.0
        }
        fn dt(&self, from: &RandomVariable, to: &RandomVariable) -> Result<RandomVariable, ScriptError> {
            Ok(to - from)
        }
        fn pay(
            &self,
            amount: &RandomVariable,
            _obs: &RandomVariable,
            pay: &RandomVariable,
            _ccy: &str,
        ) -> Result<RandomVariable, ScriptError> {
            let df = RandomVariable::deterministic(self.size, (-self.discount_rate * pay.at(0)).exp());
            Ok(amount * &df)
        }
        fn discount(&self, _obs: &RandomVariable, pay: &RandomVariable, _ccy: &str) -> Result<RandomVariable, ScriptError> {
            Ok(RandomVariable::deterministic(self.size, (-self.discount_rate * pay.at(0)).exp()))
        }
        fn npv(&self, args: NpvArgs<'_>) -> Result<RandomVariable, ScriptError> {
            Ok(args.amount.clone())
        }
        fn eval(&self, _index: &str, _obs: &RandomVariable, _fwd: Option<&RandomVariable>) -> Result<RandomVariable, ScriptError> {
            Ok(RandomVariable::deterministic(self.size, 1.0))
        }
        fn fwd_comp_avg(&self, _args: FwdCompAvgArgs<'_>) -> Result<RandomVariable, ScriptError> {
            Ok(RandomVariable::deterministic(self.size, 0.0))
        }
        fn barrier_probability(
            &self,
            _index: &str,
            _obs1: &RandomVariable,
            _obs2: &RandomVariable,
            _barrier: &RandomVariable,
            _above: bool,
        ) -> Result<RandomVariable, ScriptError> {
            Ok(RandomVariable::deterministic(self.size, 0.0))
        }
        fn has_historical_fixing(&self, _index: &str, _obs: f64) -> bool {
            self.fixing.is_some()
        }
        fn historical_fixing(&self, _index: &str, _obs: f64) -> Option<f64> {
            self.fixing
        }
        fn black(&self, cp: f64, _dt: &RandomVariable, strike: &RandomVariable, forward: &RandomVariable, _vol: &RandomVariable) -> RandomVariable {
            let intrinsic: Vec<f64> = (0..self.size)
                .map(|k| (cp * (forward.at(k) - strike.at(k))).max(0.0))
                .collect();
            RandomVariable::from_lanes(intrinsic)
        }
        fn model_type(&self) -> ModelType {
            ModelType::MonteCarlo
        }
    }

    #[test]
    fn evaluates_a_discounted_fixed_payment() {
        let ast = Parser::parse("NUMBER Accumulator; Accumulator = pay(1.0, 0, 1, \"USD\");").unwrap();
        let mut ctx = Context::new(2);
        let model = FlatModel { size: 2, discount_rate: 0.05, fixing: None };
        Engine::run(&ast, &mut ctx, &model).unwrap();
        let v = ctx.get_scalar("Accumulator").unwrap().as_number().unwrap();
        assert!((v.at(0) - (-0.05f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn if_takes_the_deterministic_true_branch_without_touching_else() {
        let ast = Parser::parse(
            "NUMBER x; NUMBER y; x = 1.0; IF x > 0.0 THEN y = 10.0 ELSE y = -10.0;",
        )
        .unwrap();
        let mut ctx = Context::new(1);
        let model = FlatModel { size: 1, discount_rate: 0.0, fixing: None };
        Engine::run(&ast, &mut ctx, &model).unwrap();
        let v = ctx.get_scalar("y").unwrap().as_number().unwrap();
        assert_eq!(v.at(0), 10.0);
    }

    #[test]
    fn require_failure_is_reported_with_location() {
        let ast = Parser::parse("REQUIRE(1.0 < 0.0);").unwrap();
        let mut ctx = Context::new(1);
        let model = FlatModel { size: 1, discount_rate: 0.0, fixing: None };
        let err = Engine::run(&ast, &mut ctx, &model).unwrap_err();
        assert!(matches!(err.error, ScriptError::RequireFailure(_)));
    }

    #[test]
    fn for_loop_accumulates_across_a_deterministic_range() {
        let ast = Parser::parse(
            "NUMBER total; total = 0.0; FOR i = 1.0 TO 3.0 STEP 1.0 DO total = total + i;",
        )
        .unwrap();
        let mut ctx = Context::new(1);
        let model = FlatModel { size: 1, discount_rate: 0.0, fixing: None };
        Engine::run(&ast, &mut ctx, &model).unwrap();
        let v = ctx.get_scalar("total").unwrap().as_number().unwrap();
        assert_eq!(v.at(0), 6.0);
    }

    #[test]
    fn logpay_records_an_entry_and_contributes_to_npv() {
        let ast = Parser::parse(
            "NUMBER Accumulator; Accumulator = logpay(100.0, 0, 1, \"USD\");",
        )
        .unwrap();
        let mut ctx = Context::new(1);
        let model = FlatModel { size: 1, discount_rate: 0.0, fixing: None };
        let log = Engine::run(&ast, &mut ctx, &model).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].amount.at(0), 100.0);
        let v = ctx.get_scalar("Accumulator").unwrap().as_number().unwrap();
        assert_eq!(v.at(0), 100.0);
    }

    #[test]
    fn pay_with_a_past_payment_date_is_zero_regardless_of_discount_rate() {
        let ast = Parser::parse("NUMBER Accumulator; Accumulator = pay(1.0, -2.0, -1.0, \"USD\");").unwrap();
        let mut ctx = Context::new(1);
        let model = FlatModel { size: 1, discount_rate: 0.05, fixing: None };
        Engine::run(&ast, &mut ctx, &model).unwrap();
        let v = ctx.get_scalar("Accumulator").unwrap().as_number().unwrap();
        assert_eq!(v.at(0), 0.0);
    }

    #[test]
    fn pay_rejects_an_observation_date_after_the_payment_date() {
        let ast = Parser::parse("NUMBER Accumulator; Accumulator = pay(1.0, 2.0, 1.0, \"USD\");").unwrap();
        let mut ctx = Context::new(1);
        let model = FlatModel { size: 1, discount_rate: 0.0, fixing: None };
        let err = Engine::run(&ast, &mut ctx, &model).unwrap_err();
        assert!(matches!(err.error, ScriptError::Bounds(_)));
    }

    #[test]
    fn subscript_zero_is_rejected_and_one_reaches_the_first_element() {
        let mut ctx = Context::new(1);
        let model = FlatModel { size: 1, discount_rate: 0.0, fixing: None };

        let ast = Parser::parse("NUMBER arr[3]; arr[0] = 1.0;").unwrap();
        let err = Engine::run(&ast, &mut ctx, &model).unwrap_err();
        assert!(matches!(err.error, ScriptError::Bounds(_)));

        let mut ctx = Context::new(1);
        let ast = Parser::parse("NUMBER arr[3]; arr[1] = 7.0; NUMBER x; x = arr[1];").unwrap();
        Engine::run(&ast, &mut ctx, &model).unwrap();
        let v = ctx.get_scalar("x").unwrap().as_number().unwrap();
        assert_eq!(v.at(0), 7.0);
    }

    #[test]
    fn histfixing_reports_a_presence_flag_not_the_raw_value() {
        let mut ctx = Context::new(1);
        let model = FlatModel { size: 1, discount_rate: 0.0, fixing: Some(42.0) };
        let ast = Parser::parse("NUMBER x; x = histfixing(\"IDX\", -1.0);").unwrap();
        Engine::run(&ast, &mut ctx, &model).unwrap();
        let v = ctx.get_scalar("x").unwrap().as_number().unwrap();
        assert_eq!(v.at(0), 1.0);

        let mut ctx = Context::new(1);
        let model_future = FlatModel { size: 1, discount_rate: 0.0, fixing: Some(42.0) };
        let ast = Parser::parse("NUMBER x; x = histfixing(\"IDX\", 1.0);").unwrap();
        Engine::run(&ast, &mut ctx, &model_future).unwrap();
        let v = ctx.get_scalar("x").unwrap().as_number().unwrap();
        assert_eq!(v.at(0), 0.0);

        let mut ctx = Context::new(1);
        let model_absent = FlatModel { size: 1, discount_rate: 0.0, fixing: None };
        let ast = Parser::parse("NUMBER x; x = histfixing(\"IDX\", -1.0);").unwrap();
        Engine::run(&ast, &mut ctx, &model_absent).unwrap();
        let v = ctx.get_scalar("x").unwrap().as_number().unwrap();
        assert_eq!(v.at(0), 0.0);
    }
}
