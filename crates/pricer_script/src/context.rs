//! Variable store the script engine reads and writes while evaluating a
//! payoff AST.
//!
//! `Context` holds scalars and arrays of `RandomVariable`/`Filter` lanes,
//! plus the deterministic constants (`NUMBER` declarations without a loop
//! index) and the set of externally-bound names a `Model` supplies (e.g.
//! `Underlying`, `currentNotional`) that scripts read but never assign.

use std::collections::{HashMap, HashSet};

use crate::error::ScriptError;
use crate::value::{Filter, RandomVariable};

/// A script-visible value: either a numeric lane vector or a boolean one.
///
/// `Event`, `Currency`, and `Index` names referenced by a script resolve
/// through the active [`crate::model::Model`] rather than through `Context`
/// storage, so they are not represented here; `Context` only stores the
/// mutable scalar/array state a script declares and assigns.
#[derive(Debug, Clone)]
pub enum ValueType {
    /// A vectorized numeric lane, e.g. the value of a `NUMBER` variable.
    Number(RandomVariable),
    /// A vectorized boolean lane, e.g. a stored comparison result.
    Filter(Filter),
}

impl ValueType {
    /// View this value as a `RandomVariable`, or a type error.
    pub fn as_number(&self) -> Result<&RandomVariable, ScriptError> {
        match self {
            ValueType::Number(rv) => Ok(rv),
            ValueType::Filter(_) => Err(ScriptError::Type(
                "expected a numeric value, found a filter".to_string(),
            )),
        }
    }

    /// View this value as a `Filter`, or a type error.
    pub fn as_filter(&self) -> Result<&Filter, ScriptError> {
        match self {
            ValueType::Filter(f) => Ok(f),
            ValueType::Number(_) => Err(ScriptError::Type(
                "expected a filter, found a numeric value".to_string(),
            )),
        }
    }
}

/// The script engine's variable store for one evaluation pass.
///
/// Scalars and arrays are kept in separate maps since `NUMBER x` and
/// `NUMBER x[n]` occupy disjoint namespaces only at the storage level —
/// the parser still rejects redeclaration under the same name via `declare`.
#[derive(Debug, Default)]
pub struct Context {
    size: usize,
    scalars: HashMap<String, ValueType>,
    arrays: HashMap<String, Vec<ValueType>>,
    constants: HashSet<String>,
    ignored: HashSet<String>,
}

impl Context {
    /// A fresh context over `size` Monte Carlo paths.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            scalars: HashMap::new(),
            arrays: HashMap::new(),
            constants: HashSet::new(),
            ignored: HashSet::new(),
        }
    }

    /// Number of lanes every value in this context must carry.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Declare a scalar `NUMBER name`, initialized to a deterministic zero.
    pub fn declare_scalar(&mut self, name: &str) -> Result<(), ScriptError> {
        if self.scalars.contains_key(name) || self.arrays.contains_key(name) {
            return Err(ScriptError::Config(format!("'{name}' already declared")));
        }
        self.scalars.insert(
            name.to_string(),
            ValueType::Number(RandomVariable::deterministic(self.size, 0.0)),
        );
        Ok(())
    }

    /// Declare an array `NUMBER name[n]`, every element a deterministic zero.
    pub fn declare_array(&mut self, name: &str, len: usize) -> Result<(), ScriptError> {
        if self.scalars.contains_key(name) || self.arrays.contains_key(name) {
            return Err(ScriptError::Config(format!("'{name}' already declared")));
        }
        let elems = (0..len)
            .map(|_| ValueType::Number(RandomVariable::deterministic(self.size, 0.0)))
            .collect();
        self.arrays.insert(name.to_string(), elems);
        Ok(())
    }

    /// Mark a name as a deterministic constant (its value never depends on
    /// the Monte Carlo path), allowing the engine to skip mask-merge work.
    pub fn mark_constant(&mut self, name: &str) {
        self.constants.insert(name.to_string());
    }

    /// Whether `name` was marked a deterministic constant.
    pub fn is_constant(&self, name: &str) -> bool {
        self.constants.contains(name)
    }

    /// Mark a script-declared name whose value a `PostProcess` step should
    /// not carry into downstream reporting (e.g. loop counters).
    pub fn mark_ignored(&mut self, name: &str) {
        self.ignored.insert(name.to_string());
    }

    /// Whether `name` was marked ignored.
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignored.contains(name)
    }

    /// Bind an externally supplied scalar (e.g. a model-provided constant)
    /// without requiring a prior `declare_scalar` call.
    pub fn bind_external(&mut self, name: &str, value: RandomVariable) {
        self.scalars.insert(name.to_string(), ValueType::Number(value));
    }

    /// Read a scalar by name.
    pub fn get_scalar(&self, name: &str) -> Result<&ValueType, ScriptError> {
        self.scalars
            .get(name)
            .ok_or_else(|| ScriptError::Config(format!("undeclared variable '{name}'")))
    }

    /// Assign a scalar by name.
    pub fn set_scalar(&mut self, name: &str, value: ValueType) -> Result<(), ScriptError> {
        if !self.scalars.contains_key(name) {
            return Err(ScriptError::Config(format!("undeclared variable '{name}'")));
        }
        self.scalars.insert(name.to_string(), value);
        Ok(())
    }

    /// Read an array element by name and index.
    pub fn get_element(&self, name: &str, index: usize) -> Result<&ValueType, ScriptError> {
        let arr = self
            .arrays
            .get(name)
            .ok_or_else(|| ScriptError::Config(format!("undeclared array '{name}'")))?;
        arr.get(index)
            .ok_or_else(|| ScriptError::Bounds(format!("index {index} out of range for '{name}[{}]'", arr.len())))
    }

    /// Assign an array element by name and index.
    pub fn set_element(&mut self, name: &str, index: usize, value: ValueType) -> Result<(), ScriptError> {
        let len = self
            .arrays
            .get(name)
            .ok_or_else(|| ScriptError::Config(format!("undeclared array '{name}'")))?
            .len();
        if index >= len {
            return Err(ScriptError::Bounds(format!(
                "index {index} out of range for '{name}[{len}]'"
            )));
        }
        self.arrays.get_mut(name).unwrap()[index] = value;
        Ok(())
    }

    /// The declared length of an array, for `SIZE(arr)`.
    pub fn array_len(&self, name: &str) -> Result<usize, ScriptError> {
        self.arrays
            .get(name)
            .map(|a| a.len())
            .ok_or_else(|| ScriptError::Config(format!("undeclared array '{name}'")))
    }

    /// `true` if `name` names a declared array (used to disambiguate bare
    /// identifier lookups from array references during evaluation).
    pub fn is_array(&self, name: &str) -> bool {
        self.arrays.contains_key(name)
    }
}
