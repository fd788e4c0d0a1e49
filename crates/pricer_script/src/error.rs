//! Error types for the scripted-payoff engine.
//!
//! Follows `pricer_core::types::error`'s manual-`Display` style rather than
//! `thiserror`, since this crate sits at the same foundational layer.

use std::fmt;

use crate::ast::SourceLoc;

/// A source location together with the error that occurred there, attached
/// by the top-level `run` call per the propagation policy.
#[derive(Debug, Clone, PartialEq)]
pub struct Located<E> {
    /// Node source location, if one was available when the error occurred.
    pub loc: Option<SourceLoc>,
    /// The underlying error.
    pub error: E,
}

/// Errors raised while evaluating a payoff script.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptError {
    /// Missing or malformed configuration (e.g. unregistered constant name).
    Config(String),
    /// AST parser failure.
    Parse(String),
    /// The value stack carried a variant the current node cannot accept.
    Type(String),
    /// Out-of-range subscript or loop bound.
    Bounds(String),
    /// A `REQUIRE` predicate was not universally true under the active mask.
    RequireFailure(String),
    /// The pricing model rejected an input (date ordering, unknown index).
    Model(String),
    /// Cube/scenario file read/write failure.
    Io(String),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Config(msg) => write!(f, "configuration error: {msg}"),
            ScriptError::Parse(msg) => write!(f, "parse error: {msg}"),
            ScriptError::Type(msg) => write!(f, "type error: {msg}"),
            ScriptError::Bounds(msg) => write!(f, "bounds error: {msg}"),
            ScriptError::RequireFailure(msg) => write!(f, "REQUIRE failed: {msg}"),
            ScriptError::Model(msg) => write!(f, "model error: {msg}"),
            ScriptError::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for ScriptError {}

impl<E: fmt::Display> fmt::Display for Located<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.loc {
            Some(loc) => write!(f, "{} at {loc}", self.error),
            None => write!(f, "{}", self.error),
        }
    }
}

/// Attach a source location to an error, the way the top-level `run` call
/// does before returning to the caller.
pub fn locate(error: ScriptError, loc: Option<SourceLoc>) -> Located<ScriptError> {
    Located { loc, error }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_with_location_when_present() {
        let err = locate(
            ScriptError::Bounds("index 5 out of range [1, 3]".into()),
            Some(SourceLoc::new(4, 10)),
        );
        assert_eq!(
            err.to_string(),
            "bounds error: index 5 out of range [1, 3] at line 4, column 10"
        );
    }

    #[test]
    fn displays_without_location() {
        let err = locate(ScriptError::Model("unknown index FOO".into()), None);
        assert_eq!(err.to_string(), "model error: unknown index FOO");
    }
}
