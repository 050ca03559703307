//! Error kinds surfaced by constructions, intersections and predicates.

use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeomError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeomError {
    /// Coincident points for a line, collinear triple for a circle, zero-direction line.
    #[error("degenerate construction: {0}")]
    DegenerateConstruction(String),

    /// A free point has neither a binding nor a solvable constraint.
    #[error("unresolved free point: {0}")]
    UnresolvedFreePoint(String),

    /// An oracle sign stayed undecided after `rounds` refinement rounds.
    #[error("indeterminate sign after {rounds} refinement rounds: {expr}")]
    IndeterminatePredicate { rounds: u32, expr: String },

    /// Division by zero or square root of a negative value. Reaching this is
    /// an invariant violation in the caller.
    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    /// Malformed textual value.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Discriminant of `GeomError` for callers that branch on the kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    DegenerateConstruction,
    UnresolvedFreePoint,
    IndeterminatePredicate,
    Arithmetic,
    Parse,
}

impl GeomError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GeomError::DegenerateConstruction(_) => ErrorKind::DegenerateConstruction,
            GeomError::UnresolvedFreePoint(_) => ErrorKind::UnresolvedFreePoint,
            GeomError::IndeterminatePredicate { .. } => ErrorKind::IndeterminatePredicate,
            GeomError::Arithmetic(_) => ErrorKind::Arithmetic,
            GeomError::Parse(_) => ErrorKind::Parse,
        }
    }

    pub(crate) fn degenerate(msg: impl Into<String>) -> Self {
        GeomError::DegenerateConstruction(msg.into())
    }

    pub(crate) fn arithmetic(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::error!(reason = %msg, "arithmetic invariant violated");
        GeomError::Arithmetic(msg)
    }
}
