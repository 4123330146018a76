//! Engine error types
//!
//! [`EngineError`] covers two families:
//!
//! - per-line execution errors (`UnknownVariable`, `UnknownCall`,
//!   `Evaluation`, `Store`, `ConstantAssignment`, stray block markers): these
//!   are reported to the execution log and the run moves on
//! - navigation errors (`ExecutionFinished`, `AtStart`, `InvalidJumpTarget`,
//!   `UnreachableJumpTarget`, `StepLimitExceeded`) and `StructuralBlock` on an unterminated block
//!   header: these are returned to the caller of the navigation command

use crate::evaluator::EvalError;
use crate::variables::store::StoreError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("line {}: unknown variable '{name}'", .line + 1)]
    UnknownVariable { line: usize, name: String },

    #[error("line {}: unknown routine '{name}'", .line + 1)]
    UnknownCall { line: usize, name: String },

    #[error("line {}: {source}", .line + 1)]
    Evaluation {
        line: usize,
        #[source]
        source: EvalError,
    },

    #[error("line {}: {source}", .line + 1)]
    Store {
        line: usize,
        #[source]
        source: StoreError,
    },

    #[error("line {}: '{name}' is a constant and cannot change", .line + 1)]
    ConstantAssignment { line: usize, name: String },

    /// `si`/`tant que` without terminator, or a stray `sinon`/`fsi`/`ftq`
    #[error("line {}: unmatched '{construct}'", .line + 1)]
    StructuralBlock {
        line: usize,
        construct: &'static str,
    },

    #[error("execution is finished")]
    ExecutionFinished,

    #[error("already at the start of the program")]
    AtStart,

    #[error("line {} is outside the program ({len} lines)", .target + 1)]
    InvalidJumpTarget { target: usize, len: usize },

    /// The run never stops on `target`: control flow skips it, or the run
    /// ends first. The cursor is left on `reached`.
    #[error("line {} is never reached from the start, stopped on line {}", .target + 1, .reached + 1)]
    UnreachableJumpTarget { target: usize, reached: usize },

    #[error("stopped after {limit} steps, the program may not terminate")]
    StepLimitExceeded { limit: usize },
}

impl EngineError {
    /// Source line the error is about, for errors raised by a statement.
    pub fn line(&self) -> Option<usize> {
        match self {
            EngineError::UnknownVariable { line, .. }
            | EngineError::UnknownCall { line, .. }
            | EngineError::Evaluation { line, .. }
            | EngineError::Store { line, .. }
            | EngineError::ConstantAssignment { line, .. }
            | EngineError::StructuralBlock { line, .. } => Some(*line),
            EngineError::ExecutionFinished
            | EngineError::AtStart
            | EngineError::InvalidJumpTarget { .. }
            | EngineError::UnreachableJumpTarget { .. }
            | EngineError::StepLimitExceeded { .. } => None,
        }
    }
}
