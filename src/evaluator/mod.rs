//! Expression evaluation
//!
//! The execution engine never evaluates expressions itself. It talks to an
//! [`Evaluator`] injected at construction: variable values are pushed into it
//! with [`Evaluator::bind`], and conditions and expressions are handed over as
//! text.
//!
//! [`ScriptEvaluator`] is the bundled implementation:
//! - [`lexer`]: expression text → tokens
//! - [`parser`]: tokens → [`ast::Expr`] (precedence climbing)
//! - [`script`]: tree-walking evaluation over the bound variables
//! - [`builtins`]: the pseudocode function library (`enEntier`, `ord`, ...)

pub mod ast;
pub mod builtins;
pub mod lexer;
pub mod parser;
pub mod script;

pub use script::ScriptEvaluator;

use crate::variables::value::Value;
use thiserror::Error;

/// Evaluation failures. The engine reports these and degrades to a default
/// (`false` for conditions, an empty result for expressions).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("syntax error at column {column}: {message}")]
    Syntax { message: String, column: usize },

    #[error("unknown identifier '{name}'")]
    UnknownIdentifier { name: String },

    #[error("unknown function '{name}'")]
    UnknownFunction { name: String },

    #[error("type error: {message}")]
    TypeError { message: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in {operation}")]
    Overflow { operation: String },

    #[error("function '{function}' expects {expected} argument(s), got {got}")]
    Arity {
        function: String,
        expected: usize,
        got: usize,
    },
}

/// Capability the engine consumes to evaluate pseudocode expressions.
///
/// Implementations keep their own bindings table; the engine is the only
/// writer and keeps it in sync with the variable store.
pub trait Evaluator {
    /// Register or update the current value of a variable.
    fn bind(&mut self, name: &str, value: Value);

    /// Evaluate a boolean condition (`ou`/`et` already rewritten).
    fn evaluate_condition(&mut self, text: &str) -> Result<bool, EvalError>;

    /// Evaluate an expression to a value.
    fn evaluate_expression(&mut self, text: &str) -> Result<Value, EvalError>;

    /// Forget every binding. Used at the start of a rewind-and-replay.
    fn reset(&mut self);
}
